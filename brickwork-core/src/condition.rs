//! Predicate tree for WHERE and HAVING clauses.
//!
//! Conditions are built with the free constructor functions in this module
//! and combined with [`and`], [`or`] and [`not`]:
//!
//! ```
//! use brickwork_core::{and, eq, gt, or, select};
//!
//! let query = select(["id"])
//!     .from("users")
//!     .where_(and([eq("status", "active"), or([gt("age", 18), eq("role", "admin")])]))
//!     .build_with(&Default::default())
//!     .unwrap();
//! assert_eq!(
//!     query.text,
//!     "SELECT id FROM users WHERE status = $1 AND (age > $2 OR role = $3)"
//! );
//! ```

use std::fmt::{self, Display};

use crate::builder::SelectStatement;
use crate::{Error, Operator, Result, Value};

/// Logical connective of a [`Condition::Logical`] group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

impl Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the predicate tree
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column <op> value`
    Comparison {
        op: Operator,
        column: String,
        value: Value,
    },
    /// `column IS [NOT] NULL`
    IsNull { column: String, negated: bool },
    /// `column BETWEEN low AND high`
    Between {
        column: String,
        low: Value,
        high: Value,
    },
    /// `column [I]LIKE value`
    Pattern {
        column: String,
        value: Value,
        case_insensitive: bool,
    },
    /// `column IN (v1, v2, ...)`
    InSet { column: String, values: Vec<Value> },
    /// `column IN (SELECT ...)`
    InSelect {
        column: String,
        query: Box<SelectStatement>,
    },
    /// Operands joined by one connective, in order
    Logical {
        op: LogicalOp,
        operands: Vec<Condition>,
    },
    /// `NOT inner`
    Negation { inner: Box<Condition> },
    /// Opaque SQL; each `?` in `text` binds the next value
    Raw { text: String, values: Vec<Value> },
}

impl Condition {
    /// General comparison constructor
    pub fn compare(column: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Condition::Comparison {
            op,
            column: column.into(),
            value: value.into(),
        }
    }

    pub(crate) fn is_logical(&self) -> bool {
        matches!(self, Condition::Logical { .. })
    }

    /// AND `other` onto `prior`, flattening into an existing AND group.
    ///
    /// An empty group is kept as an operand so it still fails at render time.
    pub(crate) fn and_with(prior: Option<Condition>, other: Condition) -> Condition {
        match prior {
            None => other,
            Some(Condition::Logical {
                op: LogicalOp::And,
                mut operands,
            }) if !operands.is_empty() => {
                operands.push(other);
                Condition::Logical {
                    op: LogicalOp::And,
                    operands,
                }
            }
            Some(prior) => and([prior, other]),
        }
    }
}

pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    Condition::compare(column, Operator::Eq, value)
}

pub fn not_eq(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    Condition::compare(column, Operator::NotEq, value)
}

pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    Condition::compare(column, Operator::Lt, value)
}

pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    Condition::compare(column, Operator::Lte, value)
}

pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    Condition::compare(column, Operator::Gt, value)
}

pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    Condition::compare(column, Operator::Gte, value)
}

pub fn is_null(column: impl Into<String>) -> Condition {
    Condition::IsNull {
        column: column.into(),
        negated: false,
    }
}

pub fn is_not_null(column: impl Into<String>) -> Condition {
    Condition::IsNull {
        column: column.into(),
        negated: true,
    }
}

/// `column BETWEEN low AND high`, bounds bound in that order
pub fn between(
    column: impl Into<String>,
    low: impl Into<Value>,
    high: impl Into<Value>,
) -> Condition {
    Condition::Between {
        column: column.into(),
        low: low.into(),
        high: high.into(),
    }
}

pub fn like(column: impl Into<String>, pattern: impl Into<Value>) -> Condition {
    Condition::Pattern {
        column: column.into(),
        value: pattern.into(),
        case_insensitive: false,
    }
}

/// Case-insensitive pattern match (`ILIKE`)
pub fn ilike(column: impl Into<String>, pattern: impl Into<Value>) -> Condition {
    Condition::Pattern {
        column: column.into(),
        value: pattern.into(),
        case_insensitive: true,
    }
}

/// `column IN (...)`.
///
/// An empty set has no valid SQL rendering and is rejected here.
pub fn in_list<I, V>(column: impl Into<String>, values: I) -> Result<Condition>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let column = column.into();
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
        return Err(Error::malformed_clause(format!(
            "IN on '{column}' requires at least one value"
        )));
    }
    Ok(Condition::InSet { column, values })
}

/// `column IN (SELECT ...)`; the sub-select shares the outer placeholder numbering
pub fn in_select(column: impl Into<String>, query: SelectStatement) -> Condition {
    Condition::InSelect {
        column: column.into(),
        query: Box::new(query),
    }
}

pub fn and<I>(operands: I) -> Condition
where
    I: IntoIterator<Item = Condition>,
{
    Condition::Logical {
        op: LogicalOp::And,
        operands: operands.into_iter().collect(),
    }
}

pub fn or<I>(operands: I) -> Condition
where
    I: IntoIterator<Item = Condition>,
{
    Condition::Logical {
        op: LogicalOp::Or,
        operands: operands.into_iter().collect(),
    }
}

/// Negate a condition. Double negation is kept as written.
pub fn not(inner: Condition) -> Condition {
    Condition::Negation {
        inner: Box::new(inner),
    }
}

/// Opaque SQL fragment. Each `?` in `text` is replaced by the dialect's
/// placeholder and bound to the next value; nothing else is interpreted.
///
/// # Examples
/// ```
/// use brickwork_core::{raw, select};
///
/// let query = select(["id"])
///     .from("users")
///     .where_(raw("lower(email) = lower(?)", ["Jo@Example.com"]))
///     .build_with(&Default::default())
///     .unwrap();
/// assert_eq!(query.text, "SELECT id FROM users WHERE lower(email) = lower($1)");
/// ```
pub fn raw<I, V>(text: impl Into<String>, values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Condition::Raw {
        text: text.into(),
        values: values.into_iter().map(Into::into).collect(),
    }
}
