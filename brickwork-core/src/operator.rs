//! Comparison operator types and conversions

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::Error;

/// Binary comparison operator used by [`Condition::Comparison`](crate::Condition)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Operator {
    /// Get the SQL representation of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse the textual forms of the comparison operators.
///
/// `!=` is accepted as an alias of `<>`.
impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Operator::Eq),
            "<>" | "!=" => Ok(Operator::NotEq),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Lte),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Gte),
            other => Err(Error::malformed_clause(format!(
                "unknown comparison operator '{other}'"
            ))),
        }
    }
}

/// Convenience module for operator constants
pub mod op {
    use super::Operator;

    pub const EQ: Operator = Operator::Eq;
    pub const NEQ: Operator = Operator::NotEq;
    pub const LT: Operator = Operator::Lt;
    pub const LTE: Operator = Operator::Lte;
    pub const GT: Operator = Operator::Gt;
    pub const GTE: Operator = Operator::Gte;
}
