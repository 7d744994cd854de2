//! Statement rendering: SQL text plus the ordered parameter list

use serde::{Deserialize, Serialize};

use crate::builder::QueryBuilder;
use crate::condition::{Condition, LogicalOp};
use crate::{Dialect, Error, Result, Value};

/// Rendered statement, ready to hand to a driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlQuery {
    pub text: String,
    /// Bound values; `values[n - 1]` belongs to the n-th placeholder
    pub values: Vec<Value>,
}

impl SqlQuery {
    /// Serialize as `{"text": ..., "values": [...]}`
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Accumulates SQL text and bound values for one render.
///
/// A single renderer is threaded through the whole statement, nested
/// sub-selects included, so placeholder numbers never restart.
pub struct Renderer<'d> {
    dialect: &'d Dialect,
    sql: String,
    values: Vec<Value>,
}

impl<'d> Renderer<'d> {
    pub fn new(dialect: &'d Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            values: Vec::new(),
        }
    }

    pub fn dialect(&self) -> &Dialect {
        self.dialect
    }

    pub fn finish(self) -> SqlQuery {
        SqlQuery {
            text: self.sql,
            values: self.values,
        }
    }

    pub fn push_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    /// Bind `value` and write its placeholder
    pub fn push_value(&mut self, value: Value) {
        self.values.push(value);
        self.dialect.placeholder.write(&mut self.sql, self.values.len());
    }

    /// Write a table or column reference, quoting it when the dialect asks.
    ///
    /// Only identifier-shaped names (`name`, `schema.table`, `users.*`) are
    /// quoted, segment by segment. Anything else, such as `COUNT(*)` or
    /// `total AS t`, is written verbatim.
    pub fn push_ident(&mut self, name: &str) {
        let quote = match self.dialect.quote_char {
            Some(q) if is_identifier(name) => q,
            _ => {
                self.sql.push_str(name);
                return;
            }
        };

        for (i, segment) in name.split('.').enumerate() {
            if i > 0 {
                self.sql.push('.');
            }
            if segment == "*" {
                self.sql.push('*');
                continue;
            }
            self.sql.push(quote);
            self.sql.push_str(segment);
            self.sql.push(quote);
        }
    }

    /// Write a comma separated identifier list
    pub fn push_ident_list<S: AsRef<str>>(&mut self, names: &[S]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_ident(name.as_ref());
        }
    }

    /// Write a LIMIT/OFFSET count, inline or bound depending on the dialect
    pub fn push_count(&mut self, keyword: &str, n: u64) -> Result<()> {
        if self.dialect.bind_limits {
            let bound = i64::try_from(n).map_err(|_| {
                Error::malformed_clause(format!("{keyword} {n} exceeds the bindable range"))
            })?;
            self.push_value(Value::I64(bound));
        } else {
            self.sql.push_str(&n.to_string());
        }
        Ok(())
    }

    /// Render a condition tree depth-first, left to right
    pub fn push_condition(&mut self, condition: &Condition) -> Result<()> {
        match condition {
            Condition::Comparison { op, column, value } => {
                self.push_ident(column);
                self.sql.push(' ');
                self.sql.push_str(op.as_str());
                self.sql.push(' ');
                self.push_value(value.clone());
            }
            Condition::IsNull { column, negated } => {
                self.push_ident(column);
                self.sql
                    .push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Condition::Between { column, low, high } => {
                self.push_ident(column);
                self.sql.push_str(" BETWEEN ");
                self.push_value(low.clone());
                self.sql.push_str(" AND ");
                self.push_value(high.clone());
            }
            Condition::Pattern {
                column,
                value,
                case_insensitive,
            } => {
                self.push_ident(column);
                self.sql
                    .push_str(if *case_insensitive { " ILIKE " } else { " LIKE " });
                self.push_value(value.clone());
            }
            Condition::InSet { column, values } => {
                if values.is_empty() {
                    return Err(Error::malformed_clause(format!(
                        "IN on '{column}' requires at least one value"
                    )));
                }
                self.push_ident(column);
                self.sql.push_str(" IN (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.sql.push_str(", ");
                    }
                    self.push_value(value.clone());
                }
                self.sql.push(')');
            }
            Condition::InSelect { column, query } => {
                self.push_ident(column);
                self.sql.push_str(" IN (");
                query.render(self)?;
                self.sql.push(')');
            }
            Condition::Logical { op, operands } => {
                if operands.is_empty() {
                    return Err(Error::malformed_clause(format!(
                        "{op} group requires at least one condition"
                    )));
                }
                let separator = match op {
                    LogicalOp::And => " AND ",
                    LogicalOp::Or => " OR ",
                };
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        self.sql.push_str(separator);
                    }
                    let wrap = match operand {
                        Condition::Logical { op: inner, .. } => inner != op,
                        Condition::Negation { .. } => true,
                        _ => false,
                    };
                    self.push_nested(operand, wrap)?;
                }
            }
            Condition::Negation { inner } => {
                self.sql.push_str("NOT ");
                self.push_nested(inner, inner.is_logical())?;
            }
            Condition::Raw { text, values } => {
                let markers = text.matches('?').count();
                if markers != values.len() {
                    return Err(Error::malformed_clause(format!(
                        "raw fragment has {markers} placeholder(s) but {} value(s)",
                        values.len()
                    )));
                }
                let mut values = values.iter();
                for (i, piece) in text.split('?').enumerate() {
                    if i > 0 {
                        if let Some(value) = values.next() {
                            self.push_value(value.clone());
                        }
                    }
                    self.sql.push_str(piece);
                }
            }
        }
        Ok(())
    }

    fn push_nested(&mut self, condition: &Condition, wrap: bool) -> Result<()> {
        if wrap {
            self.sql.push('(');
        }
        self.push_condition(condition)?;
        if wrap {
            self.sql.push(')');
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut segments = name.split('.').peekable();
    while let Some(segment) = segments.next() {
        // `*` is only meaningful as the last segment: `users.*`
        if segment == "*" {
            return segments.peek().is_none();
        }
        let mut chars = segment.chars();
        match chars.next() {
            Some(c) if c == '_' || c.is_alphabetic() => {}
            _ => return false,
        }
        if !chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric()) {
            return false;
        }
    }
    true
}
