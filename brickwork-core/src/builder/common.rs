//! Common types and traits shared across all statement builders

use crate::condition::{and, eq, Condition};
use crate::render::{Renderer, SqlQuery};
use crate::{dialect, Dialect, Fields, Operator, Result, Value};

/// Core trait for all statement builders
pub trait QueryBuilder {
    /// Write this statement into `renderer`
    fn render(&self, renderer: &mut Renderer<'_>) -> Result<()>;

    /// Render against an explicit dialect
    fn build_with(&self, dialect: &Dialect) -> Result<SqlQuery> {
        let mut renderer = Renderer::new(dialect);
        self.render(&mut renderer)?;
        let query = renderer.finish();
        tracing::debug!(sql = %query.text, params = query.values.len(), "rendered statement");
        Ok(query)
    }

    /// Render against the process-wide default dialect as it is right now
    fn build(&self) -> Result<SqlQuery> {
        self.build_with(&dialect::current())
    }

    /// Generate only the SQL text
    fn to_sql(&self) -> Result<String> {
        Ok(self.build()?.text)
    }
}

/// Inherent `build`/`build_with` so callers don't need the trait in scope
macro_rules! impl_build {
    ($ty:ty) => {
        impl $ty {
            /// Render against the process-wide default dialect as it is right now
            pub fn build(&self) -> $crate::Result<$crate::SqlQuery> {
                $crate::builder::QueryBuilder::build(self)
            }

            /// Render against an explicit dialect
            pub fn build_with(
                &self,
                dialect: &$crate::Dialect,
            ) -> $crate::Result<$crate::SqlQuery> {
                $crate::builder::QueryBuilder::build_with(self, dialect)
            }
        }
    };
}
pub(crate) use impl_build;

/// Trait for values accepted by `where_` and `having`
pub trait IntoCondition {
    fn into_condition(self) -> Condition;
}

impl IntoCondition for Condition {
    fn into_condition(self) -> Condition {
        self
    }
}

// Shorthand: every entry becomes `column = value`, ANDed in order
impl IntoCondition for Fields {
    fn into_condition(self) -> Condition {
        and(self.into_iter().map(|(column, value)| eq(column, value)))
    }
}

// Shorthand equality: where_(("age", 18))
impl<T> IntoCondition for (&str, T)
where
    T: Into<Value>,
{
    fn into_condition(self) -> Condition {
        eq(self.0, self.1)
    }
}

// Explicit operators: where_(("age", op::GT, 18))
impl<T> IntoCondition for (&str, Operator, T)
where
    T: Into<Value>,
{
    fn into_condition(self) -> Condition {
        Condition::compare(self.0, self.1, self.2)
    }
}

/// Trait to convert various types into columns
pub trait IntoColumns {
    fn into_columns(self) -> Vec<String>;
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> Vec<String> {
        self
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Vec<String> {
        self.into_iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Vec<String> {
        self.into_iter().map(|s| s.to_string()).collect()
    }
}

impl IntoColumns for (&str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string()]
    }
}

impl IntoColumns for (&str, &str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string(), self.2.to_string()]
    }
}

/// JOIN types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
            JoinType::Left => write!(f, "LEFT"),
            JoinType::Right => write!(f, "RIGHT"),
            JoinType::Full => write!(f, "FULL OUTER"),
        }
    }
}

/// A complete JOIN clause: target table and `left = right` column pairs
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: String,
    pub on: Vec<(String, String)>,
}

/// Trait for the ON part of a join: one or more `(left, right)` column pairs
pub trait IntoJoinOn {
    fn into_join_on(self) -> Vec<(String, String)>;
}

impl IntoJoinOn for (&str, &str) {
    fn into_join_on(self) -> Vec<(String, String)> {
        vec![(self.0.to_string(), self.1.to_string())]
    }
}

impl IntoJoinOn for Vec<(&str, &str)> {
    fn into_join_on(self) -> Vec<(String, String)> {
        self.into_iter()
            .map(|(l, r)| (l.to_string(), r.to_string()))
            .collect()
    }
}

impl<const N: usize> IntoJoinOn for [(&str, &str); N] {
    fn into_join_on(self) -> Vec<(String, String)> {
        self.into_iter()
            .map(|(l, r)| (l.to_string(), r.to_string()))
            .collect()
    }
}

/// Sort direction for ORDER BY clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// One ORDER BY expression
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    pub column: String,
    pub direction: Option<SortDirection>,
}

impl OrderByClause {
    /// Split a trailing `ASC`/`DESC` (any case) off `expr`
    pub fn parse(expr: &str) -> Self {
        let expr = expr.trim();
        if let Some((column, suffix)) = expr.rsplit_once(char::is_whitespace) {
            let direction = if suffix.eq_ignore_ascii_case("asc") {
                Some(SortDirection::Asc)
            } else if suffix.eq_ignore_ascii_case("desc") {
                Some(SortDirection::Desc)
            } else {
                None
            };
            if direction.is_some() {
                return Self {
                    column: column.trim_end().to_string(),
                    direction,
                };
            }
        }
        Self {
            column: expr.to_string(),
            direction: None,
        }
    }
}

/// Trait to convert various types into ORDER BY expressions
pub trait IntoOrderBy {
    fn into_order_by(self) -> Vec<OrderByClause>;
}

impl IntoOrderBy for &str {
    fn into_order_by(self) -> Vec<OrderByClause> {
        vec![OrderByClause::parse(self)]
    }
}

impl IntoOrderBy for Vec<&str> {
    fn into_order_by(self) -> Vec<OrderByClause> {
        self.into_iter().map(OrderByClause::parse).collect()
    }
}

impl<const N: usize> IntoOrderBy for [&str; N] {
    fn into_order_by(self) -> Vec<OrderByClause> {
        self.into_iter().map(OrderByClause::parse).collect()
    }
}

impl IntoOrderBy for (&str, SortDirection) {
    fn into_order_by(self) -> Vec<OrderByClause> {
        vec![OrderByClause {
            column: self.0.to_string(),
            direction: Some(self.1),
        }]
    }
}

impl IntoOrderBy for Vec<(&str, SortDirection)> {
    fn into_order_by(self) -> Vec<OrderByClause> {
        self.into_iter()
            .flat_map(IntoOrderBy::into_order_by)
            .collect()
    }
}

/// Write ` RETURNING ...`; an empty column list means `*`
pub(crate) fn push_returning(renderer: &mut Renderer<'_>, returning: &Option<Vec<String>>) {
    if let Some(columns) = returning {
        renderer.push_str(" RETURNING ");
        if columns.is_empty() {
            renderer.push_str("*");
        } else {
            renderer.push_ident_list(columns);
        }
    }
}

/// Write ` WHERE <condition>` when there is one
pub(crate) fn push_where(
    renderer: &mut Renderer<'_>,
    condition: &Option<Condition>,
) -> Result<()> {
    if let Some(condition) = condition {
        renderer.push_str(" WHERE ");
        renderer.push_condition(condition)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::op;

    #[test]
    fn test_condition_trait_implementations() {
        assert_eq!(("name", "John").into_condition(), eq("name", "John"));
        assert_eq!(
            ("age", op::GT, 18).into_condition(),
            Condition::compare("age", Operator::Gt, 18)
        );
    }

    #[test]
    fn test_fields_desugar_to_and_of_equalities() {
        let cond = Fields::new().with("id", 1).with("name", "John").into_condition();
        assert_eq!(cond, and([eq("id", 1), eq("name", "John")]));
    }

    #[test]
    fn test_into_columns_implementations() {
        assert_eq!("name".into_columns(), vec!["name"]);
        assert_eq!(("name", "age").into_columns(), vec!["name", "age"]);
        assert_eq!(vec!["name", "age"].into_columns(), vec!["name", "age"]);
        assert_eq!(["id", "name", "age"].into_columns(), vec!["id", "name", "age"]);
    }

    #[test]
    fn test_order_by_parsing() {
        assert_eq!(
            OrderByClause::parse("created_at desc"),
            OrderByClause {
                column: "created_at".to_string(),
                direction: Some(SortDirection::Desc),
            }
        );
        assert_eq!(OrderByClause::parse("name").direction, None);
        assert_eq!(OrderByClause::parse("lower(name)  ASC").column, "lower(name)");
        assert_eq!(OrderByClause::parse("total amount").column, "total amount");
    }

    #[test]
    fn test_join_on_pairs_keep_order() {
        let on = [("a.x", "b.x"), ("a.y", "b.y")].into_join_on();
        assert_eq!(on[1], ("a.y".to_string(), "b.y".to_string()));
    }
}
