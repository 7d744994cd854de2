//! DELETE statement builder

use super::common::{impl_build, push_returning, push_where, IntoColumns, IntoCondition, QueryBuilder};
use crate::condition::Condition;
use crate::render::Renderer;
use crate::Result;

/// DELETE statement. Without a WHERE condition it deletes every row.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    table: String,
    where_clause: Option<Condition>,
    returning: Option<Vec<String>>,
}

impl DeleteStatement {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            where_clause: None,
            returning: None,
        }
    }

    /// Add a WHERE condition, ANDed with any previous one
    pub fn where_<C: IntoCondition>(&mut self, condition: C) -> &mut Self {
        self.where_clause =
            Some(Condition::and_with(self.where_clause.take(), condition.into_condition()));
        self
    }

    /// Append `RETURNING <columns>`; an empty list renders `RETURNING *`
    pub fn returning<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.returning = Some(columns.into_columns());
        self
    }
}

impl QueryBuilder for DeleteStatement {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        r.push_str("DELETE FROM ");
        r.push_ident(&self.table);
        push_where(r, &self.where_clause)?;
        push_returning(r, &self.returning);
        Ok(())
    }
}

impl_build!(DeleteStatement);

#[cfg(test)]
mod tests {
    use crate::condition::{eq, lt, or};
    use crate::operator::op;
    use crate::{delete_from, Dialect, Fields, Value};

    fn pg() -> Dialect {
        Dialect::postgres()
    }

    #[test]
    fn test_delete_builder() {
        let query = delete_from("users")
            .where_(Fields::new().with("id", 1))
            .build_with(&pg())
            .unwrap();
        assert_eq!(query.text, "DELETE FROM users WHERE id = $1");
        assert_eq!(query.values, vec![Value::I32(1)]);
    }

    #[test]
    fn test_delete_without_where() {
        let query = delete_from("users").build_with(&pg()).unwrap();
        assert_eq!(query.text, "DELETE FROM users");
    }

    #[test]
    fn test_delete_multiple_conditions() {
        let query = delete_from("users")
            .where_(or([lt("age", 18), eq("status", "inactive")]))
            .where_(("created_at", op::LT, "2020-01-01"))
            .returning("id")
            .build_with(&pg())
            .unwrap();
        assert_eq!(
            query.text,
            "DELETE FROM users WHERE (age < $1 OR status = $2) AND created_at < $3 RETURNING id"
        );
    }
}
