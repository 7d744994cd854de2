//! UPDATE statement builder

use super::common::{impl_build, push_returning, push_where, IntoColumns, IntoCondition, QueryBuilder};
use crate::condition::Condition;
use crate::render::Renderer;
use crate::{Error, Fields, Result};

/// UPDATE statement
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    table: String,
    assignments: Fields,
    where_clause: Option<Condition>,
    returning: Option<Vec<String>>,
}

impl UpdateStatement {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            assignments: Fields::new(),
            where_clause: None,
            returning: None,
        }
    }

    /// Replace the SET assignments
    ///
    /// # Examples
    /// ```
    /// use brickwork_core::{update, Fields};
    ///
    /// let query = update("users")
    ///     .set(Fields::new().with("name", "Joe"))
    ///     .unwrap()
    ///     .where_(Fields::new().with("id", 1).with("name", "John"))
    ///     .build_with(&Default::default())
    ///     .unwrap();
    /// assert_eq!(query.text, "UPDATE users SET name = $1 WHERE id = $2 AND name = $3");
    /// ```
    pub fn set(&mut self, assignments: Fields) -> Result<&mut Self> {
        if assignments.is_empty() {
            return Err(Error::malformed_clause("UPDATE requires SET clauses"));
        }
        self.assignments = assignments;
        Ok(self)
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

impl QueryBuilder for UpdateStatement {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        if self.assignments.is_empty() {
            return Err(Error::malformed_clause("UPDATE requires SET clauses"));
        }

        r.push_str("UPDATE ");
        r.push_ident(&self.table);

        r.push_str(" SET ");
        for (i, (column, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                r.push_str(", ");
            }
            r.push_ident(column);
            r.push_str(" = ");
            r.push_value(value.clone());
        }

        push_where(r, &self.where_clause)?;
        push_returning(r, &self.returning);
        Ok(())
    }
}

impl_build!(UpdateStatement);
