//! SELECT statement builder

use super::common::{
    impl_build, push_where, IntoColumns, IntoCondition, IntoJoinOn, IntoOrderBy, JoinClause,
    JoinType, OrderByClause, QueryBuilder,
};
use crate::condition::Condition;
use crate::render::Renderer;
use crate::{Error, Result};

/// SELECT statement.
///
/// Mutators change the statement in place and hand back `&mut Self`, so
/// calls can be chained on one statement or issued one by one:
///
/// ```
/// use brickwork_core::{select, Fields};
///
/// let mut query = select(["id", "name"]);
/// query.from("users").where_(Fields::new().with("id", 1));
/// query.limit(1);
///
/// let built = query.build_with(&Default::default()).unwrap();
/// assert_eq!(built.text, "SELECT id, name FROM users WHERE id = $1 LIMIT 1");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectStatement {
    columns: Vec<String>,
    distinct: bool,
    table: Option<String>,
    joins: Vec<JoinClause>,
    where_clause: Option<Condition>,
    group_by: Vec<String>,
    having: Option<Condition>,
    order_by: Vec<OrderByClause>,
    limit: Option<u64>,
    offset: Option<u64>,
    for_update: bool,
}

impl SelectStatement {
    /// Create an empty SELECT; with no columns it renders `SELECT *`
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selected column expressions
    pub fn columns<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.columns = columns.into_columns();
        self
    }

    /// Mark the query as DISTINCT
    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    pub fn from(&mut self, table: &str) -> &mut Self {
        self.table = Some(table.to_string());
        self
    }

    /// Add a WHERE condition, ANDed with any previous one
    ///
    /// # Examples
    /// ```
    /// use brickwork_core::{op, select_all, is_null};
    ///
    /// let query = select_all()
    ///     .from("users")
    ///     .where_(("age", op::GT, 18))
    ///     .where_(is_null("deleted_at"))
    ///     .build_with(&Default::default())
    ///     .unwrap();
    /// assert_eq!(query.text, "SELECT * FROM users WHERE age > $1 AND deleted_at IS NULL");
    /// ```
    pub fn where_<C: IntoCondition>(&mut self, condition: C) -> &mut Self {
        self.where_clause =
            Some(Condition::and_with(self.where_clause.take(), condition.into_condition()));
        self
    }

    /// Replace the GROUP BY columns
    pub fn group_by<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.group_by = columns.into_columns();
        self
    }

    /// Add a HAVING condition, ANDed with any previous one
    pub fn having<C: IntoCondition>(&mut self, condition: C) -> &mut Self {
        self.having = Some(Condition::and_with(self.having.take(), condition.into_condition()));
        self
    }

    /// Replace the ORDER BY expressions
    pub fn order_by<O: IntoOrderBy>(&mut self, exprs: O) -> &mut Self {
        self.order_by = exprs.into_order_by();
        self
    }

    pub fn limit(&mut self, count: u64) -> &mut Self {
        self.limit = Some(count);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// Append ` FOR UPDATE`
    pub fn for_update(&mut self) -> &mut Self {
        self.for_update = true;
        self
    }

    fn join<O: IntoJoinOn>(&mut self, join_type: JoinType, table: &str, on: O) -> &mut Self {
        self.joins.push(JoinClause {
            join_type,
            table: table.to_string(),
            on: on.into_join_on(),
        });
        self
    }

    /// Add an INNER JOIN; several ON pairs form a compound key
    ///
    /// # Examples
    /// ```
    /// use brickwork_core::select_all;
    ///
    /// let query = select_all()
    ///     .from("users")
    ///     .inner_join("profiles", ("users.id", "profiles.user_id"))
    ///     .build_with(&Default::default())
    ///     .unwrap();
    /// assert_eq!(
    ///     query.text,
    ///     "SELECT * FROM users INNER JOIN profiles ON users.id = profiles.user_id"
    /// );
    /// ```
    pub fn inner_join<O: IntoJoinOn>(&mut self, table: &str, on: O) -> &mut Self {
        self.join(JoinType::Inner, table, on)
    }

    pub fn left_join<O: IntoJoinOn>(&mut self, table: &str, on: O) -> &mut Self {
        self.join(JoinType::Left, table, on)
    }

    pub fn right_join<O: IntoJoinOn>(&mut self, table: &str, on: O) -> &mut Self {
        self.join(JoinType::Right, table, on)
    }

    pub fn full_join<O: IntoJoinOn>(&mut self, table: &str, on: O) -> &mut Self {
        self.join(JoinType::Full, table, on)
    }
}

impl QueryBuilder for SelectStatement {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        r.push_str("SELECT ");
        if self.distinct {
            r.push_str("DISTINCT ");
        }

        if self.columns.is_empty() {
            r.push_str("*");
        } else {
            r.push_ident_list(&self.columns);
        }

        if let Some(table) = &self.table {
            r.push_str(" FROM ");
            r.push_ident(table);
        } else if !self.joins.is_empty() {
            return Err(Error::malformed_clause("JOIN requires a FROM table"));
        }

        for join in &self.joins {
            if join.on.is_empty() {
                return Err(Error::malformed_clause(format!(
                    "JOIN {} requires at least one ON column pair",
                    join.table
                )));
            }
            r.push_str(&format!(" {} JOIN ", join.join_type));
            r.push_ident(&join.table);
            r.push_str(" ON ");
            for (i, (left, right)) in join.on.iter().enumerate() {
                if i > 0 {
                    r.push_str(" AND ");
                }
                r.push_ident(left);
                r.push_str(" = ");
                r.push_ident(right);
            }
        }

        push_where(r, &self.where_clause)?;

        if !self.group_by.is_empty() {
            r.push_str(" GROUP BY ");
            r.push_ident_list(&self.group_by);
        }

        if let Some(having) = &self.having {
            r.push_str(" HAVING ");
            r.push_condition(having)?;
        }

        if !self.order_by.is_empty() {
            r.push_str(" ORDER BY ");
            for (i, clause) in self.order_by.iter().enumerate() {
                if i > 0 {
                    r.push_str(", ");
                }
                r.push_ident(&clause.column);
                if let Some(direction) = clause.direction {
                    r.push_str(&format!(" {direction}"));
                }
            }
        }

        if let Some(limit) = self.limit {
            r.push_str(" LIMIT ");
            r.push_count("LIMIT", limit)?;
        }

        if let Some(offset) = self.offset {
            r.push_str(" OFFSET ");
            r.push_count("OFFSET", offset)?;
        }

        if self.for_update {
            r.push_str(" FOR UPDATE");
        }

        Ok(())
    }
}

impl_build!(SelectStatement);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SortDirection;
    use crate::condition::*;
    use crate::operator::op;
    use crate::{select, select_all, Dialect, Fields, PlaceholderStyle, Value};

    fn pg() -> Dialect {
        Dialect::postgres()
    }

    #[test]
    fn test_basic_select() {
        let query = select_all().from("users").build_with(&pg()).unwrap();
        assert_eq!(query.text, "SELECT * FROM users");
        assert!(query.values.is_empty());
    }

    #[test]
    fn test_select_columns() {
        let query = select(("id", "name")).from("users").build_with(&pg()).unwrap();
        assert_eq!(query.text, "SELECT id, name FROM users");
    }

    #[test]
    fn test_select_without_table() {
        let query = select("1").build_with(&pg()).unwrap();
        assert_eq!(query.text, "SELECT 1");
    }

    #[test]
    fn test_where_fields_shorthand() {
        let query = select(["id", "name"])
            .from("users")
            .where_(Fields::new().with("id", 1))
            .build_with(&pg())
            .unwrap();
        assert_eq!(query.text, "SELECT id, name FROM users WHERE id = $1");
        assert_eq!(query.values, vec![Value::I32(1)]);
    }

    #[test]
    fn test_multiple_where_calls_narrow() {
        let query = select_all()
            .from("users")
            .where_(or([eq("role", "admin"), eq("role", "owner")]))
            .where_(("active", true))
            .build_with(&pg())
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT * FROM users WHERE (role = $1 OR role = $2) AND active = $3"
        );
    }

    #[test]
    fn test_joins() {
        let query = select(["users.name", "orders.total"])
            .from("users")
            .left_join("orders", ("users.id", "orders.user_id"))
            .full_join(
                "shipments",
                [("orders.id", "shipments.order_id"), ("orders.region", "shipments.region")],
            )
            .build_with(&pg())
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT users.name, orders.total FROM users \
             LEFT JOIN orders ON users.id = orders.user_id \
             FULL OUTER JOIN shipments ON orders.id = shipments.order_id AND orders.region = shipments.region"
        );
    }

    #[test]
    fn test_right_join() {
        let query = select_all()
            .from("users")
            .right_join("profiles", ("users.id", "profiles.user_id"))
            .build_with(&pg())
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT * FROM users RIGHT JOIN profiles ON users.id = profiles.user_id"
        );
    }

    #[test]
    fn test_join_without_pairs_fails() {
        let result = select_all()
            .from("users")
            .inner_join("profiles", Vec::<(&str, &str)>::new())
            .build_with(&pg());
        assert!(matches!(result, Err(Error::MalformedClause { .. })));
    }

    #[test]
    fn test_multiple_having_calls_narrow() {
        let query = select(["department", "COUNT(*)"])
            .from("employees")
            .where_(("active", true))
            .group_by("department")
            .having(("COUNT(*)", op::GT, 5))
            .having(("AVG(salary)", op::LT, 9000))
            .build_with(&pg())
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT department, COUNT(*) FROM employees WHERE active = $1 \
             GROUP BY department HAVING COUNT(*) > $2 AND AVG(salary) < $3"
        );
        assert_eq!(
            query.values,
            vec![Value::Bool(true), Value::I32(5), Value::I32(9000)]
        );
    }

    #[test]
    fn test_empty_fields_fail_in_either_order() {
        let empty_first = select("id")
            .from("t")
            .where_(Fields::new())
            .where_(eq("x", 1))
            .build_with(&pg());
        assert!(matches!(empty_first, Err(Error::MalformedClause { .. })));

        let empty_last = select("id")
            .from("t")
            .where_(eq("x", 1))
            .where_(Fields::new())
            .build_with(&pg());
        assert!(matches!(empty_last, Err(Error::MalformedClause { .. })));

        let empty_having = select("id")
            .from("t")
            .group_by("id")
            .having(Fields::new())
            .having(("COUNT(*)", op::GT, 1))
            .build_with(&pg());
        assert!(matches!(empty_having, Err(Error::MalformedClause { .. })));
    }

    #[test]
    fn test_full_clause_order() {
        let query = select(["department", "COUNT(*)"])
            .distinct()
            .from("employees")
            .where_(gte("salary", 1000))
            .group_by("department")
            .having(("COUNT(*)", op::GT, 5))
            .order_by(["department DESC", "COUNT(*)"])
            .limit(10)
            .offset(20)
            .for_update()
            .build_with(&pg())
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT DISTINCT department, COUNT(*) FROM employees WHERE salary >= $1 \
             GROUP BY department HAVING COUNT(*) > $2 ORDER BY department DESC, COUNT(*) \
             LIMIT 10 OFFSET 20 FOR UPDATE"
        );
        assert_eq!(query.values, vec![Value::I32(1000), Value::I32(5)]);
    }

    #[test]
    fn test_order_by_and_group_by_replace() {
        let mut query = select_all();
        query
            .from("users")
            .group_by("a")
            .group_by(("b", "c"))
            .order_by("name")
            .order_by(("created_at", SortDirection::Desc));
        assert_eq!(
            query.build_with(&pg()).unwrap().text,
            "SELECT * FROM users GROUP BY b, c ORDER BY created_at DESC"
        );
    }

    #[test]
    fn test_limit_and_offset_replace() {
        let query = select_all()
            .from("users")
            .limit(5)
            .limit(10)
            .offset(1)
            .build_with(&pg())
            .unwrap();
        assert_eq!(query.text, "SELECT * FROM users LIMIT 10 OFFSET 1");
    }

    #[test]
    fn test_bound_limits_follow_where_values() {
        let dialect = Dialect {
            bind_limits: true,
            ..pg()
        };
        let query = select_all()
            .from("users")
            .where_(("active", true))
            .limit(10)
            .offset(20)
            .build_with(&dialect)
            .unwrap();
        assert_eq!(query.text, "SELECT * FROM users WHERE active = $1 LIMIT $2 OFFSET $3");
        assert_eq!(
            query.values,
            vec![Value::Bool(true), Value::I64(10), Value::I64(20)]
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        let dialect = Dialect {
            quote_char: Some('"'),
            ..pg()
        };
        let query = select(["users.id", "name"])
            .from("public.users")
            .inner_join("profiles", ("users.id", "profiles.user_id"))
            .where_(eq("name", "Jo"))
            .order_by("name DESC")
            .build_with(&dialect)
            .unwrap();
        assert_eq!(
            query.text,
            r#"SELECT "users"."id", "name" FROM "public"."users" INNER JOIN "profiles" ON "users"."id" = "profiles"."user_id" WHERE "name" = $1 ORDER BY "name" DESC"#
        );
    }

    #[test]
    fn test_in_select_shares_numbering() {
        let mut banned = select("user_id");
        banned.from("bans").where_(gt("until", 100));

        let query = select_all()
            .from("users")
            .where_(eq("active", true))
            .where_(in_select("id", banned))
            .where_(lt("age", 30))
            .build_with(&pg())
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT * FROM users WHERE active = $1 AND id IN (SELECT user_id FROM bans WHERE until > $2) AND age < $3"
        );
        assert_eq!(
            query.values,
            vec![Value::Bool(true), Value::I32(100), Value::I32(30)]
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut query = select(["id"]);
        query
            .from("users")
            .where_(and([eq("a", 1), or([eq("b", 2), not(is_null("c"))])]));
        let first = query.build_with(&pg()).unwrap();
        let second = query.build_with(&pg()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_placeholder_style_only_changes_tokens() {
        let mut query = select(["id"]);
        query.from("users").where_(and([eq("a", 1), in_list("b", [2, 3]).unwrap()]));

        let dollar = query.build_with(&pg()).unwrap();
        let question = query
            .build_with(&Dialect {
                placeholder: PlaceholderStyle::Question,
                ..pg()
            })
            .unwrap();
        assert_eq!(dollar.text, "SELECT id FROM users WHERE a = $1 AND b IN ($2, $3)");
        assert_eq!(question.text, "SELECT id FROM users WHERE a = ? AND b IN (?, ?)");
        assert_eq!(dollar.values, question.values);
    }
}
