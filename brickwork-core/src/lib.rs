//! Brickwork Core - composable SQL statement builders.
//!
//! Statements are plain mutable values: a factory creates one, chained
//! mutators fill in its clauses, and `build()` renders SQL text plus the
//! ordered list of bound values. Nothing here talks to a database.
//!
//! ```
//! use brickwork_core::{select, Dialect, Fields, PlaceholderStyle};
//!
//! let mut query = select(["id", "name"]);
//! query.from("users").where_(Fields::new().with("id", 1));
//!
//! let built = query.build_with(&Dialect::postgres()).unwrap();
//! assert_eq!(built.text, "SELECT id, name FROM users WHERE id = $1");
//!
//! let mysql = Dialect { placeholder: PlaceholderStyle::Question, ..Dialect::postgres() };
//! assert_eq!(query.build_with(&mysql).unwrap().text, "SELECT id, name FROM users WHERE id = ?");
//! ```

pub mod builder;
pub mod condition;
pub mod dialect;
pub mod error;
pub mod operator;
pub mod render;
pub mod value;

// Re-export main types
pub use builder::{
    DeleteStatement, InsertStatement, IntoColumns, IntoCondition, JoinType, QueryBuilder,
    SelectStatement, SortDirection, UpdateStatement,
};
pub use condition::{
    and, between, eq, gt, gte, ilike, in_list, in_select, is_not_null, is_null, like, lt, lte,
    not, not_eq, or, raw, Condition, LogicalOp,
};
pub use dialect::{set_option, set_options, Dialect, PlaceholderStyle};
pub use error::{Error, Result};
pub use operator::{op, Operator};
pub use render::{Renderer, SqlQuery};
pub use value::{Fields, Value};

/// Create a SELECT of the given column expressions
pub fn select<C: IntoColumns>(columns: C) -> SelectStatement {
    let mut statement = SelectStatement::new();
    statement.columns(columns);
    statement
}

/// Create a `SELECT *`
pub fn select_all() -> SelectStatement {
    SelectStatement::new()
}

/// Create an empty INSERT; set the table with `.into_table()`
pub fn insert() -> InsertStatement {
    InsertStatement::new()
}

/// Create an UPDATE for the given table
pub fn update(table: &str) -> UpdateStatement {
    UpdateStatement::new(table)
}

/// Create a DELETE for the given table
pub fn delete_from(table: &str) -> DeleteStatement {
    DeleteStatement::new(table)
}
