//! Statement builders

pub mod common;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use common::{
    IntoColumns, IntoCondition, IntoJoinOn, IntoOrderBy, JoinClause, JoinType, OrderByClause,
    QueryBuilder, SortDirection,
};
pub use delete::DeleteStatement;
pub use insert::InsertStatement;
pub use select::SelectStatement;
pub use update::UpdateStatement;
