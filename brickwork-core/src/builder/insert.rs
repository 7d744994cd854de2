//! INSERT statement builder

use super::common::{impl_build, push_returning, IntoColumns, QueryBuilder};
use super::select::SelectStatement;
use crate::render::Renderer;
use crate::{Error, Fields, Result, Value};

/// Where the inserted rows come from
#[derive(Debug, Clone, Default, PartialEq)]
enum InsertSource {
    #[default]
    Empty,
    /// Row cells already laid out in `columns` order
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    Select(Box<SelectStatement>),
}

/// INSERT statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertStatement {
    table: Option<String>,
    source: InsertSource,
    select_columns: Vec<String>,
    returning: Option<Vec<String>>,
}

impl InsertStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target table (`INSERT INTO <table>`)
    pub fn into_table(&mut self, table: &str) -> &mut Self {
        self.table = Some(table.to_string());
        self
    }

    /// Replace the inserted rows.
    ///
    /// The first row's keys define the column list; every other row must
    /// carry the same set of columns, in any order.
    ///
    /// # Examples
    /// ```
    /// use brickwork_core::{insert, Fields};
    ///
    /// let query = insert()
    ///     .into_table("users")
    ///     .values([
    ///         Fields::new().with("id", 1).with("name", "John"),
    ///         Fields::new().with("id", 2).with("name", "Joe"),
    ///     ])
    ///     .unwrap()
    ///     .build_with(&Default::default())
    ///     .unwrap();
    /// assert_eq!(query.text, "INSERT INTO users (id, name) VALUES ($1, $2), ($3, $4)");
    /// ```
    pub fn values<I>(&mut self, rows: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Fields>,
    {
        if matches!(self.source, InsertSource::Select(_)) {
            return Err(Error::malformed_clause(
                "INSERT cannot combine row values with a sub-select",
            ));
        }

        let mut rows = rows.into_iter();
        let first = rows
            .next()
            .ok_or_else(|| Error::malformed_clause("INSERT requires at least one row"))?;
        if first.is_empty() {
            return Err(Error::malformed_clause("INSERT row has no columns"));
        }

        let columns: Vec<String> = first.columns().map(str::to_string).collect();
        let mut laid_out = vec![first.into_iter().map(|(_, value)| value).collect()];

        for (index, row) in rows.enumerate() {
            let mismatch = || {
                Error::malformed_clause(format!(
                    "INSERT row {} columns ({}) do not match ({})",
                    index + 2,
                    row.columns().collect::<Vec<_>>().join(", "),
                    columns.join(", ")
                ))
            };
            if row.len() != columns.len() {
                return Err(mismatch());
            }
            let cells = columns
                .iter()
                .map(|column| row.get(column).cloned().ok_or_else(mismatch))
                .collect::<Result<Vec<Value>>>()?;
            laid_out.push(cells);
        }

        self.source = InsertSource::Rows {
            columns,
            rows: laid_out,
        };
        Ok(self)
    }

    /// Insert the rows produced by `query` (`INSERT INTO ... SELECT ...`)
    pub fn select(&mut self, query: SelectStatement) -> Result<&mut Self> {
        if matches!(self.source, InsertSource::Rows { .. }) {
            return Err(Error::malformed_clause(
                "INSERT cannot combine a sub-select with row values",
            ));
        }
        self.source = InsertSource::Select(Box::new(query));
        Ok(self)
    }

    /// Target column list for `INSERT ... SELECT`
    pub fn columns<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.select_columns = columns.into_columns();
        self
    }

    /// Append `RETURNING <columns>`; an empty list renders `RETURNING *`
    pub fn returning<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.returning = Some(columns.into_columns());
        self
    }

    /// Append `RETURNING *`
    pub fn returning_all(&mut self) -> &mut Self {
        self.returning = Some(Vec::new());
        self
    }
}

impl QueryBuilder for InsertStatement {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        let table = self.table.as_deref().ok_or_else(|| {
            Error::malformed_clause("INSERT requires a target table, set with .into_table()")
        })?;

        r.push_str("INSERT INTO ");
        r.push_ident(table);

        match &self.source {
            InsertSource::Empty => {
                return Err(Error::malformed_clause(
                    "INSERT requires values or a sub-select",
                ));
            }
            InsertSource::Rows { columns, rows } => {
                if !self.select_columns.is_empty() {
                    return Err(Error::malformed_clause(
                        ".columns() applies to INSERT ... SELECT; row values define their own columns",
                    ));
                }
                r.push_str(" (");
                r.push_ident_list(columns);
                r.push_str(") VALUES ");
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        r.push_str(", ");
                    }
                    r.push_str("(");
                    for (j, value) in row.iter().enumerate() {
                        if j > 0 {
                            r.push_str(", ");
                        }
                        r.push_value(value.clone());
                    }
                    r.push_str(")");
                }
            }
            InsertSource::Select(query) => {
                if !self.select_columns.is_empty() {
                    r.push_str(" (");
                    r.push_ident_list(&self.select_columns);
                    r.push_str(")");
                }
                r.push_str(" ");
                query.render(r)?;
            }
        }

        push_returning(r, &self.returning);
        Ok(())
    }
}

impl_build!(InsertStatement);
