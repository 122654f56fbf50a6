//! Query builder over one collection.

use crate::model::entity::{CollectionName, Entity};
use crate::store::filter::{write_field, Filter};
use crate::store::StoreResult;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Sort direction for an ordering key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Lazily built query; nothing runs until `count` or `to_list`.
///
/// Without an ordering key, documents come back in ascending id order.
pub struct Query<'conn, T> {
    conn: &'conn Connection,
    collection: CollectionName,
    filter: Option<Filter>,
    order_by: Option<(String, SortOrder)>,
    skip: u64,
    limit: Option<u64>,
    _entity: PhantomData<fn() -> T>,
}

impl<'conn, T: Entity> Query<'conn, T> {
    pub(crate) fn new(conn: &'conn Connection, collection: CollectionName) -> Self {
        Self {
            conn,
            collection,
            filter: None,
            order_by: None,
            skip: 0,
            limit: None,
            _entity: PhantomData,
        }
    }

    /// Restricts the result set; repeated calls are combined with `AND`.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(filter),
            None => filter,
        });
        self
    }

    /// Orders results by a field path; replaces any previous ordering key.
    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = Some((field.into(), order));
        self
    }

    pub fn skip(mut self, count: u64) -> Self {
        self.skip = count;
        self
    }

    pub fn limit(mut self, count: u64) -> Self {
        self.limit = Some(count);
        self
    }

    /// Counts documents matching the filter, ignoring ordering and slicing.
    pub fn count(&self) -> StoreResult<u64> {
        let mut binds = Vec::new();
        let sql = format!(
            "SELECT COUNT(*) FROM documents {}",
            self.where_clause(&mut binds)?
        );

        let count = self
            .conn
            .query_row(&sql, params_from_iter(binds), |row| row.get::<_, i64>(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Runs the query and decodes every matching document.
    pub fn to_list(self) -> StoreResult<Vec<T>> {
        let mut binds = Vec::new();
        let mut sql = format!("SELECT body FROM documents {}", self.where_clause(&mut binds)?);

        sql.push_str(" ORDER BY ");
        if let Some((field, order)) = &self.order_by {
            write_field(&mut sql, &mut binds, field)?;
            sql.push(' ');
            sql.push_str(order.sql());
            sql.push_str(", ");
        }
        sql.push_str("id ASC");

        match self.limit {
            Some(limit) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                binds.push(SqlValue::Integer(to_sql_integer(limit)));
                binds.push(SqlValue::Integer(to_sql_integer(self.skip)));
            }
            None if self.skip > 0 => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                binds.push(SqlValue::Integer(to_sql_integer(self.skip)));
            }
            None => {}
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut documents = Vec::new();

        while let Some(row) = rows.next()? {
            let body: String = row.get(0)?;
            documents.push(serde_json::from_str(&body)?);
        }

        Ok(documents)
    }

    fn where_clause(&self, binds: &mut Vec<SqlValue>) -> StoreResult<String> {
        let mut sql = String::from("WHERE collection = ?");
        binds.push(SqlValue::Text(self.collection.as_str().to_string()));

        if let Some(filter) = &self.filter {
            sql.push_str(" AND ");
            filter.write_sql(&mut sql, binds)?;
        }

        Ok(sql)
    }
}

fn to_sql_integer(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
