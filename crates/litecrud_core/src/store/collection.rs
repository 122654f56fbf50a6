//! Primary-key operations over one named collection.

use crate::model::entity::{CollectionName, Entity, EntityId, UNASSIGNED_ID};
use crate::store::query::Query;
use crate::store::StoreResult;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::marker::PhantomData;

/// Typed view over the documents of one entity type.
pub struct Collection<'conn, T> {
    conn: &'conn Connection,
    name: CollectionName,
    _entity: PhantomData<fn() -> T>,
}

impl<'conn, T: Entity> Collection<'conn, T> {
    pub(crate) fn new(conn: &'conn Connection, name: CollectionName) -> Self {
        Self {
            conn,
            name,
            _entity: PhantomData,
        }
    }

    /// Inserts `entity` and returns its id.
    ///
    /// An unassigned id (`0`) is replaced by `max(id) + 1` for this
    /// collection and written back into `entity`.
    ///
    /// # Errors
    /// - SQLite constraint failure when the id is already taken.
    /// - Serialization failure of the document body.
    ///
    /// On error the entity keeps the id it was passed with.
    pub fn insert(&self, entity: &mut T) -> StoreResult<EntityId> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let assigned = entity.id() == UNASSIGNED_ID;
        if assigned {
            let next_id: EntityId = tx.query_row(
                "SELECT COALESCE(MAX(id), 0) + 1 FROM documents WHERE collection = ?1;",
                [self.name.as_str()],
                |row| row.get(0),
            )?;
            entity.set_id(next_id);
        }

        let result = self.write_document(&tx, entity).and_then(|id| {
            tx.commit()?;
            Ok(id)
        });
        if result.is_err() && assigned {
            entity.set_id(UNASSIGNED_ID);
        }
        result
    }

    fn write_document(&self, tx: &Transaction<'_>, entity: &T) -> StoreResult<EntityId> {
        let id = entity.id();
        let body = serde_json::to_string(entity)?;
        tx.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3);",
            params![self.name.as_str(), id, body],
        )?;
        Ok(id)
    }

    pub fn find_by_id(&self, id: EntityId) -> StoreResult<Option<T>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2;",
                params![self.name.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    /// Returns every document in ascending id order.
    pub fn find_all(&self) -> StoreResult<Vec<T>> {
        self.query().to_list()
    }

    /// Replaces the stored document with the same id.
    ///
    /// Returns `false` when no document with that id exists.
    pub fn update(&self, entity: &T) -> StoreResult<bool> {
        let body = serde_json::to_string(entity)?;
        let changed = self.conn.execute(
            "UPDATE documents
             SET
                body = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE collection = ?1 AND id = ?2;",
            params![self.name.as_str(), entity.id(), body],
        )?;
        Ok(changed > 0)
    }

    /// Removes the document with `id`; returns `false` when none existed.
    pub fn delete(&self, id: EntityId) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2;",
            params![self.name.as_str(), id],
        )?;
        Ok(changed > 0)
    }

    pub fn query(&self) -> Query<'conn, T> {
        Query::new(self.conn, self.name)
    }
}
