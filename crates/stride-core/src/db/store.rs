//! Generic entity store over the shared table shape.
//!
//! Every entity table has the same physical layout: indexed metadata columns
//! (`id`, `owner_id`, `created_at`, `updated_at`, `synced`) plus the full
//! record serialized as JSON in `data`. The `synced` column is authoritative
//! on read; the copy inside `data` may lag behind it.

use libsql::Connection;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Entity, RecordId, Table};
use crate::util::unix_millis_now;

/// Fields managed by the store itself; a partial update may not touch them.
const RESERVED_FIELDS: [&str; 3] = ["id", "owner_id", "created_at"];

/// CRUD access to the entity tables
pub struct EntityStore<'a> {
    conn: &'a Connection,
}

impl<'a> EntityStore<'a> {
    /// Create a new store over the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Persist a new record
    pub async fn add<E: Entity>(&self, record: &E) -> Result<()> {
        let data = serde_json::to_string(record)?;
        let sql = format!(
            "INSERT INTO {} (id, owner_id, created_at, updated_at, synced, data)
             VALUES (?, ?, ?, ?, ?, ?)",
            E::TABLE
        );
        self.conn
            .execute(
                &sql,
                libsql::params![
                    record.id().as_str(),
                    record.owner_id(),
                    record.created_at(),
                    record.updated_at(),
                    i32::from(record.synced()),
                    data
                ],
            )
            .await?;
        Ok(())
    }

    /// Fetch a record by id
    pub async fn get<E: Entity>(&self, id: RecordId) -> Result<Option<E>> {
        let sql = format!("SELECT data, synced FROM {} WHERE id = ?", E::TABLE);
        let mut rows = self
            .conn
            .query(&sql, libsql::params![id.as_str()])
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };

        let data: String = row.get(0)?;
        let synced: i32 = row.get(1)?;
        let mut record: E = serde_json::from_str(&data)?;
        record.set_synced(synced != 0);
        Ok(Some(record))
    }

    /// List an owner's records, most recently updated first
    pub async fn list<E: Entity>(&self, owner_id: &str) -> Result<Vec<E>> {
        let sql = format!(
            "SELECT data, synced FROM {} WHERE owner_id = ? ORDER BY updated_at DESC",
            E::TABLE
        );
        let mut rows = self.conn.query(&sql, libsql::params![owner_id]).await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            let data: String = row.get(0)?;
            let synced: i32 = row.get(1)?;
            let mut record: E = serde_json::from_str(&data)?;
            record.set_synced(synced != 0);
            records.push(record);
        }
        Ok(records)
    }

    /// List an owner's records matching a predicate, most recently updated first
    pub async fn query<E, F>(&self, owner_id: &str, predicate: F) -> Result<Vec<E>>
    where
        E: Entity,
        F: Fn(&E) -> bool,
    {
        let mut records = self.list::<E>(owner_id).await?;
        records.retain(|record| predicate(record));
        Ok(records)
    }

    /// Replace an existing record in full
    ///
    /// The caller is expected to have bumped `updated_at` (see
    /// [`Entity::touch`]). Fails with [`Error::NotFound`] when the id does
    /// not exist.
    pub async fn put<E: Entity>(&self, record: &E) -> Result<()> {
        let data = serde_json::to_string(record)?;
        let sql = format!(
            "UPDATE {} SET updated_at = ?, synced = ?, data = ? WHERE id = ?",
            E::TABLE
        );
        let rows = self
            .conn
            .execute(
                &sql,
                libsql::params![
                    record.updated_at(),
                    i32::from(record.synced()),
                    data,
                    record.id().as_str()
                ],
            )
            .await?;

        if rows == 0 {
            return Err(Error::NotFound(record.id().to_string()));
        }
        Ok(())
    }

    /// Merge partial fields into an existing record
    ///
    /// Bumps `updated_at` and clears `synced`. Fails with
    /// [`Error::NotFound`] when the id does not exist and
    /// [`Error::InvalidInput`] when the partial touches store-managed fields.
    pub async fn update_fields(
        &self,
        table: Table,
        id: RecordId,
        partial: &Value,
    ) -> Result<()> {
        let Some(fields) = partial.as_object() else {
            return Err(Error::InvalidInput(
                "partial update must be a JSON object".to_string(),
            ));
        };
        for reserved in RESERVED_FIELDS {
            if fields.contains_key(reserved) {
                return Err(Error::InvalidInput(format!(
                    "field '{reserved}' is immutable"
                )));
            }
        }

        let sql = format!("SELECT data FROM {table} WHERE id = ?");
        let mut rows = self
            .conn
            .query(&sql, libsql::params![id.as_str()])
            .await?;
        let Some(row) = rows.next().await? else {
            return Err(Error::NotFound(id.to_string()));
        };

        let data: String = row.get(0)?;
        let mut record: Value = serde_json::from_str(&data)?;
        let Some(merged) = record.as_object_mut() else {
            return Err(Error::Database(format!(
                "corrupt record {id} in table {table}"
            )));
        };

        for (key, value) in fields {
            merged.insert(key.clone(), value.clone());
        }
        let now = unix_millis_now();
        merged.insert("updated_at".to_string(), Value::from(now));
        merged.insert("synced".to_string(), Value::from(false));

        let sql = format!("UPDATE {table} SET updated_at = ?, synced = 0, data = ? WHERE id = ?");
        self.conn
            .execute(
                &sql,
                libsql::params![now, serde_json::to_string(&record)?, id.as_str()],
            )
            .await?;
        Ok(())
    }

    /// Remove a record; deleting a non-existent id is not an error
    pub async fn delete(&self, table: Table, id: RecordId) -> Result<()> {
        let sql = format!("DELETE FROM {table} WHERE id = ?");
        self.conn
            .execute(&sql, libsql::params![id.as_str()])
            .await?;
        Ok(())
    }

    /// Flag a record as acknowledged by the remote backend
    ///
    /// No-op when the record has since been deleted locally.
    pub async fn mark_synced(&self, table: Table, id: RecordId) -> Result<()> {
        let sql = format!("UPDATE {table} SET synced = 1 WHERE id = ?");
        self.conn
            .execute(&sql, libsql::params![id.as_str()])
            .await?;
        Ok(())
    }

    /// Remove every record belonging to an owner, across all entity tables
    pub async fn delete_owner(&self, owner_id: &str) -> Result<()> {
        for table in Table::ALL {
            let sql = format!("DELETE FROM {table} WHERE owner_id = ?");
            self.conn
                .execute(&sql, libsql::params![owner_id])
                .await?;
        }
        Ok(())
    }
}
