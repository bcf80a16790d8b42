//! The write path every interface goes through.
//!
//! Each mutation lands in the local store first and then appends a matching
//! outbox entry; the pair is what the sync engine later replays. Callers get
//! their result as soon as the local write commits.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::auth::IdentityProvider;
use crate::db::{Database, EntityStore, Operation, OutboxPayload, OutboxRepository};
use crate::error::{Error, Result};
use crate::models::{Entity, EntitySnapshot, RecordId};
use crate::state::SyncState;
use crate::sync::{RemoteBackend, SyncEngine, SyncStatus};

/// High-level entity operations scoped to the signed-in owner
pub struct AppService<B, I> {
    db: Arc<Mutex<Database>>,
    engine: SyncEngine<B, I>,
}

impl<B, I> std::fmt::Debug for AppService<B, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppService").finish_non_exhaustive()
    }
}

impl<B, I> Clone for AppService<B, I> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            engine: self.engine.clone(),
        }
    }
}

impl<B, I> AppService<B, I>
where
    B: RemoteBackend + 'static,
    I: IdentityProvider + 'static,
{
    pub fn new(db: Arc<Mutex<Database>>, backend: B, identity: I, initially_online: bool) -> Self {
        let engine = SyncEngine::new(Arc::clone(&db), backend, identity, initially_online);
        Self { db, engine }
    }

    pub fn engine(&self) -> &SyncEngine<B, I> {
        &self.engine
    }

    fn owner_id(&self) -> Result<String> {
        self.engine
            .identity()
            .current_owner_id()
            .ok_or_else(|| Error::InvalidInput("no signed-in identity".to_string()))
    }

    /// Persist a new record and queue its remote create.
    ///
    /// The record must carry the signed-in owner's id.
    pub async fn create<E>(&self, record: E) -> Result<()>
    where
        E: Entity + Into<EntitySnapshot> + Clone,
    {
        let owner = self.owner_id()?;
        if record.owner_id() != owner {
            return Err(Error::InvalidInput(
                "record owner does not match the signed-in identity".to_string(),
            ));
        }

        {
            let db = self.db.lock().await;
            EntityStore::new(db.connection()).add(&record).await?;
        }
        self.engine
            .enqueue(
                Operation::Create,
                OutboxPayload::Upsert {
                    snapshot: record.into(),
                },
            )
            .await?;
        Ok(())
    }

    /// Replace a record in full and queue its remote update.
    ///
    /// Bumps `updated_at` and clears `synced` on the caller's copy so it
    /// matches what was stored.
    pub async fn update<E>(&self, record: &mut E) -> Result<()>
    where
        E: Entity + Into<EntitySnapshot> + Clone,
    {
        let owner = self.owner_id()?;
        if record.owner_id() != owner {
            return Err(Error::InvalidInput(
                "record owner does not match the signed-in identity".to_string(),
            ));
        }

        record.touch();
        {
            let db = self.db.lock().await;
            EntityStore::new(db.connection()).put(record).await?;
        }
        self.engine
            .enqueue(
                Operation::Update,
                OutboxPayload::Upsert {
                    snapshot: record.clone().into(),
                },
            )
            .await?;
        Ok(())
    }

    /// Merge partial fields into a record and queue the updated snapshot.
    ///
    /// Returns the record as stored after the merge.
    pub async fn patch<E>(&self, id: RecordId, partial: &Value) -> Result<E>
    where
        E: Entity + Into<EntitySnapshot> + Clone,
    {
        let owner = self.owner_id()?;

        let updated = {
            let db = self.db.lock().await;
            let store = EntityStore::new(db.connection());

            let existing: E = store
                .get(id)
                .await?
                .ok_or_else(|| Error::NotFound(id.to_string()))?;
            if existing.owner_id() != owner {
                return Err(Error::NotFound(id.to_string()));
            }

            store.update_fields(E::TABLE, id, partial).await?;
            store
                .get::<E>(id)
                .await?
                .ok_or_else(|| Error::NotFound(id.to_string()))?
        };

        self.engine
            .enqueue(
                Operation::Update,
                OutboxPayload::Upsert {
                    snapshot: updated.clone().into(),
                },
            )
            .await?;
        Ok(updated)
    }

    /// Remove a record and queue its remote delete.
    ///
    /// Deleting an id that does not exist locally is a no-op.
    pub async fn delete<E>(&self, id: RecordId) -> Result<()>
    where
        E: Entity,
    {
        let owner = self.owner_id()?;

        {
            let db = self.db.lock().await;
            let store = EntityStore::new(db.connection());

            let Some(existing) = store.get::<E>(id).await? else {
                return Ok(());
            };
            if existing.owner_id() != owner {
                return Err(Error::NotFound(id.to_string()));
            }
            store.delete(E::TABLE, id).await?;
        }

        self.engine
            .enqueue(
                Operation::Delete,
                OutboxPayload::Delete {
                    table: E::TABLE,
                    id,
                },
            )
            .await?;
        Ok(())
    }

    /// Fetch one of the signed-in owner's records; other owners' ids read
    /// as absent
    pub async fn get<E: Entity>(&self, id: RecordId) -> Result<Option<E>> {
        let owner = self.owner_id()?;
        let db = self.db.lock().await;
        let record = EntityStore::new(db.connection()).get::<E>(id).await?;
        Ok(record.filter(|record| record.owner_id() == owner))
    }

    /// List the signed-in owner's records, most recently updated first
    pub async fn list<E: Entity>(&self) -> Result<Vec<E>> {
        let owner = self.owner_id()?;
        let db = self.db.lock().await;
        EntityStore::new(db.connection()).list(&owner).await
    }

    /// List the signed-in owner's records matching a predicate
    pub async fn query<E, F>(&self, predicate: F) -> Result<Vec<E>>
    where
        E: Entity,
        F: Fn(&E) -> bool,
    {
        let owner = self.owner_id()?;
        let db = self.db.lock().await;
        EntityStore::new(db.connection()).query(&owner, predicate).await
    }

    /// Erase the signed-in owner's data from this device.
    ///
    /// Local only: nothing is queued, and pending outbox entries are dropped
    /// rather than replayed against an account being removed from the device.
    pub async fn wipe_owner(&self) -> Result<()> {
        let owner = self.owner_id()?;
        let db = self.db.lock().await;
        EntityStore::new(db.connection()).delete_owner(&owner).await?;
        OutboxRepository::new(db.connection()).clear().await?;
        tracing::info!("Wiped local data for the signed-in account");
        Ok(())
    }

    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.engine.status()
    }

    pub async fn pending(&self) -> Result<usize> {
        self.engine.pending().await
    }

    pub async fn sync_state(&self) -> Result<SyncState> {
        self.engine.sync_state().await
    }

    /// Run a drain pass now instead of waiting for a connectivity event
    pub async fn sync(&self) -> Result<()> {
        self.engine.drain().await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::auth::StaticIdentity;
    use crate::models::{Note, Table, Task};
    use crate::sync::FakeBackend;

    use super::*;

    type TestService = AppService<FakeBackend, StaticIdentity>;

    async fn service(identity: StaticIdentity, online: bool) -> (TestService, FakeBackend) {
        let db = Arc::new(Mutex::new(Database::open_in_memory().await.unwrap()));
        let backend = FakeBackend::default();
        let service = AppService::new(db, backend.clone(), identity, online);
        (service, backend)
    }

    async fn owner_service(online: bool) -> (TestService, FakeBackend) {
        service(StaticIdentity::new("owner-1", "token"), online).await
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_offline_saves_locally_and_queues() {
        let (service, backend) = owner_service(false).await;

        let task = Task::new("owner-1", "write report");
        service.create(task.clone()).await.unwrap();

        let fetched: Task = service.get(task.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "write report");
        assert!(!fetched.synced);
        assert_eq!(service.pending().await.unwrap(), 1);
        assert!(backend.calls().is_empty());

        service.engine().set_online(true);
        service.sync().await.unwrap();

        assert!(service.get::<Task>(task.id).await.unwrap().unwrap().synced);
        assert_eq!(service.pending().await.unwrap(), 0);
        assert!(backend.remote_record(Table::Tasks, task.id).is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_rejects_foreign_owner() {
        let (service, _backend) = owner_service(false).await;

        let result = service.create(Task::new("owner-2", "not yours")).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(service.pending().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn signed_out_writes_are_rejected() {
        let (service, _backend) = service(StaticIdentity::signed_out(), false).await;

        let result = service.create(Task::new("owner-1", "nobody home")).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn update_touches_and_queues_new_snapshot() {
        let (service, _backend) = owner_service(false).await;

        let mut note = Note::new("owner-1", "draft", "text");
        service.create(note.clone()).await.unwrap();
        let created_updated_at = note.updated_at;

        note.title = "final".to_string();
        service.update(&mut note).await.unwrap();

        assert!(note.updated_at >= created_updated_at);
        assert!(!note.synced);

        let fetched: Note = service.get(note.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "final");
        assert_eq!(service.pending().await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn patch_merges_and_returns_stored_record() {
        let (service, backend) = owner_service(false).await;

        let task = Task::new("owner-1", "rough");
        service.create(task.clone()).await.unwrap();

        let patched: Task = service
            .patch(task.id, &json!({ "title": "polished", "completed": true }))
            .await
            .unwrap();
        assert_eq!(patched.title, "polished");
        assert!(patched.completed);
        assert!(!patched.synced);

        service.engine().set_online(true);
        service.sync().await.unwrap();

        let remote = backend.remote_record(Table::Tasks, task.id).unwrap();
        assert_eq!(remote["title"], "polished");
        assert_eq!(remote["completed"], true);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn patch_rejects_reserved_fields_and_foreign_records() {
        let (service, _backend) = owner_service(false).await;

        let task = Task::new("owner-1", "mine");
        service.create(task.clone()).await.unwrap();

        let result = service
            .patch::<Task>(task.id, &json!({ "owner_id": "owner-2" }))
            .await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        // A foreign record reads as absent rather than leaking its existence
        let foreign = Task::new("owner-2", "theirs");
        {
            let db = service.db.lock().await;
            EntityStore::new(db.connection()).add(&foreign).await.unwrap();
        }
        let result = service
            .patch::<Task>(foreign.id, &json!({ "title": "hijacked" }))
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_queues_and_tolerates_absent_ids() {
        let (service, backend) = owner_service(false).await;

        let task = Task::new("owner-1", "temp");
        service.create(task.clone()).await.unwrap();
        service.delete::<Task>(task.id).await.unwrap();

        assert!(service.get::<Task>(task.id).await.unwrap().is_none());
        assert_eq!(service.pending().await.unwrap(), 2);

        // Absent id: nothing stored, nothing queued
        service.delete::<Task>(RecordId::new()).await.unwrap();
        assert_eq!(service.pending().await.unwrap(), 2);

        service.engine().set_online(true);
        service.sync().await.unwrap();
        assert!(backend.remote_record(Table::Tasks, task.id).is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_and_query_are_owner_scoped() {
        let (service, _backend) = owner_service(false).await;

        service.create(Task::new("owner-1", "a")).await.unwrap();
        let mut done = Task::new("owner-1", "b");
        done.completed = true;
        service.create(done).await.unwrap();
        {
            let db = service.db.lock().await;
            EntityStore::new(db.connection())
                .add(&Task::new("owner-2", "hidden"))
                .await
                .unwrap();
        }

        let all: Vec<Task> = service.list().await.unwrap();
        assert_eq!(all.len(), 2);

        let open: Vec<Task> = service.query(|task: &Task| !task.completed).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].title, "a");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn wipe_owner_clears_records_and_queue() {
        let (service, backend) = owner_service(false).await;

        service.create(Task::new("owner-1", "gone")).await.unwrap();
        service.create(Note::new("owner-1", "n", "c")).await.unwrap();
        assert_eq!(service.pending().await.unwrap(), 2);

        service.wipe_owner().await.unwrap();

        assert!(service.list::<Task>().await.unwrap().is_empty());
        assert!(service.list::<Note>().await.unwrap().is_empty());
        assert_eq!(service.pending().await.unwrap(), 0);

        // Nothing left to replay once connectivity returns
        service.engine().set_online(true);
        service.sync().await.unwrap();
        assert!(backend.calls().is_empty());
    }
}
