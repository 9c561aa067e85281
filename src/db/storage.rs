//! redb-based record store.
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `workspaces` | `workspace_id` | `Workspace` | Workspace registry |
//! | `table_states` | `(workspace_id, table_number)` | `TableState` | Floor tables |
//! | `parties` | `(workspace_id, party_id)` | `Party` | Waitlist |
//! | `combos` | `(workspace_id, combo_id)` | `Combo` | Merged tables |
//! | `seatings` | `(workspace_id, seating_id)` | `SeatingRecord` | History (append-only) |
//!
//! # Transactions
//!
//! Every state-machine mutation runs inside one `begin_write()`
//! transaction: read, validate preconditions, write all affected records,
//! commit. Dropping the transaction without committing aborts it, so a
//! precondition failure has zero side effects. redb serializes write
//! transactions, which makes concurrent seat attempts on the same table
//! resolve to exactly one winner.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::db::models::{Combo, Party, SeatingRecord, TableState, Workspace};

const WORKSPACES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("workspaces");
const TABLE_STATES_TABLE: TableDefinition<(&str, u32), &[u8]> =
    TableDefinition::new("table_states");
const PARTIES_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("parties");
const COMBOS_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("combos");
const SEATINGS_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("seatings");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Record store backed by redb.
#[derive(Clone)]
pub struct FloorStorage {
    db: Arc<Database>,
}

impl FloorStorage {
    /// Open or create the database at the given path.
    ///
    /// redb commits with `Durability::Immediate`: once `commit()` returns
    /// the data is persistent, and the file is always in a consistent
    /// state (copy-on-write with atomic pointer swap).
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (tests, demos).
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let _ = txn.open_table(WORKSPACES_TABLE)?;
            let _ = txn.open_table(TABLE_STATES_TABLE)?;
            let _ = txn.open_table(PARTIES_TABLE)?;
            let _ = txn.open_table(COMBOS_TABLE)?;
            let _ = txn.open_table(SEATINGS_TABLE)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Workspaces ==========

    pub fn put_workspace(&self, txn: &WriteTransaction, ws: &Workspace) -> StorageResult<()> {
        let mut table = txn.open_table(WORKSPACES_TABLE)?;
        let value = serde_json::to_vec(ws)?;
        table.insert(ws.id.as_str(), value.as_slice())?;
        Ok(())
    }

    pub fn get_workspace_txn(
        &self,
        txn: &WriteTransaction,
        workspace_id: &str,
    ) -> StorageResult<Option<Workspace>> {
        let table = txn.open_table(WORKSPACES_TABLE)?;
        match table.get(workspace_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_workspace(&self, workspace_id: &str) -> StorageResult<Option<Workspace>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WORKSPACES_TABLE)?;
        match table.get(workspace_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All workspaces owned by a user, most recent first.
    pub fn list_workspaces_for_user(&self, user_id: &str) -> StorageResult<Vec<Workspace>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WORKSPACES_TABLE)?;

        let mut workspaces = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let ws: Workspace = serde_json::from_slice(value.value())?;
            if ws.user_id == user_id {
                workspaces.push(ws);
            }
        }
        workspaces.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(workspaces)
    }

    /// All workspaces owned by a user (within a write transaction).
    pub fn list_workspaces_for_user_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
    ) -> StorageResult<Vec<Workspace>> {
        let table = txn.open_table(WORKSPACES_TABLE)?;
        let mut workspaces = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let ws: Workspace = serde_json::from_slice(value.value())?;
            if ws.user_id == user_id {
                workspaces.push(ws);
            }
        }
        workspaces.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(workspaces)
    }

    // ========== Table states ==========

    pub fn put_table(
        &self,
        txn: &WriteTransaction,
        workspace_id: &str,
        state: &TableState,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(TABLE_STATES_TABLE)?;
        let value = serde_json::to_vec(state)?;
        table.insert((workspace_id, state.table_number), value.as_slice())?;
        Ok(())
    }

    pub fn get_table_txn(
        &self,
        txn: &WriteTransaction,
        workspace_id: &str,
        table_number: u32,
    ) -> StorageResult<Option<TableState>> {
        let table = txn.open_table(TABLE_STATES_TABLE)?;
        match table.get((workspace_id, table_number))? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All tables of a workspace, ordered by table number.
    pub fn list_tables(&self, workspace_id: &str) -> StorageResult<Vec<TableState>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_STATES_TABLE)?;

        let mut states = Vec::new();
        for result in table.range((workspace_id, 0u32)..=(workspace_id, u32::MAX))? {
            let (_key, value) = result?;
            states.push(serde_json::from_slice(value.value())?);
        }
        Ok(states)
    }

    /// All tables of a workspace (within a write transaction).
    pub fn list_tables_txn(
        &self,
        txn: &WriteTransaction,
        workspace_id: &str,
    ) -> StorageResult<Vec<TableState>> {
        let table = txn.open_table(TABLE_STATES_TABLE)?;
        let mut states = Vec::new();
        for result in table.range((workspace_id, 0u32)..=(workspace_id, u32::MAX))? {
            let (_key, value) = result?;
            states.push(serde_json::from_slice(value.value())?);
        }
        Ok(states)
    }

    // ========== Parties ==========

    pub fn put_party(
        &self,
        txn: &WriteTransaction,
        workspace_id: &str,
        party: &Party,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PARTIES_TABLE)?;
        let value = serde_json::to_vec(party)?;
        table.insert((workspace_id, party.id.as_str()), value.as_slice())?;
        Ok(())
    }

    pub fn get_party_txn(
        &self,
        txn: &WriteTransaction,
        workspace_id: &str,
        party_id: &str,
    ) -> StorageResult<Option<Party>> {
        let table = txn.open_table(PARTIES_TABLE)?;
        match table.get((workspace_id, party_id))? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_party(&self, workspace_id: &str, party_id: &str) -> StorageResult<Option<Party>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PARTIES_TABLE)?;
        match table.get((workspace_id, party_id))? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All parties of a workspace, ordered by arrival (`created_at` asc).
    pub fn list_parties(&self, workspace_id: &str) -> StorageResult<Vec<Party>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PARTIES_TABLE)?;

        let mut parties: Vec<Party> = Vec::new();
        for result in table.range((workspace_id, "")..)? {
            let (key, value) = result?;
            if key.value().0 != workspace_id {
                break;
            }
            parties.push(serde_json::from_slice(value.value())?);
        }
        parties.sort_by_key(|p| p.created_at);
        Ok(parties)
    }

    pub fn delete_parties_for_workspace(
        &self,
        txn: &WriteTransaction,
        workspace_id: &str,
    ) -> StorageResult<usize> {
        let mut table = txn.open_table(PARTIES_TABLE)?;
        let mut ids = Vec::new();
        for result in table.range((workspace_id, "")..)? {
            let (key, _value) = result?;
            let (ws, id) = key.value();
            if ws != workspace_id {
                break;
            }
            ids.push(id.to_string());
        }
        for id in &ids {
            table.remove((workspace_id, id.as_str()))?;
        }
        Ok(ids.len())
    }

    // ========== Combos ==========

    pub fn put_combo(
        &self,
        txn: &WriteTransaction,
        workspace_id: &str,
        combo: &Combo,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(COMBOS_TABLE)?;
        let value = serde_json::to_vec(combo)?;
        table.insert((workspace_id, combo.id.as_str()), value.as_slice())?;
        Ok(())
    }

    pub fn get_combo_txn(
        &self,
        txn: &WriteTransaction,
        workspace_id: &str,
        combo_id: &str,
    ) -> StorageResult<Option<Combo>> {
        let table = txn.open_table(COMBOS_TABLE)?;
        match table.get((workspace_id, combo_id))? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn delete_combo(
        &self,
        txn: &WriteTransaction,
        workspace_id: &str,
        combo_id: &str,
    ) -> StorageResult<bool> {
        let mut table = txn.open_table(COMBOS_TABLE)?;
        Ok(table.remove((workspace_id, combo_id))?.is_some())
    }

    pub fn list_combos(&self, workspace_id: &str) -> StorageResult<Vec<Combo>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COMBOS_TABLE)?;

        let mut combos: Vec<Combo> = Vec::new();
        for result in table.range((workspace_id, "")..)? {
            let (key, value) = result?;
            if key.value().0 != workspace_id {
                break;
            }
            combos.push(serde_json::from_slice(value.value())?);
        }
        combos.sort_by_key(|c| c.created_at);
        Ok(combos)
    }

    // ========== Seating records ==========

    pub fn put_seating(
        &self,
        txn: &WriteTransaction,
        workspace_id: &str,
        seating: &SeatingRecord,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(SEATINGS_TABLE)?;
        let value = serde_json::to_vec(seating)?;
        table.insert((workspace_id, seating.id.as_str()), value.as_slice())?;
        Ok(())
    }

    /// Most recent open seating record (`cleared_at == None`) for a table.
    pub fn latest_open_seating_txn(
        &self,
        txn: &WriteTransaction,
        workspace_id: &str,
        table_number: u32,
    ) -> StorageResult<Option<SeatingRecord>> {
        let table = txn.open_table(SEATINGS_TABLE)?;
        let mut latest: Option<SeatingRecord> = None;
        for result in table.range((workspace_id, "")..)? {
            let (key, value) = result?;
            if key.value().0 != workspace_id {
                break;
            }
            let record: SeatingRecord = serde_json::from_slice(value.value())?;
            if record.table_number == table_number
                && record.cleared_at.is_none()
                && latest.as_ref().is_none_or(|l| record.seated_at > l.seated_at)
            {
                latest = Some(record);
            }
        }
        Ok(latest)
    }

    pub fn list_seatings(&self, workspace_id: &str) -> StorageResult<Vec<SeatingRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEATINGS_TABLE)?;

        let mut seatings: Vec<SeatingRecord> = Vec::new();
        for result in table.range((workspace_id, "")..)? {
            let (key, value) = result?;
            if key.value().0 != workspace_id {
                break;
            }
            seatings.push(serde_json::from_slice(value.value())?);
        }
        seatings.sort_by_key(|s| s.seated_at);
        Ok(seatings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::TableStatus;

    fn workspace(id: &str, user: &str, created_at: i64) -> Workspace {
        Workspace {
            id: id.to_string(),
            user_id: user.to_string(),
            name: format!("ws {}", id),
            created_at,
            ..Default::default()
        }
    }

    #[test]
    fn roundtrip_workspace_and_tables() {
        let storage = FloorStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage.put_workspace(&txn, &workspace("w1", "u1", 10)).unwrap();
        storage.put_table(&txn, "w1", &TableState::new(3, 4, 10)).unwrap();
        storage.put_table(&txn, "w1", &TableState::new(1, 2, 10)).unwrap();
        txn.commit().unwrap();

        let ws = storage.get_workspace("w1").unwrap().unwrap();
        assert_eq!(ws.user_id, "u1");

        let tables = storage.list_tables("w1").unwrap();
        assert_eq!(tables.len(), 2);
        // Tuple keys come back ordered by table number
        assert_eq!(tables[0].table_number, 1);
        assert_eq!(tables[1].table_number, 3);
        assert_eq!(tables[0].status, TableStatus::Free);
    }

    #[test]
    fn workspace_scoping_is_strict() {
        let storage = FloorStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage.put_workspace(&txn, &workspace("w1", "u1", 10)).unwrap();
        storage.put_workspace(&txn, &workspace("w2", "u2", 20)).unwrap();
        storage.put_table(&txn, "w1", &TableState::new(1, 4, 0)).unwrap();
        storage.put_table(&txn, "w2", &TableState::new(2, 6, 0)).unwrap();
        txn.commit().unwrap();

        let w1_tables = storage.list_tables("w1").unwrap();
        assert_eq!(w1_tables.len(), 1);
        assert_eq!(w1_tables[0].table_number, 1);

        let u1 = storage.list_workspaces_for_user("u1").unwrap();
        assert_eq!(u1.len(), 1);
        assert_eq!(u1[0].id, "w1");
    }

    #[test]
    fn dropped_transaction_leaves_no_trace() {
        let storage = FloorStorage::open_in_memory().unwrap();
        {
            let txn = storage.begin_write().unwrap();
            storage.put_workspace(&txn, &workspace("w1", "u1", 10)).unwrap();
            // dropped without commit
        }
        assert!(storage.get_workspace("w1").unwrap().is_none());
    }

    #[test]
    fn latest_open_seating_skips_cleared_records() {
        let storage = FloorStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage
            .put_seating(
                &txn,
                "w1",
                &SeatingRecord {
                    id: "s1".into(),
                    party_id: "p1".into(),
                    table_number: 4,
                    seated_at: 100,
                    cleared_at: Some(200),
                    duration_min: Some(2),
                },
            )
            .unwrap();
        storage
            .put_seating(
                &txn,
                "w1",
                &SeatingRecord {
                    id: "s2".into(),
                    party_id: "p2".into(),
                    table_number: 4,
                    seated_at: 300,
                    cleared_at: None,
                    duration_min: None,
                },
            )
            .unwrap();
        let open = storage.latest_open_seating_txn(&txn, "w1", 4).unwrap().unwrap();
        assert_eq!(open.id, "s2");
        assert!(storage.latest_open_seating_txn(&txn, "w1", 9).unwrap().is_none());
        txn.commit().unwrap();
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floorhost.redb");
        {
            let storage = FloorStorage::open(&path).unwrap();
            let txn = storage.begin_write().unwrap();
            storage.put_workspace(&txn, &workspace("w1", "u1", 10)).unwrap();
            txn.commit().unwrap();
        }
        let storage = FloorStorage::open(&path).unwrap();
        assert!(storage.get_workspace("w1").unwrap().is_some());
    }
}
