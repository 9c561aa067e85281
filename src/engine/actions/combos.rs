//! Merge tables into a combo; split one back apart.

use tracing::info;
use uuid::Uuid;

use super::{ActionError, ActionResult};
use crate::db::FloorStorage;
use crate::db::models::{Combo, TableStatus};

/// Merge two or more tables into one seatable unit.
///
/// `merged_capacity` is the sum of member effective capacities, frozen at
/// merge time; later chair changes on members do not flow through.
pub fn create_combo(
    storage: &FloorStorage,
    workspace_id: &str,
    table_numbers: Vec<u32>,
    now: i64,
) -> ActionResult<Combo> {
    if table_numbers.len() < 2 {
        return Err(ActionError::NotEnoughTables);
    }
    let mut sorted = table_numbers;
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() < 2 {
        return Err(ActionError::NotEnoughTables);
    }

    let txn = storage.begin_write()?;
    let combo_id = Uuid::new_v4().to_string();

    let mut merged_capacity = 0;
    let mut members = Vec::with_capacity(sorted.len());
    for &number in &sorted {
        let table = storage
            .get_table_txn(&txn, workspace_id, number)?
            .ok_or_else(|| ActionError::NotFound(format!("Table {number}")))?;
        if table.in_combo_id.is_some() {
            return Err(ActionError::AlreadyInCombo(number));
        }
        merged_capacity += table.effective_capacity();
        members.push(table);
    }

    let combo = Combo {
        id: combo_id.clone(),
        table_numbers: sorted,
        merged_capacity,
        status: TableStatus::Free,
        current_party_id: None,
        current_party_name: None,
        last_seated_at: None,
        expected_free_at: None,
        created_at: now,
        updated_at: now,
    };
    storage.put_combo(&txn, workspace_id, &combo)?;
    for mut table in members {
        table.in_combo_id = Some(combo_id.clone());
        table.updated_at = now;
        storage.put_table(&txn, workspace_id, &table)?;
    }
    txn.commit()?;

    info!(
        workspace_id = %workspace_id,
        combo_id = %combo.id,
        tables = ?combo.table_numbers,
        merged_capacity,
        "Tables merged into combo"
    );
    Ok(combo)
}

/// Split a combo. Members come back FREE with every occupancy field
/// cleared, whatever state the combo or the members were in.
pub fn delete_combo(
    storage: &FloorStorage,
    workspace_id: &str,
    combo_id: &str,
    now: i64,
) -> ActionResult<()> {
    let txn = storage.begin_write()?;
    let combo = storage
        .get_combo_txn(&txn, workspace_id, combo_id)?
        .ok_or_else(|| ActionError::NotFound(format!("Combo {combo_id}")))?;

    for &number in &combo.table_numbers {
        // Missing member records are skipped rather than aborting the split
        if let Some(mut table) = storage.get_table_txn(&txn, workspace_id, number)? {
            table.in_combo_id = None;
            table.reset_to_free(now);
            storage.put_table(&txn, workspace_id, &table)?;
        }
    }
    storage.delete_combo(&txn, workspace_id, combo_id)?;
    txn.commit()?;

    info!(
        workspace_id = %workspace_id,
        combo_id = %combo_id,
        tables = ?combo.table_numbers,
        "Combo split"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{TableState, Workspace};
    use crate::engine::actions::{NewParty, add_party, seat_party_at_combo};

    fn setup(tables: &[(u32, u32)]) -> FloorStorage {
        let storage = FloorStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage
            .put_workspace(
                &txn,
                &Workspace {
                    id: "w1".into(),
                    user_id: "u1".into(),
                    name: "dinner".into(),
                    created_at: 0,
                    ..Default::default()
                },
            )
            .unwrap();
        for &(number, seats) in tables {
            storage.put_table(&txn, "w1", &TableState::new(number, seats, 0)).unwrap();
        }
        txn.commit().unwrap();
        storage
    }

    #[test]
    fn merge_freezes_capacity_and_links_members() {
        let storage = setup(&[(3, 4), (5, 4)]);

        // Chair added before the merge counts
        let txn = storage.begin_write().unwrap();
        let mut t = storage.get_table_txn(&txn, "w1", 3).unwrap().unwrap();
        t.capacity_override = 1;
        storage.put_table(&txn, "w1", &t).unwrap();
        txn.commit().unwrap();

        let combo = create_combo(&storage, "w1", vec![5, 3], 100).unwrap();
        assert_eq!(combo.table_numbers, vec![3, 5]);
        assert_eq!(combo.merged_capacity, 9);
        assert_eq!(combo.status, TableStatus::Free);

        for t in storage.list_tables("w1").unwrap() {
            assert_eq!(t.in_combo_id.as_deref(), Some(combo.id.as_str()));
        }
    }

    #[test]
    fn merged_capacity_is_stale_after_later_chair_changes() {
        let storage = setup(&[(3, 4), (5, 4)]);
        let combo = create_combo(&storage, "w1", vec![3, 5], 0).unwrap();
        assert_eq!(combo.merged_capacity, 8);

        let txn = storage.begin_write().unwrap();
        let mut t = storage.get_table_txn(&txn, "w1", 3).unwrap().unwrap();
        t.capacity_override = 2;
        storage.put_table(&txn, "w1", &t).unwrap();
        txn.commit().unwrap();

        let combos = storage.list_combos("w1").unwrap();
        assert_eq!(combos[0].merged_capacity, 8);
    }

    #[test]
    fn needs_two_distinct_tables() {
        let storage = setup(&[(3, 4)]);
        assert!(matches!(
            create_combo(&storage, "w1", vec![3], 0),
            Err(ActionError::NotEnoughTables)
        ));
        assert!(matches!(
            create_combo(&storage, "w1", vec![3, 3], 0),
            Err(ActionError::NotEnoughTables)
        ));
    }

    #[test]
    fn double_merge_is_rejected() {
        let storage = setup(&[(1, 2), (2, 2), (3, 2)]);
        create_combo(&storage, "w1", vec![1, 2], 0).unwrap();
        let err = create_combo(&storage, "w1", vec![2, 3], 10).unwrap_err();
        assert!(matches!(err, ActionError::AlreadyInCombo(2)));
        // Aborted merge leaves table 3 unlinked
        let txn = storage.begin_write().unwrap();
        let t3 = storage.get_table_txn(&txn, "w1", 3).unwrap().unwrap();
        assert!(t3.in_combo_id.is_none());
    }

    #[test]
    fn split_frees_members_even_when_occupied() {
        let storage = setup(&[(3, 4), (5, 4)]);
        let combo = create_combo(&storage, "w1", vec![3, 5], 0).unwrap();
        let party = add_party(
            &storage,
            "w1",
            NewParty {
                name: "Weber".into(),
                size: 6,
                phone: None,
                notes: None,
            },
            0,
        )
        .unwrap();
        seat_party_at_combo(&storage, "w1", &party.id, &combo.id, 50).unwrap();

        delete_combo(&storage, "w1", &combo.id, 100).unwrap();

        for t in storage.list_tables("w1").unwrap() {
            assert_eq!(t.status, TableStatus::Free);
            assert!(t.in_combo_id.is_none());
            assert!(t.current_party_id.is_none());
            assert!(t.expected_free_at.is_none());
        }
        assert!(storage.list_combos("w1").unwrap().is_empty());
    }
}
