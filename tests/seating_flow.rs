//! End-to-end service flow over an in-memory record store: open a
//! workspace, run a waitlist through seating, turning, merging and
//! clearing, then check the dashboard numbers.

use floorhost::FloorStorage;
use floorhost::db::models::{PartyStatus, TableStatus};
use floorhost::engine::actions::{
    NewParty, NewWorkspaceTable, add_minutes_to_table, add_party, clear_table, create_combo,
    create_workspace, delete_combo, mark_table_turning, seat_party_at_combo, seat_party_at_table,
    set_party_status,
};
use floorhost::engine::assign::{AssignOutcome, auto_assign_next};
use floorhost::stats::get_dashboard_stats;

const MIN: i64 = 60_000;

fn party(name: &str, size: u32) -> NewParty {
    NewParty {
        name: name.into(),
        size,
        phone: None,
        notes: None,
    }
}

#[test]
fn saturday_night_service() {
    let storage = FloorStorage::open_in_memory().unwrap();
    let opened_at = 1_000_000_000;

    let ws = create_workspace(
        &storage,
        "host-1",
        "Saturday dinner",
        "main floor",
        vec![
            NewWorkspaceTable { table_number: 1, seats: 2 },
            NewWorkspaceTable { table_number: 2, seats: 4 },
            NewWorkspaceTable { table_number: 3, seats: 4 },
            NewWorkspaceTable { table_number: 4, seats: 6 },
        ],
        opened_at,
    )
    .unwrap();

    // Empty floor: first party gets a zero quote and auto-seats instantly
    let t0 = opened_at + 5 * MIN;
    let alvarez = add_party(&storage, &ws.id, party("Alvarez", 2), t0).unwrap();
    assert_eq!(alvarez.quoted_wait_min, 0);

    match auto_assign_next(&storage, &ws.id, t0).unwrap() {
        AssignOutcome::Seated { table_number, minutes_until_available, .. } => {
            assert_eq!(table_number, 1);
            assert_eq!(minutes_until_available, 0);
        }
        other => panic!("expected SEATED, got {other:?}"),
    }

    // Fill the floor
    let t1 = t0 + 2 * MIN;
    let chen = add_party(&storage, &ws.id, party("Chen", 4), t1).unwrap();
    seat_party_at_table(&storage, &ws.id, &chen.id, 2, t1).unwrap();
    let osei = add_party(&storage, &ws.id, party("Osei", 4), t1).unwrap();
    seat_party_at_table(&storage, &ws.id, &osei.id, 3, t1).unwrap();
    let patel = add_party(&storage, &ws.id, party("Patel", 6), t1).unwrap();
    seat_party_at_table(&storage, &ws.id, &patel.id, 4, t1).unwrap();

    // Next party of 4 now has to wait a full turn: quote > 0
    let t2 = t1 + 10 * MIN;
    let moreau = add_party(&storage, &ws.id, party("Moreau", 4), t2).unwrap();
    assert!(moreau.quoted_wait_min > 0);

    // Everything occupied and far out: recommendation, not a seat
    match auto_assign_next(&storage, &ws.id, t2).unwrap() {
        AssignOutcome::Recommendation { party_name, minutes_until_available, .. } => {
            assert_eq!(party_name, "Moreau");
            assert!(minutes_until_available > 5);
        }
        other => panic!("expected RECOMMENDATION, got {other:?}"),
    }

    // Table 2 pays and leaves early; host marks it turning for 5 minutes
    let t3 = t2 + 20 * MIN;
    clear_table(&storage, &ws.id, 2, t3).unwrap();
    let turned = mark_table_turning(&storage, &ws.id, 2, Some(5), t3).unwrap();
    assert_eq!(turned.status, TableStatus::Turning);
    assert_eq!(turned.expected_free_at, Some(t3 + 5 * MIN));

    // Turning window is inside the threshold: Moreau auto-seats at table 2
    match auto_assign_next(&storage, &ws.id, t3).unwrap() {
        AssignOutcome::Seated { party_name, table_number, .. } => {
            assert_eq!(party_name, "Moreau");
            assert_eq!(table_number, 2);
        }
        other => panic!("expected SEATED, got {other:?}"),
    }
    assert_eq!(
        storage.get_party(&ws.id, &moreau.id).unwrap().unwrap().status,
        PartyStatus::Seated
    );

    // Kitchen trouble at table 4: push the estimate twice
    let before = storage.list_tables(&ws.id).unwrap()[3].expected_free_at.unwrap();
    add_minutes_to_table(&storage, &ws.id, 4, None, t3).unwrap();
    let after = add_minutes_to_table(&storage, &ws.id, 4, Some(5), t3).unwrap();
    assert_eq!(after.expected_free_at, Some(before + 15 * MIN));

    // Big walk-in: clear 1 and 3, merge them, seat against the combo
    let t4 = t3 + 60 * MIN;
    clear_table(&storage, &ws.id, 1, t4).unwrap();
    clear_table(&storage, &ws.id, 3, t4).unwrap();
    let combo = create_combo(&storage, &ws.id, vec![3, 1], t4).unwrap();
    assert_eq!(combo.table_numbers, vec![1, 3]);
    assert_eq!(combo.merged_capacity, 6);

    let big = add_party(&storage, &ws.id, party("Haddad", 6), t4).unwrap();
    let (big, seated_combo) = seat_party_at_combo(&storage, &ws.id, &big.id, &combo.id, t4).unwrap();
    assert_eq!(big.status, PartyStatus::Seated);
    assert_eq!(seated_combo.status, TableStatus::Occupied);

    // Split while occupied: members must come back FREE and unlinked
    delete_combo(&storage, &ws.id, &combo.id, t4 + 90 * MIN).unwrap();
    let tables = storage.list_tables(&ws.id).unwrap();
    for n in [0, 2] {
        assert_eq!(tables[n].status, TableStatus::Free);
        assert!(tables[n].in_combo_id.is_none());
    }

    // A no-show comes off the waitlist without touching any table
    let ghost = add_party(&storage, &ws.id, party("Ghost", 2), t4).unwrap();
    set_party_status(&storage, &ws.id, &ghost.id, PartyStatus::NoShow, t4 + 15 * MIN).unwrap();

    // Close out the night and read the dashboard
    let t5 = t4 + 120 * MIN;
    for n in [2, 4] {
        clear_table(&storage, &ws.id, n, t5).unwrap();
    }

    let stats =
        get_dashboard_stats(&storage, "host-1", 0, i64::MAX, chrono_tz::UTC).unwrap();
    assert_eq!(stats.workspaces.len(), 1);
    let night = &stats.workspaces[0];
    // Alvarez, Chen, Osei, Patel, Moreau seated; Haddad seated at combo;
    // Ghost never seated
    assert_eq!(night.parties_waited, 7);
    assert_eq!(night.parties_seated, 6);
    // Combo seatings leave no seating record, so turns only cover tables
    assert!(night.tables_turned >= 5);
    assert!(night.avg_table_min.unwrap() > 0);
    assert!(stats.summary.total_parties_seated == 6);

    // Another host sees none of it
    let foreign = get_dashboard_stats(&storage, "host-2", 0, i64::MAX, chrono_tz::UTC).unwrap();
    assert!(foreign.workspaces.is_empty());
}
