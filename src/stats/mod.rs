//! Historical KPIs over completed parties and seating records.
//!
//! Workspace selection is bounded: the most recent
//! [`WORKSPACE_LOOKBACK`] workspaces are range-filtered on `created_at`,
//! and at most [`MAX_WORKSPACES`] of those are aggregated per request.
//!
//! Daily and summary averages weight each workspace's average by its
//! sample count instead of re-reading the raw samples. That makes the
//! averages exact for the mean but an approximation for min/max, which
//! end up over workspace averages rather than individual sits.

use chrono_tz::Tz;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::db::models::PartyStatus;
use crate::db::{FloorStorage, StorageResult};
use crate::utils::time::{local_date_key, minutes_between};

pub const WORKSPACE_LOOKBACK: usize = 100;
pub const MAX_WORKSPACES: usize = 20;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStats {
    pub workspace_id: String,
    pub name: String,
    pub created_at: i64,
    pub avg_wait_min: Option<i64>,
    pub min_wait_min: Option<i64>,
    pub max_wait_min: Option<i64>,
    pub avg_table_min: Option<i64>,
    pub min_table_min: Option<i64>,
    pub max_table_min: Option<i64>,
    pub parties_waited: u64,
    pub parties_seated: u64,
    pub tables_turned: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAggregate {
    /// YYYY-MM-DD in the business timezone
    pub date: String,
    pub avg_wait_min: Option<i64>,
    pub avg_table_min: Option<i64>,
    pub parties_waited: u64,
    pub parties_seated: u64,
    pub tables_turned: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub avg_wait_min: Option<i64>,
    pub min_wait_min: Option<i64>,
    pub max_wait_min: Option<i64>,
    pub avg_table_min: Option<i64>,
    pub min_table_min: Option<i64>,
    pub max_table_min: Option<i64>,
    pub total_parties_waited: u64,
    pub total_parties_seated: u64,
    pub total_tables_turned: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub workspaces: Vec<WorkspaceStats>,
    pub daily_aggregates: Vec<DailyAggregate>,
    pub summary: DashboardSummary,
}

/// Count-weighted mean accumulator over per-workspace averages.
#[derive(Default)]
struct WeightedAvg {
    sum: i64,
    count: u64,
    min: Option<i64>,
    max: Option<i64>,
}

impl WeightedAvg {
    fn push(&mut self, avg: i64, count: u64) {
        if count == 0 {
            return;
        }
        self.sum += avg * count as i64;
        self.count += count;
        self.min = Some(self.min.map_or(avg, |m| m.min(avg)));
        self.max = Some(self.max.map_or(avg, |m| m.max(avg)));
    }

    fn avg(&self) -> Option<i64> {
        if self.count == 0 {
            None
        } else {
            Some((self.sum as f64 / self.count as f64).round() as i64)
        }
    }
}

fn round_avg(samples: &[i64]) -> Option<i64> {
    if samples.is_empty() {
        None
    } else {
        Some((samples.iter().sum::<i64>() as f64 / samples.len() as f64).round() as i64)
    }
}

fn workspace_stats(
    storage: &FloorStorage,
    workspace_id: &str,
    name: &str,
    created_at: i64,
) -> StorageResult<WorkspaceStats> {
    let parties = storage.list_parties(workspace_id)?;
    let seatings = storage.list_seatings(workspace_id)?;

    let mut wait_times = Vec::new();
    let mut parties_seated = 0u64;
    for party in &parties {
        if party.status == PartyStatus::Seated
            && let Some(seated_at) = party.seated_at
        {
            parties_seated += 1;
            let wait_min = minutes_between(party.created_at, seated_at);
            if wait_min >= 0 {
                wait_times.push(wait_min);
            }
        }
    }

    let mut table_times = Vec::new();
    let mut tables_turned = 0u64;
    for seating in &seatings {
        let Some(cleared_at) = seating.cleared_at else {
            continue;
        };
        tables_turned += 1;
        match seating.duration_min {
            Some(d) if d >= 0 => table_times.push(d),
            // Legacy records without a stored duration
            _ => {
                let d = minutes_between(seating.seated_at, cleared_at);
                if d >= 0 {
                    table_times.push(d);
                }
            }
        }
    }

    Ok(WorkspaceStats {
        workspace_id: workspace_id.to_string(),
        name: name.to_string(),
        created_at,
        avg_wait_min: round_avg(&wait_times),
        min_wait_min: wait_times.iter().min().copied(),
        max_wait_min: wait_times.iter().max().copied(),
        avg_table_min: round_avg(&table_times),
        min_table_min: table_times.iter().min().copied(),
        max_table_min: table_times.iter().max().copied(),
        parties_waited: parties.len() as u64,
        tables_turned,
        parties_seated,
    })
}

/// Dashboard aggregation for one user over an inclusive date range.
pub fn get_dashboard_stats(
    storage: &FloorStorage,
    user_id: &str,
    start_millis: i64,
    end_millis: i64,
    tz: Tz,
) -> StorageResult<DashboardStats> {
    let workspaces: Vec<_> = storage
        .list_workspaces_for_user(user_id)?
        .into_iter()
        .take(WORKSPACE_LOOKBACK)
        .filter(|ws| ws.created_at >= start_millis && ws.created_at <= end_millis)
        .take(MAX_WORKSPACES)
        .collect();

    let mut workspace_stats_list = Vec::with_capacity(workspaces.len());
    for ws in &workspaces {
        workspace_stats_list.push(workspace_stats(storage, &ws.id, &ws.name, ws.created_at)?);
    }

    // Daily buckets keyed by the workspace's creation date
    let mut daily: BTreeMap<String, (WeightedAvg, WeightedAvg, u64, u64, u64)> = BTreeMap::new();
    for ws in &workspace_stats_list {
        let key = local_date_key(ws.created_at, tz);
        let entry = daily.entry(key).or_default();
        if let Some(avg) = ws.avg_wait_min {
            entry.0.push(avg, ws.parties_seated);
        }
        if let Some(avg) = ws.avg_table_min {
            entry.1.push(avg, ws.tables_turned);
        }
        entry.2 += ws.parties_waited;
        entry.3 += ws.parties_seated;
        entry.4 += ws.tables_turned;
    }
    let daily_aggregates = daily
        .into_iter()
        .map(|(date, (wait, table, parties_waited, parties_seated, tables_turned))| DailyAggregate {
            date,
            avg_wait_min: wait.avg(),
            avg_table_min: table.avg(),
            parties_waited,
            parties_seated,
            tables_turned,
        })
        .collect();

    let mut wait = WeightedAvg::default();
    let mut table = WeightedAvg::default();
    let mut total_parties_waited = 0;
    let mut total_parties_seated = 0;
    let mut total_tables_turned = 0;
    for ws in &workspace_stats_list {
        total_parties_waited += ws.parties_waited;
        total_parties_seated += ws.parties_seated;
        total_tables_turned += ws.tables_turned;
        if let Some(avg) = ws.avg_wait_min {
            wait.push(avg, ws.parties_seated);
        }
        if let Some(avg) = ws.avg_table_min {
            table.push(avg, ws.tables_turned);
        }
    }

    Ok(DashboardStats {
        workspaces: workspace_stats_list,
        daily_aggregates,
        summary: DashboardSummary {
            avg_wait_min: wait.avg(),
            min_wait_min: wait.min,
            max_wait_min: wait.max,
            avg_table_min: table.avg(),
            min_table_min: table.min,
            max_table_min: table.max,
            total_parties_waited,
            total_parties_seated,
            total_tables_turned,
        },
    })
}
