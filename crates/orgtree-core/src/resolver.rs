//! Hierarchy resolution: turn `(employee, boss)` edges into leveled tree rows.
//!
//! [`fetch`] runs the recursive closure inside the edge store. [`resolve`]
//! computes the same closure over in-memory records, and [`check`] reports
//! employees the closure can never reach (missing bosses, boss cycles).

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use serde::Serialize;

use crate::error::{OrgTreeError, Result};
use crate::store::{ClosureRow, EdgeStore};
use crate::types::{Employee, OrderSequence, Position, TreeRow, ROOT_BOSS_ID};

// ---------------------------------------------------------------------------
// Recursive query
// ---------------------------------------------------------------------------

/// Recursive closure query, valid for both SQLite and Postgres.
///
/// The recursive step stops one level past `max_depth` so that an
/// over-deep hierarchy shows up as a row with `level > max_depth` instead of
/// being silently truncated.
pub fn tree_query(max_depth: u32) -> String {
    format!(
        "\
WITH RECURSIVE tree_view AS (
    SELECT
        id,
        name,
        position,
        bossid,
        0 AS level,
        CAST(id AS TEXT) AS order_sequence
    FROM employees
    WHERE bossid = {root}

    UNION ALL

    SELECT
        e.id,
        e.name,
        e.position,
        e.bossid,
        tv.level + 1 AS level,
        tv.order_sequence || '-' || CAST(e.id AS TEXT) AS order_sequence
    FROM employees e
    JOIN tree_view tv
    ON e.bossid = tv.id
    WHERE tv.level <= {max_depth}
)
SELECT
    CAST(tree_view.id AS BIGINT),
    tree_view.name,
    positions.position,
    CAST(tree_view.level AS BIGINT),
    tree_view.order_sequence
FROM tree_view
LEFT JOIN positions
ON tree_view.position = positions.id",
        root = ROOT_BOSS_ID,
    )
}

/// Resolve the hierarchy inside the store. Rows come back in store order;
/// sort with [`SortOrder`](crate::types::SortOrder) before relying on it.
///
/// The depth bound is checked on the whole closure, so an over-deep
/// employee with an unknown position still fails. Rows without a position
/// label are dropped afterwards.
pub fn fetch(store: &dyn EdgeStore, max_depth: u32) -> Result<Vec<TreeRow>> {
    let closure = store.query_tree(&tree_query(max_depth))?;
    check_depth(&closure, max_depth)?;

    let rows = closure
        .into_iter()
        .filter_map(|r| {
            let position = r.position?;
            Some(TreeRow::from_columns(
                r.id,
                r.name,
                position,
                r.level,
                &r.order_sequence,
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    tracing::info!(backend = %store.backend(), rows = rows.len(), "hierarchy resolved");
    Ok(rows)
}

fn check_depth(rows: &[ClosureRow], max_depth: u32) -> Result<()> {
    match rows.iter().find(|r| r.level > i64::from(max_depth)) {
        Some(r) => Err(OrgTreeError::DepthExceeded {
            id: r.id,
            max_depth,
        }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// In-memory closure
// ---------------------------------------------------------------------------

/// Breadth-first closure from every root, matching [`fetch`] row for row.
///
/// Employees whose position is unknown are dropped from the output but
/// their subordinates are still visited, the same as the SQL join.
pub fn resolve(
    employees: &[Employee],
    positions: &[Position],
    max_depth: u32,
) -> Result<Vec<TreeRow>> {
    let labels: HashMap<i64, &str> = positions
        .iter()
        .map(|p| (p.id, p.label.as_str()))
        .collect();

    let mut children: BTreeMap<i64, Vec<&Employee>> = BTreeMap::new();
    for e in employees {
        children.entry(e.boss_id).or_default().push(e);
    }
    for subs in children.values_mut() {
        subs.sort_by_key(|e| e.id);
    }

    let mut queue: VecDeque<(&Employee, OrderSequence)> = children
        .get(&ROOT_BOSS_ID)
        .into_iter()
        .flatten()
        .map(|e| (*e, OrderSequence::root(e.id)))
        .collect();

    let mut rows = Vec::new();
    while let Some((employee, seq)) = queue.pop_front() {
        let level = seq.depth();
        if level > max_depth {
            return Err(OrgTreeError::DepthExceeded {
                id: employee.id,
                max_depth,
            });
        }

        for sub in children.get(&employee.id).into_iter().flatten() {
            if seq.ids().contains(&sub.id) {
                let mut cycle = seq.ids().to_vec();
                cycle.push(sub.id);
                return Err(OrgTreeError::Cycle(cycle));
            }
            queue.push_back((*sub, seq.child(sub.id)));
        }

        if let Some(label) = labels.get(&employee.position) {
            rows.push(TreeRow {
                id: employee.id,
                name: employee.name.clone(),
                position: (*label).to_string(),
                level,
                order_sequence: seq,
            });
        }
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Reachability report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyReport {
    pub roots: Vec<i64>,
    /// Employees never reached from a root.
    pub unreachable: Vec<i64>,
    /// Employees whose boss id names nobody.
    pub missing_boss: Vec<i64>,
    /// Employees whose position id names no position; they drop out of
    /// every rendering.
    pub missing_position: Vec<i64>,
    /// Each cycle as a closed path, e.g. `[3, 8, 3]`.
    pub cycles: Vec<Vec<i64>>,
}

impl HierarchyReport {
    pub fn is_clean(&self) -> bool {
        self.unreachable.is_empty()
            && self.missing_boss.is_empty()
            && self.missing_position.is_empty()
            && self.cycles.is_empty()
    }
}

pub fn check(employees: &[Employee], positions: &[Position]) -> HierarchyReport {
    let ids: HashSet<i64> = employees.iter().map(|e| e.id).collect();
    let position_ids: HashSet<i64> = positions.iter().map(|p| p.id).collect();

    let mut report = HierarchyReport {
        roots: employees.iter().filter(|e| e.is_root()).map(|e| e.id).collect(),
        ..HierarchyReport::default()
    };

    let mut reachable: HashSet<i64> = HashSet::new();
    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    for e in employees {
        children.entry(e.boss_id).or_default().push(e.id);
    }
    let mut stack: Vec<i64> = report.roots.clone();
    while let Some(id) = stack.pop() {
        if !reachable.insert(id) {
            continue;
        }
        if let Some(subs) = children.get(&id) {
            stack.extend(subs.iter().copied());
        }
    }

    for e in employees {
        if !reachable.contains(&e.id) {
            report.unreachable.push(e.id);
        }
        if !e.is_root() && !ids.contains(&e.boss_id) {
            report.missing_boss.push(e.id);
        }
        if !position_ids.contains(&e.position) {
            report.missing_position.push(e.id);
        }
    }
    report.unreachable.sort_unstable();
    report.missing_boss.sort_unstable();
    report.missing_position.sort_unstable();
    report.cycles = find_cycles(employees);
    report
}

/// Walk boss pointers from every employee, recording each loop once.
pub fn find_cycles(employees: &[Employee]) -> Vec<Vec<i64>> {
    let boss: BTreeMap<i64, i64> = employees.iter().map(|e| (e.id, e.boss_id)).collect();
    let mut done: HashSet<i64> = HashSet::new();
    let mut cycles = Vec::new();

    for &start in boss.keys() {
        let mut path: Vec<i64> = Vec::new();
        let mut cur = start;
        loop {
            if done.contains(&cur) {
                break;
            }
            if let Some(pos) = path.iter().position(|&id| id == cur) {
                let mut cycle = path[pos..].to_vec();
                cycle.push(cur);
                cycles.push(cycle);
                break;
            }
            path.push(cur);
            match boss.get(&cur) {
                Some(&b) if b != ROOT_BOSS_ID && boss.contains_key(&b) => cur = b,
                _ => break,
            }
        }
        done.extend(path);
    }

    cycles
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
