use super::{open_store, Context};
use crate::output::print_json;
use anyhow::{bail, Context as _};
use orgtree_core::resolver;
use std::collections::BTreeSet;

fn ids(list: &[i64]) -> String {
    list.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let cfg = ctx.config(None)?;
    let store = open_store(&cfg)?;
    let employees = store.employees().context("failed to list employees")?;
    let positions = store.positions().context("failed to list positions")?;
    let report = resolver::check(&employees, &positions);

    if ctx.json {
        print_json(&report)?;
    } else if report.is_clean() {
        println!(
            "OK: {} employees reachable from {} root(s)",
            employees.len(),
            report.roots.len()
        );
    } else {
        if !report.unreachable.is_empty() {
            println!("Unreachable from any root: {}", ids(&report.unreachable));
        }
        if !report.missing_boss.is_empty() {
            println!("Boss id names nobody: {}", ids(&report.missing_boss));
        }
        if !report.missing_position.is_empty() {
            println!("Unknown position: {}", ids(&report.missing_position));
        }
        for cycle in &report.cycles {
            let path: Vec<String> = cycle.iter().map(|id| id.to_string()).collect();
            println!("Boss cycle: {}", path.join(" -> "));
        }
    }

    if !report.is_clean() {
        let problems: BTreeSet<i64> = report
            .unreachable
            .iter()
            .chain(&report.missing_boss)
            .chain(&report.missing_position)
            .copied()
            .collect();
        bail!("hierarchy check failed for {} employee(s)", problems.len());
    }
    Ok(())
}
