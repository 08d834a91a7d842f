use super::{open_store, Context};
use crate::output::print_json;
use anyhow::Context as _;
use orgtree_core::store::seed;

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let cfg = ctx.config(None)?;
    let store = open_store(&cfg)?;
    seed::apply(store.as_ref()).context("failed to apply schema and seed data")?;

    let employees = store.employees().context("failed to count employees")?;
    let positions = store.positions().context("failed to count positions")?;

    if ctx.json {
        return print_json(&serde_json::json!({
            "store": cfg.store.describe(),
            "employees": employees.len(),
            "positions": positions.len(),
        }));
    }

    println!(
        "Seeded {}: {} employees, {} positions",
        cfg.store.describe(),
        employees.len(),
        positions.len()
    );
    Ok(())
}
