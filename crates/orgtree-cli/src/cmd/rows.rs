use super::{open_store, Context};
use crate::output::{print_json, print_table};
use crate::RenderArgs;
use anyhow::Context as _;
use orgtree_core::resolver;

pub fn run(ctx: &Context, args: &RenderArgs) -> anyhow::Result<()> {
    let cfg = ctx.config(Some(args))?;
    let store = open_store(&cfg)?;
    let mut rows = resolver::fetch(store.as_ref(), cfg.render.max_depth)
        .context("failed to resolve hierarchy")?;
    cfg.render.order.sort(&mut rows);

    if ctx.json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("No employees.");
        return Ok(());
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.name.clone(),
                r.position.clone(),
                r.level.to_string(),
                r.order_sequence.to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "POSITION", "LEVEL", "ORDER"], &table);
    Ok(())
}
