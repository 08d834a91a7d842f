use super::{open_store, tree, Context};
use crate::RenderArgs;
use anyhow::Context as _;
use orgtree_core::render::Format;
use orgtree_core::store::seed;

/// The whole pipeline in one go: seed, resolve, render every view.
pub fn run(ctx: &Context, args: &RenderArgs) -> anyhow::Result<()> {
    let cfg = ctx.config(Some(args))?;
    let store = open_store(&cfg)?;
    seed::apply(store.as_ref()).context("failed to apply schema and seed data")?;
    tree::render_tree(ctx, store.as_ref(), &cfg, Format::All)
}
