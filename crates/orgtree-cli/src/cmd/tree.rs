use super::{open_store, Context};
use crate::output::print_json;
use crate::RenderArgs;
use anyhow::Context as _;
use orgtree_core::config::Config;
use orgtree_core::render::{self, Artifacts, Format};
use orgtree_core::resolver;
use orgtree_core::store::EdgeStore;

pub fn run(ctx: &Context, format: Format, args: &RenderArgs) -> anyhow::Result<()> {
    let cfg = ctx.config(Some(args))?;
    let store = open_store(&cfg)?;
    render_tree(ctx, store.as_ref(), &cfg, format)
}

/// Resolve once, then hand the same rows to every selected view.
pub(crate) fn render_tree(
    ctx: &Context,
    store: &dyn EdgeStore,
    cfg: &Config,
    format: Format,
) -> anyhow::Result<()> {
    let rows = resolver::fetch(store, cfg.render.max_depth)
        .context("failed to resolve hierarchy")?;
    if rows.is_empty() {
        tracing::warn!("no employees resolved; run `orgtree seed` first?");
    }

    if ctx.json {
        // Keep stdout parseable: the console view is not written in JSON mode,
        // and nothing paces a view that goes to a sink.
        let mut quiet = cfg.clone();
        quiet.render.pace_ms = 0;
        let artifacts = render::render(&rows, format, &quiet, &mut std::io::sink())
            .context("failed to render tree")?;
        return print_json(&serde_json::json!({
            "rows": rows.len(),
            "format": format.as_str(),
            "html": artifacts.html,
            "json": artifacts.json,
        }));
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let artifacts =
        render::render(&rows, format, cfg, &mut out).context("failed to render tree")?;
    drop(out);
    report(&artifacts);
    Ok(())
}

fn report(artifacts: &Artifacts) {
    for path in [&artifacts.html, &artifacts.json].into_iter().flatten() {
        eprintln!("wrote {}", path.display());
    }
}
