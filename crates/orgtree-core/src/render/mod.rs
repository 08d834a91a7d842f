//! The three tree views. Each consumes the same immutable row list and
//! sorts its own copy, so they can run in any order.

pub mod console;
pub mod html;
pub mod json;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::config::Config;
use crate::error::{OrgTreeError, Result};
use crate::io::{atomic_write, ensure_dir};
use crate::types::TreeRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Console,
    Html,
    Json,
    All,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Console => "console",
            Format::Html => "html",
            Format::Json => "json",
            Format::All => "all",
        }
    }

    fn includes(self, other: Format) -> bool {
        self == Format::All || self == other
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Format {
    type Err = OrgTreeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "console" => Ok(Format::Console),
            "html" => Ok(Format::Html),
            "json" => Ok(Format::Json),
            "all" => Ok(Format::All),
            _ => Err(OrgTreeError::UnknownVariant {
                kind: "format",
                value: s.to_string(),
            }),
        }
    }
}

/// Files produced by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Artifacts {
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

fn write_artifact(path: &Path, body: &str, view: &str) -> Result<()> {
    atomic_write(path, body.as_bytes())?;
    tracing::info!(path = %path.display(), view, "wrote tree");
    Ok(())
}

/// Run the views selected by `format`: the console view goes to `out`, the
/// file views land in the configured output directory.
///
/// Every file body is built before anything reaches `out` or the disk, so
/// a view that fails leaves the previous artifacts in place.
pub fn render<W: Write>(
    rows: &[TreeRow],
    format: Format,
    cfg: &Config,
    out: &mut W,
) -> Result<Artifacts> {
    let order = cfg.render.order;

    let html_body = if format.includes(Format::Html) {
        Some(html::render(rows, order))
    } else {
        None
    };
    let json_body = if format.includes(Format::Json) {
        Some(json::render(rows, order)?)
    } else {
        None
    };

    if format.includes(Format::Console) {
        console::render(rows, order, Duration::from_millis(cfg.render.pace_ms), out)?;
    }

    let mut artifacts = Artifacts::default();
    if html_body.is_some() || json_body.is_some() {
        ensure_dir(&cfg.output.dir)?;
    }
    if let Some(body) = html_body {
        let path = cfg.output.html_path();
        write_artifact(&path, &body, "html")?;
        artifacts.html = Some(path);
    }
    if let Some(body) = json_body {
        let path = cfg.output.json_path();
        write_artifact(&path, &body, "json")?;
        artifacts.json = Some(path);
    }

    Ok(artifacts)
}
