pub mod check;
pub mod config;
pub mod rows;
pub mod run;
pub mod seed;
pub mod tree;

use crate::root::absolutize;
use crate::{RenderArgs, StoreArgs};
use anyhow::Context as _;
use orgtree_core::config::Config;
use orgtree_core::store::{self, EdgeStore};
use std::path::PathBuf;

/// Everything a subcommand needs from the global flags.
pub struct Context {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub store: StoreArgs,
    pub json: bool,
}

impl Context {
    /// Config file (or defaults) with CLI overrides applied and relative
    /// paths anchored at the root.
    pub fn config(&self, render: Option<&RenderArgs>) -> anyhow::Result<Config> {
        let mut cfg = Config::load_or_default(&self.config_path)
            .with_context(|| format!("failed to load {}", self.config_path.display()))?;

        let s = &self.store;
        if let Some(backend) = s.backend {
            cfg.store.backend = backend;
        }
        if let Some(path) = &s.db_path {
            cfg.store.path = path.clone();
        }
        if let Some(database) = &s.database {
            cfg.store.database = database.clone();
        }
        if let Some(user) = &s.user {
            cfg.store.user = user.clone();
        }
        if let Some(password) = &s.password {
            cfg.store.password = password.clone();
        }
        if let Some(host) = &s.host {
            cfg.store.host = host.clone();
        }
        if let Some(port) = s.port {
            cfg.store.port = port;
        }

        if let Some(r) = render {
            if let Some(dir) = &r.out_dir {
                cfg.output.dir = dir.clone();
            }
            if let Some(order) = r.order {
                cfg.render.order = order;
            }
            if let Some(pace) = r.pace_ms {
                cfg.render.pace_ms = pace;
            }
            if let Some(depth) = r.max_depth {
                cfg.render.max_depth = depth;
            }
        }

        cfg.store.path = absolutize(&self.root, &cfg.store.path);
        cfg.output.dir = absolutize(&self.root, &cfg.output.dir);
        Ok(cfg)
    }
}

pub fn open_store(cfg: &Config) -> anyhow::Result<Box<dyn EdgeStore>> {
    store::open(&cfg.store)
        .with_context(|| format!("failed to connect to {}", cfg.store.describe()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgtree_core::config::Backend;
    use orgtree_core::types::SortOrder;
    use tempfile::TempDir;

    fn ctx(dir: &TempDir) -> Context {
        Context {
            root: dir.path().to_path_buf(),
            config_path: dir.path().join("orgtree.yaml"),
            store: StoreArgs::default(),
            json: false,
        }
    }

    #[test]
    fn defaults_anchor_at_root() {
        let dir = TempDir::new().unwrap();
        let cfg = ctx(&dir).config(None).unwrap();
        assert_eq!(cfg.store.path, dir.path().join("orgtree.db"));
        assert_eq!(cfg.output.dir, dir.path().join("data"));
    }

    #[test]
    fn flags_override_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("orgtree.yaml"),
            "store:\n  path: file.db\nrender:\n  order: lexicographic\n  pace_ms: 5\n",
        )
        .unwrap();
        let mut c = ctx(&dir);
        c.store.backend = Some(Backend::Sqlite);
        c.store.db_path = Some(PathBuf::from("flag.db"));
        let render = RenderArgs {
            order: Some(SortOrder::Numeric),
            ..RenderArgs::default()
        };
        let cfg = c.config(Some(&render)).unwrap();
        assert_eq!(cfg.store.path, dir.path().join("flag.db"));
        assert_eq!(cfg.render.order, SortOrder::Numeric);
        assert_eq!(cfg.render.pace_ms, 5);
    }

    #[test]
    fn broken_yaml_is_reported() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("orgtree.yaml"), "store: [not, a, map]\n").unwrap();
        let err = ctx(&dir).config(None).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load"));
    }
}
