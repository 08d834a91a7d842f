use orgtree_core::config::DEFAULT_CONFIG_FILE;
use std::path::{Path, PathBuf};

/// Resolve the working root. Relative paths in the config (database file,
/// output directory) are taken relative to it.
///
/// Priority:
/// 1. `--root` flag / `ORGTREE_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `orgtree.yaml`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    find_upward(&cwd, |dir| dir.join(DEFAULT_CONFIG_FILE).is_file())
        .or_else(|| find_upward(&cwd, |dir| dir.join(".git").is_dir()))
        .unwrap_or(cwd)
}

fn find_upward(start: &Path, hit: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    start.ancestors().find(|dir| hit(dir)).map(Path::to_path_buf)
}

/// `--config-file` wins; otherwise `<root>/orgtree.yaml`.
pub fn resolve_config_path(root: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(p) => absolutize(root, p),
        None => root.join(DEFAULT_CONFIG_FILE),
    }
}

/// Join `path` onto `root` unless it is already absolute.
pub fn absolutize(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
