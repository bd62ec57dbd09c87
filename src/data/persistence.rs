use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Set once at startup by main() from the --data-dir argument.
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

pub fn set_data_dir(path: PathBuf) {
    let _ = DATA_DIR.set(path);
}

pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = DATA_DIR.get() {
        return Ok(dir.clone());
    }
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    Ok(cwd.join("config"))
}

/// Resolves the plan file: an explicit override wins, otherwise the
/// configured name inside the data directory.
pub fn resolve_plan_path(dir: &Path, configured: &str, override_path: Option<&Path>) -> PathBuf {
    match override_path {
        Some(p) => p.to_path_buf(),
        None => dir.join(configured),
    }
}

/// Writes `contents` to `path`, creating the parent directory first.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create dir {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "saved");
    Ok(())
}

/// A YAML document stored under a fixed name in the data directory.
pub trait Persistable: Sized + Default + Serialize + for<'de> Deserialize<'de> {
    fn filename() -> &'static str;

    fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(Self::filename());
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_norway::from_str(&contents)
            .with_context(|| format!("failed to parse YAML from {}", path.display()))
    }

    fn save_to(&self, dir: &Path) -> Result<()> {
        let contents = serde_norway::to_string(self).context("failed to serialize YAML")?;
        write_file(&dir.join(Self::filename()), &contents)
    }
}
