//! Access to the files of the repository checkout being synchronised.
//!
//! Everything that reads or writes target files goes through [`Repository`]
//! so the patch logic can run against [`MemoryRepository`] in tests.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

pub trait Repository {
    /// Content of `path`, or `None` when the file does not exist.
    fn read(&self, path: &Path) -> Result<Option<String>>;

    /// Replace the whole content of `path`.
    fn write(&mut self, path: &Path, content: &str) -> Result<()>;

    /// Files directly inside `dir` whose name starts with `prefix`, sorted.
    fn list(&self, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>>;

    /// Like [`Repository::read`] but a missing file is an error.
    fn read_required(&self, path: &Path) -> Result<String> {
        self.read(path)?
            .ok_or_else(|| anyhow!("Required file {} does not exist", path.display()))
    }
}

/// A checkout on disk. Paths are relative to `root`.
pub struct FsRepository {
    root: PathBuf,
}

impl FsRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Repository for FsRepository {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        let full_path = self.root.join(path);
        if !full_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&full_path)
            .with_context(|| format!("Could not read {}", full_path.display()))?;
        Ok(Some(content))
    }

    /// Writes to a sibling temporary file first, then renames it over the
    /// target in one step.
    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        let full_path = self.root.join(path);
        let dir = full_path
            .parent()
            .ok_or_else(|| anyhow!("Invalid target path {}", full_path.display()))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Could not create temporary file in {}", dir.display()))?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;

        if let Ok(metadata) = fs::metadata(&full_path) {
            fs::set_permissions(tmp.path(), metadata.permissions())?;
        }

        tmp.persist(&full_path)
            .with_context(|| format!("Could not replace {}", full_path.display()))?;
        tracing::debug!("Wrote {}", full_path.display());
        Ok(())
    }

    fn list(&self, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        let full_dir = self.root.join(dir);
        if !full_dir.is_dir() {
            tracing::debug!("No directory at {}", full_dir.display());
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(&full_dir).min_depth(1).max_depth(1) {
            let entry = entry
                .with_context(|| format!("Could not list {}", full_dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if name.starts_with(prefix) && name.len() > prefix.len() {
                found.push(dir.join(entry.file_name()));
            }
        }
        found.sort();
        Ok(found)
    }
}

/// In-memory checkout that remembers every write.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
    files: std::collections::BTreeMap<PathBuf, String>,
    writes: Vec<PathBuf>,
}

#[cfg(test)]
impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files.insert(path.into(), content.to_string());
        self
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(|s| s.as_str())
    }

    pub fn writes(&self) -> &[PathBuf] {
        &self.writes
    }
}

#[cfg(test)]
impl Repository for MemoryRepository {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.files.get(path).cloned())
    }

    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        self.files.insert(path.to_path_buf(), content.to_string());
        self.writes.push(path.to_path_buf());
        Ok(())
    }

    fn list(&self, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        Ok(self
            .files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter(|path| {
                path.file_name()
                    .map(|n| n.to_string_lossy())
                    .is_some_and(|n| n.starts_with(prefix) && n.len() > prefix.len())
            })
            .cloned()
            .collect())
    }
}
