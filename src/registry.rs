//! # Source Registry
//!
//! Read-through cache over the source tree. The registry owns the only
//! cache of file contents and parsed dependency lists, keyed by the
//! lexically normalized path, so each physical file is read from storage
//! at most once per build run no matter how many chains reference it.
//!
//! The cache sits behind a mutex, which lets one registry be shared
//! read-only across artifact builds running on worker threads.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::trace;

use crate::directive::DirectiveScanner;
use crate::error::{Error, Result};
use crate::path::normalize;

/// A source file with its derived dependency references.
///
/// Immutable once read.
#[derive(Debug)]
pub struct SourceFile {
    /// Normalized path, the file's identity for deduplication.
    pub path: PathBuf,
    /// Raw UTF-8 contents.
    pub content: String,
    /// Declared dependencies in declaration order, resolved relative to
    /// this file's directory and normalized. Not yet validated to exist.
    pub dependencies: Vec<PathBuf>,
}

/// Lazy, cached access to source files and their dependency directives.
#[derive(Debug)]
pub struct SourceRegistry {
    scanner: DirectiveScanner,
    cache: Arc<Mutex<HashMap<PathBuf, Arc<SourceFile>>>>,
}

impl SourceRegistry {
    pub fn new() -> Result<Self> {
        Ok(Self {
            scanner: DirectiveScanner::new()?,
            cache: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Load a file through the cache.
    ///
    /// The first load reads the file from disk and scans its directives;
    /// every later load of the same identity returns the cached entry.
    pub fn load(&self, path: &Path) -> Result<Arc<SourceFile>> {
        let key = normalize(path);

        {
            let cache = self.lock_cache()?;
            if let Some(cached) = cache.get(&key) {
                return Ok(Arc::clone(cached));
            }
        }

        trace!("reading {}", key.display());
        let file = Arc::new(self.read_from_disk(&key)?);

        let mut cache = self.lock_cache()?;
        Ok(Arc::clone(cache.entry(key).or_insert(file)))
    }

    /// The declared dependencies of `path`, in declaration order.
    pub fn dependencies_of(&self, path: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.load(path)?.dependencies.clone())
    }

    fn lock_cache(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<PathBuf, Arc<SourceFile>>>> {
        self.cache.lock().map_err(|_| Error::LockPoisoned {
            context: "source registry cache".to_string(),
        })
    }

    fn read_from_disk(&self, path: &Path) -> Result<SourceFile> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::MissingFile {
                    path: path.display().to_string(),
                    referenced_by: None,
                }
            } else {
                Error::Io(e)
            }
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let dependencies = self
            .scanner
            .scan(&content)
            .into_iter()
            .map(|token| normalize(&base.join(token)))
            .collect();

        Ok(SourceFile {
            path: path.to_path_buf(),
            content,
            dependencies,
        })
    }
}
