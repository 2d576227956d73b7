//! # Schema Loading
//!
//! The validation engine does not parse `.proto` text. It consumes a
//! [`SchemaTree`] produced by an external parser. [`SchemaSource`] is the
//! seam for plugging such a parser in; [`SchemaLoader`] is the built-in
//! source that reads trees already serialized as JSON (`.json`) or YAML
//! (`.yaml`, `.yml`).
//!
//! `SchemaLoader` follows `imports`: each listed path is resolved relative
//! to the importing file, loaded, and its messages and enums are appended
//! to the root tree. Every file is loaded at most once, so import cycles
//! terminate. A failure inside an imported file is reported as
//! [`SchemaLoadError::Import`], naming the file that listed it.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use protoval_core::SchemaTree;
use thiserror::Error;

/// Error while loading a schema tree.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    /// The file could not be read.
    #[error("cannot read schema '{path}': {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not a valid schema tree.
    #[error("invalid schema '{path}': {reason}")]
    Parse {
        /// Path of the file.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// A file listed in `imports` could not be loaded.
    #[error("cannot import '{path}' from '{from}': {source}")]
    Import {
        /// The importing file.
        from: String,
        /// The resolved import path.
        path: String,
        #[source]
        source: Box<SchemaLoadError>,
    },
}

/// Anything that can produce a schema tree from a location.
pub trait SchemaSource {
    /// Load the tree at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaLoadError`] if the tree cannot be produced.
    fn load(&self, location: &Path) -> Result<SchemaTree, SchemaLoadError>;
}

/// Reads JSON or YAML schema trees from disk and merges their imports.
#[derive(Debug, Clone, Copy)]
pub struct SchemaLoader {
    follow_imports: bool,
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLoader {
    pub fn new() -> Self {
        Self {
            follow_imports: true,
        }
    }

    /// Load only the named file, leaving `imports` unresolved.
    pub fn without_imports() -> Self {
        Self {
            follow_imports: false,
        }
    }

    /// Read and parse a single file.
    pub fn read_tree(path: &Path) -> Result<SchemaTree, SchemaLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| SchemaLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let parsed: Result<SchemaTree, String> = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            _ => serde_json::from_str(&content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|reason| SchemaLoadError::Parse {
            path: path.display().to_string(),
            reason,
        })
    }
}

impl SchemaSource for SchemaLoader {
    fn load(&self, location: &Path) -> Result<SchemaTree, SchemaLoadError> {
        let mut root = Self::read_tree(location)?;
        if !self.follow_imports {
            return Ok(root);
        }

        let mut seen: HashSet<PathBuf> = HashSet::new();
        seen.insert(canonical(location));

        let mut pending: VecDeque<(PathBuf, PathBuf)> =
            import_paths(location, &root.imports).collect();
        while let Some((from, path)) = pending.pop_front() {
            if !seen.insert(canonical(&path)) {
                continue;
            }
            let imported = Self::read_tree(&path).map_err(|e| SchemaLoadError::Import {
                from: from.display().to_string(),
                path: path.display().to_string(),
                source: Box::new(e),
            })?;
            tracing::debug!(
                path = %path.display(),
                messages = imported.messages.len(),
                enums = imported.enums.len(),
                "merged schema import"
            );
            pending.extend(import_paths(&path, &imported.imports));
            root.messages.extend(imported.messages);
            root.enums.extend(imported.enums);
        }

        Ok(root)
    }
}

/// `(importing file, imported file)` pairs for each entry of `imports`.
fn import_paths<'a>(
    from: &'a Path,
    imports: &'a [String],
) -> impl Iterator<Item = (PathBuf, PathBuf)> + 'a {
    let base = from.parent().unwrap_or_else(|| Path::new(""));
    imports
        .iter()
        .map(move |import| (from.to_path_buf(), base.join(import)))
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
