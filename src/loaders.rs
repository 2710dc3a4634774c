//! Schema loading
//!
//! Reads the entry schema and transitively follows its `xs:import` and
//! `xs:include` locations, each resolved against the directory of the
//! document that names it.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::documents::Document;
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::schema::{parse_schema, SchemaDocument};

/// Loader for a schema and everything it imports
#[derive(Debug, Default)]
pub struct SchemaLoader {
    /// Resource limits
    limits: Limits,
}

impl SchemaLoader {
    /// Create a new loader with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Load the entry schema and all documents reachable through imports
    ///
    /// Documents are returned in load order, entry first. Each file is
    /// loaded at most once, keyed by its canonical path.
    pub fn load(&self, entry: impl AsRef<Path>) -> Result<Vec<SchemaDocument>> {
        let mut queue = VecDeque::from([(entry.as_ref().to_path_buf(), 0usize)]);
        let mut seen = HashSet::new();
        let mut documents = Vec::new();

        while let Some((path, depth)) = queue.pop_front() {
            if !seen.insert(canonical_key(&path)) {
                debug!(path = %path.display(), "schema already loaded, skipping");
                continue;
            }
            self.limits.check_import_depth(depth)?;

            let schema = self.load_file(&path)?;
            let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

            for import in &schema.imports {
                match &import.location {
                    Some(location) => queue.push_back((base_dir.join(location), depth + 1)),
                    None => debug!(
                        namespace = import.namespace.as_deref().unwrap_or_default(),
                        "import without schemaLocation, skipping"
                    ),
                }
            }

            documents.push(schema);
        }

        Ok(documents)
    }

    /// Read and parse a single schema file
    pub fn load_file(&self, path: &Path) -> Result<SchemaDocument> {
        let bytes = fs::read(path).map_err(|e| {
            Error::Resource(format!("Failed to read schema '{}': {}", path.display(), e))
        })?;

        self.limits.check_document_size(bytes.len())?;

        let document = Document::from_bytes(&bytes, &self.limits)?;
        let schema = parse_schema(&document).map_err(|e| match e {
            Error::Parse(pe) => Error::Parse(pe.in_file(path)),
            other => other,
        })?;

        debug!(path = %path.display(), imports = schema.imports.len(), "loaded schema");
        Ok(schema)
    }
}

/// Dedup key for a schema path
fn canonical_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
