//! The top-level `Model`: a named collection of tables, generators, and
//! database environments, persisted as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::generator::Generator;
use crate::table::Table;

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// The root of the schema document.
///
/// `is_dirty` and `generated_version` are in-memory bookkeeping the
/// Processor uses to decide whether to persist and which migration
/// generation is due; neither round-trips through JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,

    #[serde(default)]
    pub tables: Vec<Table>,

    #[serde(default)]
    pub generators: Vec<Generator>,

    #[serde(default)]
    pub databases: Vec<Database>,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub generated_version: u32,

    #[serde(skip)]
    pub is_dirty: bool,
}

/// Errors raised while loading or saving a model document.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write model file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Model {
    pub fn new(name: impl Into<String>) -> Model {
        Model {
            name: name.into(),
            tables: Vec::new(),
            generators: Vec::new(),
            databases: Vec::new(),
            generated_version: 0,
            is_dirty: false,
        }
    }

    /// Reads and parses a model document from disk.
    pub fn load(path: &Path) -> Result<Model, ModelError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let model: Model = serde_json::from_str(&text)?;
        Ok(model)
    }

    /// Serializes the model as pretty JSON and writes it to disk.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| ModelError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn create_table(&mut self, name: impl Into<String>) -> &mut Table {
        self.tables.push(Table::new(name));
        self.mark_dirty();
        self.tables.last_mut().unwrap()
    }

    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn find_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }

    pub fn push_table(&mut self, table: Table) {
        self.tables.push(table);
        self.mark_dirty();
    }

    pub fn push_generator(&mut self, generator: Generator) {
        self.generators.push(generator);
        self.mark_dirty();
    }

    pub fn push_database(&mut self, database: Database) {
        self.databases.push(database);
        self.mark_dirty();
    }

    /// Stably sorts tables by logical name.
    pub fn sort_tables(&mut self) {
        self.tables.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Sorts every table's columns; see [`Table::sort_columns`].
    pub fn sort_all_columns(&mut self) {
        for table in &mut self.tables {
            table.sort_columns();
        }
    }

    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    pub fn clear(&mut self) {
        self.tables.clear();
        self.generators.clear();
        self.databases.clear();
        self.generated_version = 0;
        self.mark_dirty();
    }

    /// Deep structural equality over tables only — generators, databases,
    /// and `generated_version` are deployment bookkeeping, not schema
    /// content.
    pub fn deep_equals(&self, other: &Model) -> bool {
        if self.tables.len() != other.tables.len() {
            return false;
        }
        self.tables.iter().all(|t| {
            other
                .find_table(&t.name)
                .is_some_and(|ot| t.deep_equals(ot))
        })
    }
}
