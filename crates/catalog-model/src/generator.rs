//! Generator configuration: which emitter to run, and where it writes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The recognized generator kinds.
pub mod kind {
    pub const SQL: &str = "SQL";
    pub const CPP: &str = "CPP";
    pub const CPP_DBACCESS: &str = "CPP_DBAccess";
    pub const JAVA: &str = "Java";
    pub const FLYWAY: &str = "Flyway";
}

/// One configured code-generation target: a name, which kind of emitter it
/// runs, where it writes, and free-form per-generator options (e.g. Java's
/// `userTable`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generator {
    pub name: String,
    pub description: String,

    /// One of the `kind::*` constants.
    pub generator_kind: String,

    pub output_base_path: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output_class_path: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

impl Generator {
    pub fn new(name: impl Into<String>, generator_kind: impl Into<String>) -> Generator {
        Generator {
            name: name.into(),
            description: String::new(),
            generator_kind: generator_kind.into(),
            output_base_path: String::new(),
            output_class_path: String::new(),
            options: BTreeMap::new(),
        }
    }

    pub fn with_output_base_path(mut self, path: impl Into<String>) -> Self {
        self.output_base_path = path.into();
        self
    }

    pub fn with_output_class_path(mut self, path: impl Into<String>) -> Self {
        self.output_class_path = path.into();
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}
