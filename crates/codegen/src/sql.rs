//! The standalone SQL emitter: a single always-regenerated file at
//! `outputBasePath`, delegating the actual DDL text to `schema_differ::ddl`
//! so this emitter and the Flyway emitter's first-emission path stay
//! byte-for-byte identical.

use std::path::Path;

use catalog_model::{Generator, Model};
use schema_differ::ddl::full_schema_script;

use crate::file_io::{self, EmitError};

/// Writes the full schema script to `generator.output_base_path`.
pub fn generate(model: &Model, generator: &Generator) -> Result<(), EmitError> {
    let script = full_schema_script(model);
    file_io::write_always(Path::new(&generator.output_base_path), &script)
}
