//! Concrete code and migration emitters: the shared file-output contract,
//! naming helpers, and one module per emitter kind, plus the dispatch
//! function the `cli` crate's Processor calls for each configured
//! [`catalog_model::Generator`].

pub mod db_access;
pub mod file_io;
pub mod flyway;
pub mod java;
pub mod naming;
pub mod object_model;
pub mod sql;

pub use file_io::EmitError;

use catalog_model::{generator::kind, Generator, Model};

/// Errors raised dispatching a [`Generator`] to its emitter, distinct from
/// the filesystem errors an emitter itself can raise — this is the
/// "configuration error" class: unknown kind or missing required path.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("generator {name:?} has unknown kind {kind:?}")]
    UnknownKind { name: String, kind: String },
    #[error("generator {name:?} has an empty outputBasePath")]
    MissingOutputPath { name: String },
    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// What one `dispatch` call produced, beyond the files it wrote: whether the
/// model was mutated and needs persisting (true only for Flyway).
pub struct DispatchOutcome {
    pub model_dirty: bool,
}

/// Runs the emitter named by `generator.generator_kind` against `model`.
/// Implemented as a match over the closed set of emitter kinds rather than a
/// trait object, since the set of kinds is fixed and each emitter needs a
/// different subset of collaborating crates (only Flyway needs
/// `schema-differ`; only object-model/Java need `ref-resolver`).
pub fn dispatch(model: &mut Model, generator: &Generator) -> Result<DispatchOutcome, DispatchError> {
    if generator.output_base_path.is_empty() {
        return Err(DispatchError::MissingOutputPath {
            name: generator.name.clone(),
        });
    }

    match generator.generator_kind.as_str() {
        kind::SQL => {
            sql::generate(model, generator)?;
            Ok(DispatchOutcome { model_dirty: false })
        }
        kind::CPP => {
            object_model::generate(model, generator)?;
            Ok(DispatchOutcome { model_dirty: false })
        }
        kind::CPP_DBACCESS => {
            db_access::generate(model, generator)?;
            Ok(DispatchOutcome { model_dirty: false })
        }
        kind::JAVA => {
            java::generate(model, generator)?;
            Ok(DispatchOutcome { model_dirty: false })
        }
        kind::FLYWAY => {
            let outcome = flyway::generate(model, generator)?;
            Ok(DispatchOutcome {
                model_dirty: outcome.model_dirty,
            })
        }
        other => Err(DispatchError::UnknownKind {
            name: generator.name.clone(),
            kind: other.to_string(),
        }),
    }
}
