//! The Processor: loads the model, resolves references, dispatches the
//! configured (optionally filtered) generators, and persists the model if an
//! emitter left it dirty.
//!
//! A plain synchronous function pipeline with `anyhow::Context` at each I/O
//! boundary; single-threaded, sequential, and strictly filesystem-bound.

use anyhow::Context;
use catalog_model::Model;

use crate::args::Args;

/// The process's intended exit status, distinct from `anyhow::Error`'s role
/// of carrying filesystem/parse failures (which this crate's `main` maps to
/// exit code 2). Argument errors (mode confusion, exit code 1) are returned
/// as `Ok(ExitStatus::Usage)` rather than an `Err`, since they are not
/// failures of an operation that was actually attempted.
#[derive(Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Usage,
}

/// Resolves exactly one mode (`--create`, `--listgen`, or `--generate`) and
/// runs it. Picking no mode, or an ambiguous combination, is an argument
/// error.
pub fn run(args: &Args) -> anyhow::Result<ExitStatus> {
    let modes_selected = [args.create, args.listgen, args.generate]
        .iter()
        .filter(|&&m| m)
        .count();
    if modes_selected != 1 {
        tracing::error!("exactly one of --create, --listgen, or --generate is required");
        return Ok(ExitStatus::Usage);
    }

    if args.create {
        return create_model(args);
    }

    let mut model = Model::load(&args.model)
        .with_context(|| format!("loading model from {}", args.model.display()))?;

    if args.listgen {
        for generator in &model.generators {
            println!("{}", generator.name);
        }
        return Ok(ExitStatus::Success);
    }

    debug_assert!(args.generate);
    generate(args, &mut model)
}

/// `--create`: always writes a brand-new empty [`Model`] named from the
/// `--model` path's file stem, and never serializes an in-memory model —
/// there isn't one yet at this point in the Processor's lifecycle.
fn create_model(args: &Args) -> anyhow::Result<ExitStatus> {
    let name = args
        .model
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model")
        .to_string();
    let model = Model::new(name);
    model
        .save(&args.model)
        .with_context(|| format!("writing new model to {}", args.model.display()))?;
    Ok(ExitStatus::Success)
}

/// `--generate`: resolve references (soft warnings reported, not fatal),
/// dispatch every configured generator whose kind passes `--flyway`/`--sql`/
/// `--java` filtering, then persist the model if any emitter (only Flyway
/// ever does) left it dirty.
fn generate(args: &Args, model: &mut Model) -> anyhow::Result<ExitStatus> {
    for warning in ref_resolver::resolve_references(model) {
        tracing::warn!(%warning, "unresolved reference");
    }

    let kind_filter = args.kind_filter();
    let mut dirty = false;

    for mut generator in model.generators.clone() {
        if !kind_filter.is_empty() && !kind_filter.contains(&generator.generator_kind.as_str()) {
            continue;
        }

        // `--migration-comment` only has a consumer in the Flyway emitter,
        // and only applies where the model itself hasn't already pinned one.
        if generator.generator_kind == catalog_model::generator::kind::FLYWAY
            && !generator.options.contains_key("migrationComment")
        {
            generator
                .options
                .insert("migrationComment".to_string(), args.migration_comment.clone());
        }

        match codegen::dispatch(model, &generator) {
            Ok(outcome) => dirty |= outcome.model_dirty,
            Err(codegen::DispatchError::UnknownKind { name, kind }) => {
                tracing::error!(generator = %name, %kind, "skipping generator with unknown kind");
            }
            Err(codegen::DispatchError::MissingOutputPath { name }) => {
                tracing::error!(generator = %name, "skipping generator with empty outputBasePath");
            }
            Err(codegen::DispatchError::Emit(source)) => {
                return Err(anyhow::Error::new(source))
                    .with_context(|| format!("generator {:?} failed writing output", generator.name));
            }
        }
    }

    if dirty {
        model
            .save(&args.model)
            .with_context(|| format!("persisting updated model to {}", args.model.display()))?;
    }

    Ok(ExitStatus::Success)
}
