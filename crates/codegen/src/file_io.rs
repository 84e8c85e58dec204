//! File-output primitives shared by every emitter: always-overwrite,
//! write-if-absent, and move-if-different writes, each creating parent
//! directories as needed and logging what it did.

use std::path::Path;

/// Errors writing generated output to disk.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },
}

fn ensure_parent(path: &Path) -> Result<(), EmitError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| EmitError::CreateDir {
            path: parent.display().to_string(),
            source,
        })?;
    }
    Ok(())
}

/// Always-regenerated class: overwrite unconditionally.
pub fn write_always(path: &Path, content: &str) -> Result<(), EmitError> {
    ensure_parent(path)?;
    std::fs::write(path, content).map_err(|source| EmitError::Write {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), "wrote file");
    Ok(())
}

/// Write-if-absent concrete subclass: does nothing if the target already
/// exists, so hand-edits are preserved.
pub fn write_if_absent(path: &Path, content: &str) -> Result<(), EmitError> {
    if path.exists() {
        tracing::debug!(path = %path.display(), "concrete file already present, leaving untouched");
        return Ok(());
    }
    write_always(path, content)
}

/// "Move-if-different": write to a `.tmp` sibling, then rename over the
/// target only if its content differs (or the target is absent), so
/// regeneration with no actual changes doesn't perturb the file's mtime.
pub fn move_if_different(path: &Path, content: &str) -> Result<(), EmitError> {
    if let Ok(existing) = std::fs::read_to_string(path) {
        if existing == content {
            tracing::debug!(path = %path.display(), "unchanged, not rewriting");
            return Ok(());
        }
    }

    ensure_parent(path)?;
    let tmp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|e| e.to_str()).unwrap_or("tmp")
    ));
    std::fs::write(&tmp_path, content).map_err(|source| EmitError::Write {
        path: tmp_path.display().to_string(),
        source,
    })?;
    std::fs::rename(&tmp_path, path).map_err(|source| EmitError::Rename {
        from: tmp_path.display().to_string(),
        to: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), "wrote file (move-if-different)");
    Ok(())
}

/// Ensures a directory (and its parents) exists, used for the Flyway
/// emitter's `migrations/`/`schema-model/` setup.
pub fn ensure_dir(path: &Path) -> Result<(), EmitError> {
    std::fs::create_dir_all(path).map_err(|source| EmitError::CreateDir {
        path: path.display().to_string(),
        source,
    })
}
