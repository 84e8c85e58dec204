//! Reference resolution: turns each column's unresolved `reference_str` into
//! a [`catalog_model::ColumnRef`] pointer.
//!
//! A bad reference is reported as a warning and skipped rather than
//! aborting the whole resolve pass, so one typo in a large model doesn't
//! block emission of everything else.
//!
//! Map-table classification (`looks_like_map_table_for` and friends) lives
//! on [`catalog_model::Table`] itself — it's a pure function of a table's
//! columns and needs no resolver-owned state, so it isn't duplicated here.

use catalog_model::{ColumnRef, Model};

/// A reference string that could not be resolved. Collected rather than
/// returned as an `Err` so callers can still emit what did resolve.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ResolveWarning {
    #[error("column {table}.{column} references unknown table {target_table:?}")]
    UnknownTable {
        table: String,
        column: String,
        target_table: String,
    },
    #[error("column {table}.{column} references unknown column {target_table}.{target_column:?}")]
    UnknownColumn {
        table: String,
        column: String,
        target_table: String,
        target_column: String,
    },
    #[error("column {table}.{column} references table {target_table:?}, which has no primary key")]
    NoPrimaryKey {
        table: String,
        column: String,
        target_table: String,
    },
}

struct Resolution {
    table_idx: usize,
    column_idx: usize,
    target: ColumnRef,
}

/// Resolves every column's `reference_str` into a `references` pointer,
/// re-synchronizing `reference_str` to its canonical `"Table.column"` form
/// afterward.
///
/// Returns the warnings for references that could not be resolved; the
/// model is still fully usable afterward — unresolved columns simply carry
/// no `references` pointer, so emitters skip them for foreign-key/index
/// purposes.
pub fn resolve_references(model: &mut Model) -> Vec<ResolveWarning> {
    let mut warnings = Vec::new();
    let mut resolutions = Vec::new();

    for (table_idx, table) in model.tables.iter().enumerate() {
        for (column_idx, column) in table.columns.iter().enumerate() {
            if column.reference_str.is_empty() || column.references.is_some() {
                continue;
            }
            match resolve_one(model, &table.name, &column.name, &column.reference_str) {
                Ok(target) => resolutions.push(Resolution {
                    table_idx,
                    column_idx,
                    target,
                }),
                Err(warning) => {
                    tracing::warn!(%warning, "unresolved column reference");
                    warnings.push(warning);
                }
            }
        }
    }

    for resolution in resolutions {
        let column =
            &mut model.tables[resolution.table_idx].columns[resolution.column_idx];
        column.reference_str = format!("{}.{}", resolution.target.table, resolution.target.column);
        column.references = Some(resolution.target);
    }

    warnings
}

/// All columns across the model whose resolved reference points into
/// `table_name`, outer-iterated by table order and inner by column order.
pub fn find_references_to<'a>(
    model: &'a Model,
    table_name: &'a str,
) -> impl Iterator<Item = &'a catalog_model::Column> {
    model.tables.iter().flat_map(move |t| {
        t.columns.iter().filter(move |c| {
            c.references
                .as_ref()
                .is_some_and(|r| r.table == table_name)
        })
    })
}

fn resolve_one(
    model: &Model,
    table: &str,
    column: &str,
    reference_str: &str,
) -> Result<ColumnRef, ResolveWarning> {
    let mut parts = reference_str.splitn(2, '.');
    let target_table_name = parts.next().unwrap_or_default();
    let target_column_name = parts.next();

    let target_table = model.find_table(target_table_name).ok_or_else(|| ResolveWarning::UnknownTable {
        table: table.to_string(),
        column: column.to_string(),
        target_table: target_table_name.to_string(),
    })?;

    let target_column = match target_column_name {
        Some(name) => target_table.find_column(name).ok_or_else(|| ResolveWarning::UnknownColumn {
            table: table.to_string(),
            column: column.to_string(),
            target_table: target_table_name.to_string(),
            target_column: name.to_string(),
        })?,
        None => target_table.find_primary_key().ok_or_else(|| ResolveWarning::NoPrimaryKey {
            table: table.to_string(),
            column: column.to_string(),
            target_table: target_table_name.to_string(),
        })?,
    };

    Ok(ColumnRef {
        table: target_table.name.clone(),
        column: target_column.name.clone(),
    })
}
