//! The Flyway incremental-diff algorithm: compares the model's current
//! state against its last-emitted snapshot and synthesizes the minimal
//! ordered sequence of `ALTER`/`CREATE`/`DROP` statements.

use catalog_model::Model;

use crate::ddl::{column_definition, create_table_statements, foreign_key_statements, index_statements};

/// The outcome of one differ invocation.
pub struct MigrationResult {
    /// The migration body, or `None` if nothing changed (the caller should
    /// not write a file in that case, so an empty migration never lands on
    /// disk).
    pub sql: Option<String>,
    /// `"CreateDatabase"` on first emission, else the caller-supplied
    /// migration comment — used to build the filename.
    pub comment: String,
}

/// Computes the migration body for the model's current `generated_version`
/// (`v`), but does **not** mutate the model — see [`stamp_after_emission`],
/// called separately once the caller has successfully written the file.
pub fn diff(model: &Model, migration_comment: &str) -> MigrationResult {
    let v = model.generated_version;
    if v == 0 {
        return MigrationResult {
            sql: Some(first_emission_script(model)),
            comment: "CreateDatabase".to_string(),
        };
    }

    let body = incremental_body(model, v);
    let sql = if body.is_empty() {
        None
    } else {
        let mut lines = vec!["BEGIN;".to_string()];
        lines.extend(body);
        lines.push("COMMIT;".to_string());
        Some(lines.join("\n"))
    };

    MigrationResult {
        sql,
        comment: migration_comment.to_string(),
    }
}

fn first_emission_script(model: &Model) -> String {
    crate::ddl::full_schema_script(model)
}

fn incremental_body(model: &Model, v: u32) -> Vec<String> {
    let mut statements = Vec::new();

    for table in &model.tables {
        let table_old_name = if table.db_name_generated.is_empty() {
            table.db_name_ref()
        } else {
            table.db_name_generated.clone()
        };

        // 1. Table rename.
        if !table.db_name_generated.is_empty() && table.db_name_generated != table.db_name_ref() {
            statements.push(format!(
                "ALTER TABLE {} RENAME TO {};",
                table.db_name_generated,
                table.db_name_ref()
            ));
        }

        // 2. New table.
        if table.version == 0 {
            statements.extend(create_table_statements(table));
            statements.extend(foreign_key_statements(model, table));
            statements.extend(index_statements(table));
            continue;
        }

        // 3. Per-column add/rename/retype. A column qualifies when its
        // version is the "never stamped" sentinel (0) or newer than the
        // generation we're diffing from. A brand-new column's version stays
        // 0 until the next successful stamp, so "> v" alone would never
        // select it.
        for column in &table.columns {
            if column.version != 0 && column.version <= v {
                continue;
            }

            if column.db_name_generated.is_empty() {
                statements.push(format!(
                    "ALTER TABLE {} ADD COLUMN {};",
                    table_old_name,
                    column_definition(table, column)
                ));
                continue;
            }

            if column.db_name_ref() != column.db_name_generated {
                statements.push(format!(
                    "ALTER TABLE {} RENAME COLUMN {} TO {};",
                    table_old_name,
                    column.db_name_generated,
                    column.db_name_ref()
                ));
            }

            if column.type_changed_since_generation() {
                statements.push(format!(
                    "ALTER TABLE {} ALTER COLUMN {};",
                    table_old_name,
                    column_definition(table, column)
                ));
            }
        }

        // 4. Tombstoned columns.
        for deleted in &table.deleted_columns {
            if !deleted.db_name_generated.is_empty() {
                statements.push(format!(
                    "ALTER TABLE {} DROP COLUMN {};",
                    table_old_name, deleted.db_name_generated
                ));
            }
        }
    }

    statements
}

/// Post-emission stamping: bumps `generated_version`, and for every table
/// and column with `version == 0` stamps it to `v+1`, then snapshots the
/// `*_generated` fields. Called only after the migration file (if any) has
/// been successfully written; clears every table's tombstone list.
pub fn stamp_after_emission(model: &mut Model) {
    let next_version = model.generated_version + 1;
    model.generated_version = next_version;

    for table in &mut model.tables {
        if table.version == 0 {
            table.version = next_version;
        }
        table.db_name_generated = table.db_name_ref();

        for column in &mut table.columns {
            if column.version == 0 {
                column.version = next_version;
            }
            column.stamp_generated();
        }

        table.deleted_columns.clear();
    }

    model.mark_dirty();
}

/// `V001__YYYYMMDDHHMMSS_NNNN_<comment>.sql`. `sequence` is the 1-based
/// per-run counter (first call passes `1`).
pub fn migration_file_name(timestamp: chrono::DateTime<chrono::Utc>, sequence: u32, comment: &str) -> String {
    format!(
        "V001__{}_{:04}_{}.sql",
        timestamp.format("%Y%m%d%H%M%S"),
        sequence,
        comment
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use catalog_model::DataType;
    use chrono::TimeZone;

    fn member_model() -> Model {
        let mut model = Model::new("Demo");
        let member = model.create_table("Member");
        member.db_name = Some("member".into());
        member.create_column("id").set_primary_key(true).set_data_type(DataType::Serial).set_nullable(false);
        member.create_column("username").set_data_type(DataType::VarChar).set_data_length(64);
        model
    }

    #[test]
    fn first_emission_creates_tables_with_no_alters() {
        let model = member_model();
        let result = diff(&model, "whatever");
        assert_eq!(result.comment, "CreateDatabase");
        let sql = result.sql.unwrap();
        assert!(sql.contains("CREATE TABLE member("));
        assert!(!sql.contains("ALTER TABLE"));
    }

    #[test]
    fn second_emission_with_no_changes_produces_no_file() {
        let mut model = member_model();
        diff(&model, "whatever");
        stamp_after_emission(&mut model);
        assert_eq!(model.generated_version, 1);

        let result = diff(&model, "no-op");
        assert!(result.sql.is_none());
    }

    #[test]
    fn table_rename_produces_exactly_one_statement() {
        let mut model = member_model();
        diff(&model, "whatever");
        stamp_after_emission(&mut model);

        model.find_table_mut("Member").unwrap().db_name = Some("members".into());
        let result = diff(&model, "rename-member");
        let sql = result.sql.unwrap();
        assert_eq!(
            sql,
            "BEGIN;\nALTER TABLE member RENAME TO members;\nCOMMIT;"
        );
    }

    #[test]
    fn rename_column_matches_s5_scenario() {
        let mut model = member_model();
        diff(&model, "whatever");
        stamp_after_emission(&mut model);
        assert_eq!(model.generated_version, 1);

        let member = model.find_table_mut("Member").unwrap();
        let username = member.find_column_mut("username").unwrap();
        username.db_name = Some("login".into());
        username.version = 2;

        let result = diff(&model, "rename-username");
        assert_eq!(
            result.sql.as_deref(),
            Some("BEGIN;\nALTER TABLE member RENAME COLUMN username TO login;\nCOMMIT;")
        );

        stamp_after_emission(&mut model);
        let username = model.find_table("Member").unwrap().find_column("username").unwrap();
        assert_eq!(username.db_name_generated, "login");
        assert_eq!(model.generated_version, 2);
    }

    #[test]
    fn add_then_delete_before_next_emission_cancels_out() {
        let mut model = member_model();
        diff(&model, "whatever");
        stamp_after_emission(&mut model);

        let member = model.find_table_mut("Member").unwrap();
        member.create_column("bio").set_data_type(DataType::Text);
        member.delete_column("bio");

        let result = diff(&model, "add-then-delete");
        assert!(result.sql.is_none());
    }

    #[test]
    fn add_column_emits_add_column_statement() {
        let mut model = member_model();
        diff(&model, "whatever");
        stamp_after_emission(&mut model);

        model
            .find_table_mut("Member")
            .unwrap()
            .create_column("bio")
            .set_data_type(DataType::Text);

        let result = diff(&model, "add-bio");
        let sql = result.sql.unwrap();
        assert!(sql.contains("ALTER TABLE member ADD COLUMN bio text;"));
    }

    #[test]
    fn migration_file_name_matches_contract() {
        let ts = chrono::Utc.with_ymd_and_hms(2026, 7, 30, 12, 0, 0).unwrap();
        assert_eq!(
            migration_file_name(ts, 1, "CreateDatabase"),
            "V001__20260730120000_0001_CreateDatabase.sql"
        );
    }
}
