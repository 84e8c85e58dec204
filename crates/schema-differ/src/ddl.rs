//! Shared DDL formatting: the column definition formatter and full-schema
//! script used both by the incremental differ and by the standalone SQL
//! emitter (`codegen::sql`), so the two stay byte-for-byte consistent.

use catalog_model::{Column, Model, Table};

/// `<table>_<pk>_seq` — the sequence synthesized for a non-serial primary
/// key.
pub fn sequence_name(table: &Table, column: &Column) -> String {
    format!("{}_{}_seq", table.db_name_ref(), column.db_name_ref())
}

/// `<dbName> <typeName>[(length)][(p[,s])] [PRIMARY KEY] [NOT NULL] [DEFAULT nextval('<seq>')]`.
pub fn column_definition(table: &Table, column: &Column) -> String {
    let mut out = format!("{} {}", column.db_name_ref(), column.data_type.sql_name());

    if column.data_type.has_length() && column.data_length > 0 {
        out.push_str(&format!("({})", column.data_length));
    }
    out.push_str(&column.precision_str());

    if column.is_primary_key {
        out.push_str(" PRIMARY KEY");
    }
    if !column.nullable {
        out.push_str(" NOT NULL");
    }
    if column.is_primary_key && !column.data_type.is_serial() {
        out.push_str(&format!(" DEFAULT nextval('{}')", sequence_name(table, column)));
    }
    out
}

/// The full transactional schema script for the whole model: `DROP TABLE`
/// for every table, then per-table `CREATE SEQUENCE`/`CREATE TABLE`/`ALTER
/// SEQUENCE ... OWNED BY`, then every foreign key constraint, then every
/// requested index, then `COMMIT;`.
pub fn full_schema_script(model: &Model) -> String {
    let mut lines = Vec::new();
    lines.push("BEGIN;".to_string());

    for table in &model.tables {
        lines.push(format!("DROP TABLE IF EXISTS {} CASCADE;", table.db_name_ref()));
    }

    for table in &model.tables {
        lines.extend(create_table_statements(table));
    }

    for table in &model.tables {
        lines.extend(foreign_key_statements(model, table));
    }

    for table in &model.tables {
        lines.extend(index_statements(table));
    }

    lines.push("COMMIT;".to_string());
    lines.join("\n")
}

/// `CREATE SEQUENCE`/`CREATE TABLE`/`ALTER SEQUENCE ... OWNED BY` for one
/// table, in that order.
pub fn create_table_statements(table: &Table) -> Vec<String> {
    let mut out = Vec::new();
    let pk = table.find_primary_key();
    let seq = pk.filter(|pk| !pk.data_type.is_serial()).map(|pk| sequence_name(table, pk));

    if let Some(seq) = &seq {
        out.push(format!("CREATE SEQUENCE {seq};"));
    }

    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|c| column_definition(table, c))
        .collect();
    out.push(format!(
        "CREATE TABLE {}({});",
        table.db_name_ref(),
        columns.join(", ")
    ));

    if let Some(seq) = &seq {
        let pk = pk.unwrap();
        out.push(format!(
            "ALTER SEQUENCE {seq} OWNED BY {}.{};",
            table.db_name_ref(),
            pk.db_name_ref()
        ));
    }

    out
}

/// `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY ... REFERENCES ... ON
/// DELETE CASCADE;` for every resolved foreign key on `table`. The
/// referenced table/column are looked up in `model` so the `REFERENCES`
/// clause uses database names, not the logical names a `ColumnRef` stores.
pub fn foreign_key_statements(model: &Model, table: &Table) -> Vec<String> {
    table
        .foreign_keys()
        .filter_map(|column| {
            let reference = column.references.as_ref().expect("is_foreign_key implies references");
            let parent_table = model.find_table(&reference.table)?;
            let parent_column = parent_table.find_column(&reference.column)?;
            Some(format!(
                "ALTER TABLE {} ADD CONSTRAINT {}_{} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE CASCADE;",
                table.db_name_ref(),
                table.db_name_ref(),
                column.db_name_ref(),
                column.db_name_ref(),
                parent_table.db_name_ref(),
                parent_column.db_name_ref(),
            ))
        })
        .collect()
}

/// `CREATE INDEX ON <table> (<col>);` for every non-primary-key column with
/// `want_index` set.
pub fn index_statements(table: &Table) -> Vec<String> {
    table
        .columns
        .iter()
        .filter(|c| c.want_index && !c.is_primary_key)
        .map(|c| format!("CREATE INDEX ON {} ({});", table.db_name_ref(), c.db_name_ref()))
        .collect()
}
