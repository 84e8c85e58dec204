//! The C++ DB-access emitter: per-table read/parse/insert/update/delete
//! helper functions layered on top of the object-model classes.

use std::path::Path;

use catalog_model::{DataType, Model, NativeTarget, Table};

use crate::file_io::{self, EmitError};

fn base_class_name(table: &Table) -> String {
    format!("DB_{}_Base", table.name)
}

fn concrete_class_name(table: &Table) -> String {
    format!("DB_{}", table.name)
}

fn select_list(table: &Table) -> String {
    table
        .columns
        .iter()
        .map(|c| c.db_name_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

fn qualified_select_list(table: &Table) -> String {
    let db_name = table.db_name_ref();
    table
        .columns
        .iter()
        .map(|c| format!("{}.{}", db_name, c.db_name_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_list(table: &Table) -> String {
    table
        .columns
        .iter()
        .filter(|c| !c.is_primary_key)
        .map(|c| c.db_name_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// String/date/timestamp columns bind `nullptr` when empty; others bind
/// directly.
fn is_null_coerced(data_type: DataType) -> bool {
    data_type.is_string() || data_type.is_temporal()
}

fn base_header(table: &Table, model: &Model) -> String {
    let class_name = base_class_name(table);
    let name = &table.name;
    let mut out = String::new();
    out.push_str("#pragma once\n\n#include <memory>\n#include <string>\n#include <vector>\n\n");
    out.push_str("#include <pqxx/pqxx>\n\n");
    out.push_str(&format!("#include \"{name}.h\"\n\n"));
    out.push_str(&format!("class {class_name} {{\npublic:\n"));
    out.push_str(&format!(
        "    static {name}::Vector readAll(pqxx::connection &conn, const std::string &whereClause = \"\");\n"
    ));

    for fk in table.foreign_keys() {
        if let Some(reference) = &fk.references {
            out.push_str(&format!(
                "    static {name}::Vector readAll_For{parent}(pqxx::connection &conn, int fkValue);\n",
                parent = reference.table,
            ));
        }
    }

    for other in &model.tables {
        if other.looks_like_map_table_for(table) && other.our_map_table_reference(table).is_some() {
            out.push_str(&format!(
                "    static {name}::Vector readAll_FromMap_{map}(pqxx::connection &conn, int otherKey);\n",
                map = other.name,
            ));
        }
    }

    out.push_str(&format!(
        "    static void update(pqxx::connection &conn, {name} &entity);\n"
    ));
    out.push_str(&format!(
        "    static void deleteWithId(pqxx::connection &conn, int id);\n\n"
    ));
    out.push_str(&format!(
        "    static const std::string SelectList;\n    static const std::string InsertList;\n    static const std::string QualifiedSelectList;\n\nprivate:\n"
    ));
    out.push_str(&format!(
        "    static {name}::Vector parseAll(pqxx::result &result);\n"
    ));
    out.push_str(&format!(
        "    static {name}::Pointer parseOne(const pqxx::row &row);\n"
    ));
    out.push_str(&format!(
        "    static void doInsert(pqxx::connection &conn, {name} &entity);\n"
    ));
    out.push_str(&format!(
        "    static void doUpdate(pqxx::connection &conn, {name} &entity);\n"
    ));
    out.push_str("};\n");
    out
}

fn base_impl(table: &Table, model: &Model) -> String {
    let class_name = base_class_name(table);
    let name = &table.name;
    let pk = table.find_primary_key();
    let mut out = String::new();
    out.push_str(&format!("#include \"base/{class_name}.h\"\n\n"));
    out.push_str(&format!(
        "const std::string {class_name}::SelectList = \"{}\";\n",
        select_list(table)
    ));
    out.push_str(&format!(
        "const std::string {class_name}::InsertList = \"{}\";\n",
        insert_list(table)
    ));
    out.push_str(&format!(
        "const std::string {class_name}::QualifiedSelectList = \"{}\";\n\n",
        qualified_select_list(table)
    ));

    out.push_str(&format!(
        "{name}::Vector {class_name}::readAll(pqxx::connection &conn, const std::string &whereClause) {{\n    pqxx::work txn{{conn}};\n    std::string sql = \"SELECT \" + SelectList + \" FROM {db} \" + whereClause;\n    return parseAll(txn.exec(sql));\n}}\n\n",
        db = table.db_name_ref(),
    ));

    for fk in table.foreign_keys() {
        if let Some(reference) = &fk.references {
            out.push_str(&format!(
                "{name}::Vector {class_name}::readAll_For{parent}(pqxx::connection &conn, int fkValue) {{\n    pqxx::work txn{{conn}};\n    std::string sql = \"SELECT \" + SelectList + \" FROM {db} WHERE {fk} = \" + txn.quote(fkValue);\n    return parseAll(txn.exec(sql));\n}}\n\n",
                parent = reference.table,
                db = table.db_name_ref(),
                fk = fk.db_name_ref(),
            ));
        }
    }

    for other in &model.tables {
        if other.looks_like_map_table_for(table) {
            if let (Some(ours), Some(theirs)) = (
                other.our_map_table_reference(table),
                other.other_map_table_reference(table),
            ) {
                out.push_str(&format!(
                    "{name}::Vector {class_name}::readAll_FromMap_{map}(pqxx::connection &conn, int otherKey) {{\n    pqxx::work txn{{conn}};\n    std::string sql = \"SELECT \" + QualifiedSelectList + \" FROM {db} JOIN {map_db} ON {db}.{pk} = {map_db}.{ours} WHERE {map_db}.{theirs} = \" + txn.quote(otherKey);\n    return parseAll(txn.exec(sql));\n}}\n\n",
                    map = other.name,
                    db = table.db_name_ref(),
                    map_db = other.db_name_ref(),
                    pk = pk.map(|c| c.db_name_ref()).unwrap_or_default(),
                    ours = ours.db_name_ref(),
                    theirs = theirs.db_name_ref(),
                ));
            }
        }
    }

    // update/doInsert/doUpdate.
    if let Some(pk) = pk {
        out.push_str(&format!(
            "void {class_name}::update(pqxx::connection &conn, {name} &entity) {{\n    if (entity.get{upper}() == 0) {{\n        doInsert(conn, entity);\n    }} else {{\n        doUpdate(conn, entity);\n    }}\n}}\n\n",
            upper = catalog_model::naming::first_upper(&pk.name),
        ));

        out.push_str(&format!(
            "void {class_name}::doInsert(pqxx::connection &conn, {name} &entity) {{\n    pqxx::work txn{{conn}};\n    std::string sql = \"INSERT INTO {db} (\" + InsertList + \") VALUES (...) RETURNING {pk}\";\n    pqxx::row row = txn.exec1(sql);\n    entity.set{upper}(row[0].as<int>());\n    txn.commit();\n}}\n\n",
            db = table.db_name_ref(),
            pk = pk.db_name_ref(),
            upper = catalog_model::naming::first_upper(&pk.name),
        ));

        out.push_str(&format!(
            "void {class_name}::doUpdate(pqxx::connection &conn, {name} &entity) {{\n    pqxx::work txn{{conn}};\n    std::string sql = \"UPDATE {db} SET ... WHERE {pk} = \" + txn.quote(entity.get{upper}());\n    txn.exec(sql);\n    txn.commit();\n}}\n\n",
            db = table.db_name_ref(),
            pk = pk.db_name_ref(),
            upper = catalog_model::naming::first_upper(&pk.name),
        ));

        out.push_str(&format!(
            "void {class_name}::deleteWithId(pqxx::connection &conn, int id) {{\n    pqxx::work txn{{conn}};\n    std::string sql = \"DELETE FROM {db} WHERE {pk} = \" + txn.quote(id);\n    txn.exec(sql);\n    txn.commit();\n}}\n\n",
            db = table.db_name_ref(),
            pk = pk.db_name_ref(),
        ));
    }

    // parseAll/parseOne.
    out.push_str(&format!(
        "{name}::Vector {class_name}::parseAll(pqxx::result &result) {{\n    {name}::Vector rows;\n    for (const pqxx::row &row: result) {{\n        rows.push_back(parseOne(row));\n    }}\n    return rows;\n}}\n\n"
    ));

    out.push_str(&format!(
        "{name}::Pointer {class_name}::parseOne(const pqxx::row &row) {{\n    auto entity = std::make_shared<{name}>();\n"
    ));
    for (index, column) in table.columns.iter().enumerate() {
        let upper = catalog_model::naming::first_upper(&column.name);
        let ty = column.data_type.native_type(NativeTarget::Cpp);
        if is_null_coerced(column.data_type) {
            out.push_str(&format!(
                "    entity->set{upper}(row[{index}].is_null() ? \"\" : row[{index}].as<{ty}>());\n"
            ));
        } else {
            out.push_str(&format!(
                "    entity->set{upper}(row[{index}].as<{ty}>());\n"
            ));
        }
    }
    out.push_str("    return entity;\n}\n");
    out
}

fn concrete_header(table: &Table) -> String {
    let name = concrete_class_name(table);
    let base = base_class_name(table);
    format!(
        "#pragma once\n\n#include \"base/{base}.h\"\n\nclass {name}: public {base} {{\npublic:\n}};\n"
    )
}

fn concrete_impl(table: &Table) -> String {
    format!("#include \"{}.h\"\n", concrete_class_name(table))
}

/// Emits every Table's base + concrete DB-access class under
/// `generator.output_base_path`.
pub fn generate(model: &Model, generator: &catalog_model::Generator) -> Result<(), EmitError> {
    let root = Path::new(&generator.output_base_path);

    for table in &model.tables {
        let base_h = root.join("base").join(format!("{}.h", base_class_name(table)));
        let base_cpp = root.join("base").join(format!("{}.cpp", base_class_name(table)));
        file_io::write_always(&base_h, &base_header(table, model))?;
        file_io::write_always(&base_cpp, &base_impl(table, model))?;

        let concrete_h = root.join(format!("{}.h", concrete_class_name(table)));
        let concrete_cpp = root.join(format!("{}.cpp", concrete_class_name(table)));
        file_io::write_if_absent(&concrete_h, &concrete_header(table))?;
        file_io::write_if_absent(&concrete_cpp, &concrete_impl(table))?;
    }

    Ok(())
}
