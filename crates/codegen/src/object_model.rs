//! The C++ object-model emitter.
//!
//! Per Table this writes an always-overwritten `<Table>_Base.{h,cpp}` under
//! `base/`, and a write-if-absent `<Table>.{h,cpp}` the user is expected to
//! extend, plus one aggregate "all includes" header per run.
//!
//! Unlike the Java emitter's repository interface, this emitter does not
//! generate finder functions for `Column::want_finder` columns — the
//! object-model/DB-access split has no per-column query surface to put them
//! on.

use std::path::Path;

use catalog_model::{DataType, Model, NativeTarget, Table};
use ref_resolver::find_references_to;

use crate::file_io::{self, EmitError};
use crate::naming::{forward_pointer_name, reverse_collection_name};

fn base_class_name(table: &Table) -> String {
    format!("{}_Base", table.name)
}

fn cpp_type(data_type: DataType) -> &'static str {
    data_type.native_type(NativeTarget::Cpp)
}

fn is_string_type(cpp: &str) -> bool {
    cpp == "std::string"
}

fn base_header(table: &Table) -> String {
    let mut out = String::new();
    out.push_str("#pragma once\n\n");
    out.push_str("#include <string>\n#include <vector>\n#include <memory>\n\n");
    out.push_str("#include <showlib/JSONSerializable.h>\n\n");

    // Forward declarations for outbound and inbound reference partners,
    // breaking #include cycles between mutually-referencing tables.
    let mut forward_decls: Vec<String> = table
        .foreign_keys()
        .filter_map(|c| c.references.as_ref().map(|r| r.table.clone()))
        .collect();
    forward_decls.sort();
    forward_decls.dedup();
    for name in &forward_decls {
        out.push_str(&format!("class {name};\n"));
    }
    if !forward_decls.is_empty() {
        out.push('\n');
    }

    let name = &table.name;
    let class_name = base_class_name(table);
    out.push_str(&format!("class {name};\n\n"));
    out.push_str(&format!(
        "class {class_name}: public ShowLib::JSONSerializable {{\npublic:\n"
    ));
    out.push_str(&format!("    typedef std::shared_ptr<{name}> Pointer;\n"));
    out.push_str(&format!("    typedef std::weak_ptr<{name}> WPointer;\n"));
    out.push_str(&format!("    typedef std::vector<Pointer> Vector;\n\n"));
    out.push_str(&format!("    virtual ~{class_name}();\n\n"));

    for column in &table.columns {
        let upper = catalog_model::naming::first_upper(&column.name);
        let ty = cpp_type(column.data_type);
        let is_str = is_string_type(ty);
        let (constness, refness) = if is_str { ("const ", " &") } else { ("", "") };
        out.push_str(&format!(
            "    {constness}{ty}{refness} get{upper}() const {{ return {}; }}\n",
            column.name
        ));
        out.push_str(&format!(
            "    {class_name} & set{upper}({constness}{ty}{refness} value) {{ {} = value; return *this; }}\n",
            column.name
        ));
    }

    // Forward FK pointer fields.
    for column in table.foreign_keys() {
        if let Some(reference) = &column.references {
            let field = forward_pointer_name(column, &reference.table);
            out.push_str(&format!(
                "    {0}::Pointer {1};\n",
                reference.table, field
            ));
        }
    }

    out.push_str("\n    void fromJSON(const JSON &) override;\n");
    out.push_str("    JSON toJSON(JSON &) const override;\n");

    out.push_str("\nprivate:\n");
    for column in &table.columns {
        let ty = cpp_type(column.data_type);
        let default = match ty {
            "int" | "int16_t" | "int64_t" => " = 0",
            "double" | "float" => " = 0.0",
            "bool" => " = false",
            _ => "",
        };
        out.push_str(&format!("    {ty} {}{default};\n", column.name));
    }
    out.push_str("};\n");
    out
}

/// Builds the base header's reverse-collection fields and add/remove/
/// removeAll methods for every inbound FK, then splices them into
/// [`base_header`]'s output just before the JSON method declarations —
/// `base_header` alone only has per-table context, and reverse collections
/// require looking across the whole model for who references this table.
fn base_header_with_reverse_fields(table: &Table, model: &Model) -> String {
    let mut out = base_header(table);
    let mut reverse_fields = String::new();
    for inbound in find_references_to(model, &table.name) {
        let child_table = model
            .tables
            .iter()
            .find(|t| t.columns.iter().any(|c| std::ptr::eq(c, inbound)))
            .map(|t| t.name.clone())
            .unwrap_or_default();
        if child_table.is_empty() {
            continue;
        }
        let field = reverse_collection_name(inbound, &child_table, "Vector");
        reverse_fields.push_str(&format!("    {child_table}::Vector {field};\n"));
        let upper = catalog_model::naming::first_upper(&child_table);
        reverse_fields.push_str(&format!(
            "    void add{upper}({child_table}::Pointer);\n"
        ));
        reverse_fields.push_str(&format!(
            "    void remove{upper}({child_table}::Pointer);\n"
        ));
        reverse_fields.push_str(&format!("    void removeAll{upper}();\n"));
    }
    if let Some(idx) = out.find("\n    void fromJSON") {
        out.insert_str(idx, &reverse_fields);
    }
    out
}

fn base_impl(table: &Table) -> String {
    let class_name = base_class_name(table);
    let mut out = String::new();
    out.push_str("#include <iostream>\n\n");
    out.push_str(&format!("#include \"{class_name}.h\"\n\n"));
    out.push_str("using std::string;\n\n");
    out.push_str(&format!("{class_name}::~{class_name}() {{\n}}\n\n"));

    out.push_str(&format!("void {class_name}::fromJSON(const JSON &json) {{\n"));
    for column in &table.columns {
        if !column.serialize {
            continue;
        }
        out.push_str(&format!(
            "    {} = {}Value(json, \"{}\");\n",
            column.name,
            cpp_type(column.data_type),
            column.name
        ));
    }
    out.push_str("}\n\n");

    out.push_str(&format!("JSON {class_name}::toJSON(JSON &json) const {{\n"));
    for column in &table.columns {
        if !column.serialize {
            continue;
        }
        out.push_str(&format!("    json[\"{0}\"] = {0};\n", column.name));
    }
    out.push_str("    return json;\n}\n");
    out
}

fn concrete_header(table: &Table) -> String {
    let name = &table.name;
    let base = base_class_name(table);
    format!(
        "#pragma once\n\n#include <string>\n#include \"base/{base}.h\"\n\nclass {name}: public {base} {{\npublic:\n    ~{name}();\n}};\n"
    )
}

fn concrete_impl(table: &Table) -> String {
    let name = &table.name;
    format!("#include \"{name}.h\"\n\n{name}::~{name}() {{\n}}\n")
}

fn all_includes_header(model: &Model) -> String {
    let mut out = String::from("#pragma once\n\n");
    for table in &model.tables {
        out.push_str(&format!("#include \"{}.h\"\n", table.name));
    }
    out
}

/// Emits every Table's base + concrete object-model class, then the
/// aggregate include manifest, under `generator.output_base_path`.
pub fn generate(model: &Model, generator: &catalog_model::Generator) -> Result<(), EmitError> {
    let root = Path::new(&generator.output_base_path);

    for table in &model.tables {
        let base_h = root.join("base").join(format!("{}.h", base_class_name(table)));
        let base_cpp = root.join("base").join(format!("{}.cpp", base_class_name(table)));
        file_io::write_always(&base_h, &base_header_with_reverse_fields(table, model))?;
        file_io::write_always(&base_cpp, &base_impl(table))?;

        let concrete_h = root.join(format!("{}.h", table.name));
        let concrete_cpp = root.join(format!("{}.cpp", table.name));
        file_io::write_if_absent(&concrete_h, &concrete_header(table))?;
        file_io::write_if_absent(&concrete_cpp, &concrete_impl(table))?;
    }

    file_io::write_always(&root.join("AllIncludes.h"), &all_includes_header(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::DataType;
    use tempfile::tempdir;

    fn member_post_model() -> Model {
        let mut model = Model::new("Demo");
        let member = model.create_table("Member");
        member.db_name = Some("member".into());
        member.create_column("id").set_primary_key(true).set_data_type(DataType::Serial).set_nullable(false);
        member.create_column("username").set_data_type(DataType::VarChar).set_data_length(64);

        let post = model.create_table("Post");
        post.db_name = Some("post".into());
        post.create_column("id").set_primary_key(true).set_data_type(DataType::Serial).set_nullable(false);
        let fk = post.create_column("memberId");
        fk.set_data_type(DataType::Integer);
        fk.references = Some(catalog_model::ColumnRef { table: "Member".into(), column: "id".into() });

        model
    }

    #[test]
    fn base_header_contains_getters_setters_and_forward_pointer() {
        let model = member_post_model();
        let post = model.find_table("Post").unwrap();
        let header = base_header_with_reverse_fields(post, &model);
        assert!(header.contains("getMemberId() const"));
        assert!(header.contains("setMemberId"));
        assert!(header.contains("Member::Pointer member;"));
        assert!(header.contains("class Member;"));
    }

    #[test]
    fn member_base_header_carries_reverse_collection_and_add_remove() {
        let model = member_post_model();
        let member = model.find_table("Member").unwrap();
        let header = base_header_with_reverse_fields(member, &model);
        assert!(header.contains("Post::Vector postVector;"));
        assert!(header.contains("addPost(Post::Pointer)"));
        assert!(header.contains("removePost(Post::Pointer)"));
        assert!(header.contains("removeAllPost()"));
    }

    #[test]
    fn string_getter_returns_const_ref_others_by_value() {
        let model = member_post_model();
        let member = model.find_table("Member").unwrap();
        let header = base_header_with_reverse_fields(member, &model);
        assert!(header.contains("const std::string & getUsername() const"));
        assert!(header.contains("int getId() const"));
    }

    #[test]
    fn to_json_skips_non_serialized_columns() {
        let mut model = Model::new("Demo");
        let t = model.create_table("Secret");
        t.create_column("token").set_data_type(DataType::VarChar).serialize = false;
        t.create_column("label").set_data_type(DataType::VarChar);
        let impl_src = base_impl(model.find_table("Secret").unwrap());
        assert!(!impl_src.contains("json[\"token\"]"));
        assert!(impl_src.contains("json[\"label\"]"));
    }

    #[test]
    fn concrete_files_are_write_if_absent_and_base_is_always_overwritten() {
        let model = member_post_model();
        let dir = tempdir().unwrap();
        let generator = catalog_model::Generator::new("cpp", catalog_model::generator::kind::CPP)
            .with_output_base_path(dir.path().to_str().unwrap());

        generate(&model, &generator).unwrap();
        let concrete_path = dir.path().join("Post.cpp");
        std::fs::write(&concrete_path, "// hand edited").unwrap();

        generate(&model, &generator).unwrap();
        assert_eq!(std::fs::read_to_string(&concrete_path).unwrap(), "// hand edited");

        let base_path = dir.path().join("base").join("Post_Base.cpp");
        assert!(std::fs::read_to_string(&base_path).unwrap().contains("Post_Base::~Post_Base"));
    }
}
