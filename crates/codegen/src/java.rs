//! The Java POJO + Spring Data repository emitter.

use std::path::Path;

use catalog_model::naming::first_upper;
use catalog_model::{DataType, Generator, Model, NativeTarget, Table};
use ref_resolver::find_references_to;

use crate::file_io::{self, EmitError};
use crate::naming::forward_pointer_name;

fn java_type(data_type: DataType) -> &'static str {
    data_type.native_type(NativeTarget::Java)
}

fn uses_local_date_time(table: &Table) -> bool {
    table
        .columns
        .iter()
        .any(|c| java_type(c.data_type) == "java.time.LocalDateTime")
}

/// Parses `extends`/`implements`/`withSpringTags` from the Generator's
/// option map, substituting `<?>` in extends/implements entries with the
/// table's own name.
struct JavaOptions {
    extends: Option<String>,
    implements: Vec<String>,
    with_spring_tags: bool,
}

impl JavaOptions {
    fn parse(generator: &Generator, table_name: &str) -> JavaOptions {
        let substitute = |s: &str| s.replace("<?>", table_name);
        JavaOptions {
            extends: generator.option("extends").map(substitute),
            implements: generator
                .option("implements")
                .map(|s| s.split(',').map(str::trim).map(substitute).collect())
                .unwrap_or_default(),
            with_spring_tags: generator.option("withSpringTags").map(|v| v != "false").unwrap_or(true),
        }
    }
}

fn is_user_table(generator: &Generator, table: &Table) -> bool {
    generator.option("userTable").is_some_and(|name| name == table.name)
}

fn pojo(table: &Table, model: &Model, generator: &Generator) -> String {
    let opts = JavaOptions::parse(generator, &table.name);
    let is_user_table = is_user_table(generator, table);
    let mut out = String::new();

    out.push_str(&format!("package {}.dbmodel;\n\n", generator.output_class_path));
    out.push_str("import jakarta.persistence.*;\n");
    if opts.with_spring_tags {
        out.push_str("import lombok.AllArgsConstructor;\n");
        out.push_str("import lombok.Builder;\n");
        out.push_str("import lombok.Data;\n");
        out.push_str("import lombok.NoArgsConstructor;\n");
    }
    if uses_local_date_time(table) {
        out.push_str("import java.time.LocalDateTime;\n");
    }
    if is_user_table {
        out.push_str("import org.springframework.security.core.userdetails.UserDetails;\n");
        out.push_str("import org.springframework.security.core.GrantedAuthority;\n");
        out.push_str("import org.springframework.security.core.authority.SimpleGrantedAuthority;\n");
        out.push_str("import java.util.Collection;\n");
        out.push_str("import java.util.List;\n");
    }
    out.push('\n');

    out.push_str("@Entity\n");
    if opts.with_spring_tags {
        out.push_str("@Data\n@NoArgsConstructor\n@AllArgsConstructor\n@Builder\n");
    }

    let mut heritage = String::new();
    if let Some(base) = &opts.extends {
        heritage.push_str(&format!(" extends {base}"));
    }
    let mut implements_list = opts.implements.clone();
    if is_user_table {
        implements_list.push("UserDetails".to_string());
    }
    if !implements_list.is_empty() {
        heritage.push_str(&format!(" implements {}", implements_list.join(", ")));
    }

    out.push_str(&format!("public class {}{heritage} {{\n", table.name));

    for column in &table.columns {
        if column.is_primary_key {
            let seq = format!("{}_{}_seq", table.db_name_ref(), column.db_name_ref());
            out.push_str("    @Id\n");
            out.push_str(&format!(
                "    @GeneratedValue(strategy=GenerationType.AUTO, generator=\"{seq}\")\n"
            ));
            out.push_str(&format!(
                "    @SequenceGenerator(name=\"{seq}\", sequenceName=\"{seq}\", allocationSize = 1)\n"
            ));
        }
        if let Some(reference) = &column.references {
            out.push_str("    @ManyToOne(fetch = FetchType.LAZY)\n");
            out.push_str(&format!(
                "    @JoinColumn(name = \"{}\")\n",
                column.db_name_ref()
            ));
            out.push_str(&format!(
                "    private {} {};\n\n",
                reference.table,
                forward_pointer_name(column, &reference.table)
            ));
            out.push_str(&format!(
                "    @Column(name = \"{}\", insertable = false, updatable = false)\n",
                column.db_name_ref()
            ));
        }
        out.push_str(&format!("    {} {};\n", java_type(column.data_type), column.name));
    }

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
        let mapped_by = forward_pointer_name(inbound, &table.name);
        out.push_str(&format!(
            "\n    @OneToMany(mappedBy = \"{mapped_by}\")\n    private java.util.List<{child_table}> {}s;\n",
            catalog_model::naming::first_lower(&child_table)
        ));
    }

    if is_user_table {
        let authority_expr = if table.find_column("isAdmin").is_some() {
            "isAdmin ? \"ADMIN\" : \"MEMBER\""
        } else {
            "\"MEMBER\""
        };
        out.push_str(&format!(
            "\n    @Override\n    public Collection<? extends GrantedAuthority> getAuthorities() {{\n        return List.of(new SimpleGrantedAuthority({authority_expr}));\n    }}\n\n"
        ));
        for method in ["isAccountNonExpired", "isAccountNonLocked", "isCredentialsNonExpired", "isEnabled"] {
            out.push_str(&format!(
                "    @Override\n    public boolean {method}() {{\n        return true;\n    }}\n\n"
            ));
        }
    }

    out.push_str("}\n");
    out
}

fn repository(table: &Table, generator: &Generator) -> String {
    let mut out = String::new();
    out.push_str(&format!("package {}.repository;\n\n", generator.output_class_path));
    out.push_str("import org.springframework.data.jpa.repository.JpaRepository;\n");
    out.push_str(&format!(
        "import {}.dbmodel.{};\n",
        generator.output_class_path, table.name
    ));
    if table.columns.iter().any(|c| c.want_finder && !c.is_foreign_key()) {
        out.push_str("import java.util.Optional;\n");
    }
    out.push('\n');
    out.push_str(&format!(
        "public interface {0}Repository extends JpaRepository<{0}, Integer> {{\n",
        table.name
    ));
    for column in &table.columns {
        if !column.want_finder {
            continue;
        }
        let upper = first_upper(&column.name);
        if column.is_foreign_key() {
            out.push_str(&format!(
                "    java.util.List<{}> findBy{upper}({} {});\n",
                table.name,
                java_type(column.data_type),
                column.name
            ));
        } else {
            out.push_str(&format!(
                "    Optional<{}> findBy{upper}({} {});\n",
                table.name,
                java_type(column.data_type),
                column.name
            ));
        }
    }
    out.push_str("}\n");
    out
}

/// Emits every Table's POJO (always overwritten) and Spring repository
/// interface (write-if-absent) under
/// `<outputBasePath>/<slashedClassPath>/{dbmodel,repository}/`.
pub fn generate(model: &Model, generator: &Generator) -> Result<(), EmitError> {
    let slashed = generator.output_class_path.replace('.', "/");
    let root = Path::new(&generator.output_base_path).join(&slashed);

    for table in &model.tables {
        let pojo_path = root.join("dbmodel").join(format!("{}.java", table.name));
        file_io::write_always(&pojo_path, &pojo(table, model, generator))?;

        let repo_path = root
            .join("repository")
            .join(format!("{}Repository.java", table.name));
        file_io::write_if_absent(&repo_path, &repository(table, generator))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::ColumnRef;
    use tempfile::tempdir;

    fn member_post_model() -> Model {
        let mut model = Model::new("Demo");
        let member = model.create_table("Member");
        member.db_name = Some("member".into());
        member.create_column("id").set_primary_key(true).set_data_type(DataType::Serial);
        member.create_column("email").set_data_type(DataType::VarChar).set_want_finder(true);
        member.create_column("isAdmin").set_data_type(DataType::Boolean);

        let post = model.create_table("Post");
        post.db_name = Some("post".into());
        post.create_column("id").set_primary_key(true).set_data_type(DataType::Serial);
        let fk = post.create_column("memberId");
        fk.set_data_type(DataType::Integer).set_want_finder(true);
        fk.references = Some(ColumnRef { table: "Member".into(), column: "id".into() });

        model
    }

    #[test]
    fn pojo_carries_sequence_generator_and_many_to_one() {
        let model = member_post_model();
        let generator = Generator::new("java", catalog_model::generator::kind::JAVA)
            .with_output_base_path("target/gen")
            .with_output_class_path("com.example");
        let post_pojo = pojo(model.find_table("Post").unwrap(), &model, &generator);
        assert!(post_pojo.contains("@SequenceGenerator(name=\"post_id_seq\""));
        assert!(post_pojo.contains("@ManyToOne(fetch = FetchType.LAZY)"));
        assert!(post_pojo.contains("@JoinColumn(name = \"member_id\")"));
        assert!(post_pojo.contains("insertable = false, updatable = false"));
    }

    #[test]
    fn pojo_carries_one_to_many_on_parent_side() {
        let model = member_post_model();
        let generator = Generator::new("java", catalog_model::generator::kind::JAVA)
            .with_output_base_path("target/gen")
            .with_output_class_path("com.example");
        let member_pojo = pojo(model.find_table("Member").unwrap(), &model, &generator);
        assert!(member_pojo.contains("@OneToMany(mappedBy = \"member\")"));
        assert!(member_pojo.contains("List<Post> posts;"));
    }

    #[test]
    fn user_table_gets_authenticated_principal_capability_set() {
        let model = member_post_model();
        let generator = Generator::new("java", catalog_model::generator::kind::JAVA)
            .with_output_base_path("target/gen")
            .with_output_class_path("com.example")
            .with_option("userTable", "Member");
        let member_pojo = pojo(model.find_table("Member").unwrap(), &model, &generator);
        assert!(member_pojo.contains("implements UserDetails"));
        assert!(member_pojo.contains("isAdmin ? \"ADMIN\" : \"MEMBER\""));
        assert!(member_pojo.contains("isAccountNonExpired"));
    }

    #[test]
    fn extends_and_implements_substitute_self_placeholder() {
        let model = member_post_model();
        let generator = Generator::new("java", catalog_model::generator::kind::JAVA)
            .with_output_base_path("target/gen")
            .with_output_class_path("com.example")
            .with_option("extends", "AbstractEntity<<?>>");
        let member_pojo = pojo(model.find_table("Member").unwrap(), &model, &generator);
        assert!(member_pojo.contains("extends AbstractEntity<Member>"));
    }

    #[test]
    fn repository_finder_return_type_depends_on_foreign_key_vs_unique_column() {
        let model = member_post_model();
        let generator = Generator::new("java", catalog_model::generator::kind::JAVA)
            .with_output_base_path("target/gen")
            .with_output_class_path("com.example");
        let member_repo = repository(model.find_table("Member").unwrap(), &generator);
        assert!(member_repo.contains("Optional<Member> findByEmail(String email);"));

        let post_repo = repository(model.find_table("Post").unwrap(), &generator);
        assert!(post_repo.contains("List<Post> findByMemberId(Integer memberId);"));
    }

    #[test]
    fn repository_is_write_if_absent_pojo_always_overwritten() {
        let model = member_post_model();
        let dir = tempdir().unwrap();
        let generator = Generator::new("java", catalog_model::generator::kind::JAVA)
            .with_output_base_path(dir.path().to_str().unwrap())
            .with_output_class_path("com.example");
        generate(&model, &generator).unwrap();

        let repo_path = dir
            .path()
            .join("com/example/repository/MemberRepository.java");
        std::fs::write(&repo_path, "// hand edited").unwrap();
        generate(&model, &generator).unwrap();
        assert_eq!(std::fs::read_to_string(&repo_path).unwrap(), "// hand edited");

        let pojo_path = dir.path().join("com/example/dbmodel/Member.java");
        assert!(std::fs::read_to_string(&pojo_path).unwrap().contains("package com.example.dbmodel;"));
    }
}
