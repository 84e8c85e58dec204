//! The Flyway config + migration emitter.
//!
//! Unlike the other emitters this one mutates the [`catalog_model::Model`]
//! it's given (the post-emission version/snapshot stamp) and reports
//! whether it did so, so the Processor knows to persist the model back to
//! disk.

use std::path::{Path, PathBuf};

use catalog_model::{Database, Generator, Model};
use schema_differ::{diff, migration_file_name, stamp_after_emission};

use crate::file_io::{self, EmitError};

/// What one Flyway emission produced: the migration file it wrote (if the
/// diff found changes), and whether the model's version/snapshot fields
/// were stamped and need persisting.
pub struct FlywayOutcome {
    pub migration_path: Option<PathBuf>,
    pub model_dirty: bool,
}

/// Runs the full Flyway emitter: regenerate `flyway.toml` and ensure
/// `migrations/`/`schema-model/` exist, then diff the model against its
/// last-generated snapshot and write at most one migration file, stamping
/// the model afterward if one was written.
pub fn generate(model: &mut Model, generator: &Generator) -> Result<FlywayOutcome, EmitError> {
    generate_config_files(model, generator)?;
    generate_migrations(model, generator)
}

fn generate_config_files(model: &Model, generator: &Generator) -> Result<(), EmitError> {
    let root = Path::new(&generator.output_base_path);
    file_io::move_if_different(&root.join("flyway.toml"), &render_toml(model))?;
    file_io::ensure_dir(&root.join("migrations"))?;
    file_io::ensure_dir(&root.join("schema-model"))?;
    Ok(())
}

/// Renders `flyway.toml`: a top-level `databaseType` taken from the first
/// configured [`Database`]'s driver, a fixed `[flyway]` block, then one
/// `[environments.<envName>]` section per configured database.
fn render_toml(model: &Model) -> String {
    let mut out = String::new();

    let database_type = model
        .databases
        .first()
        .map(|db| db.driver.as_str())
        .unwrap_or(Database::DRIVER_POSTGRESQL);
    out.push_str(&format!("databaseType = \"{database_type}\"\n"));
    out.push_str(&format!("name = \"{}\"\n\n", model.name));

    out.push_str("[flyway]\n");
    out.push_str("mixed = true\n");
    out.push_str("outOfOrder = true\n");
    out.push_str("locations = [\"filesystem:migrations\"]\n");
    out.push_str("validateMigrationNaming = true\n");

    for db in &model.databases {
        out.push_str(&format!("\n[environments.{}]\n", db.env_name));
        out.push_str(&format!("url = \"{}\"\n", db.jdbc_url()));
        out.push_str(&format!("user = \"{}\"\n", db.username));
        if !db.password.is_empty() {
            out.push_str(&format!("password = \"{}\"\n", db.password));
        }
        out.push_str("schemas = [\"public\"]\n");
    }

    out
}

fn generate_migrations(model: &mut Model, generator: &Generator) -> Result<FlywayOutcome, EmitError> {
    let comment = generator.option("migrationComment").unwrap_or("Migration");
    let result = diff(model, comment);

    let Some(sql) = result.sql else {
        return Ok(FlywayOutcome {
            migration_path: None,
            model_dirty: false,
        });
    };

    let filename = migration_file_name(chrono::Utc::now(), 1, &result.comment);
    let path = Path::new(&generator.output_base_path)
        .join("migrations")
        .join(filename);
    file_io::write_always(&path, &sql)?;

    stamp_after_emission(model);

    Ok(FlywayOutcome {
        migration_path: Some(path),
        model_dirty: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::DataType;
    use tempfile::tempdir;

    fn demo_model() -> Model {
        let mut model = Model::new("Demo");
        let member = model.create_table("Member");
        member.db_name = Some("member".into());
        member
            .create_column("id")
            .set_primary_key(true)
            .set_data_type(DataType::Serial)
            .set_nullable(false);
        member
            .create_column("username")
            .set_data_type(DataType::VarChar)
            .set_data_length(64);
        model
    }

    #[test]
    fn first_emission_writes_one_migration_and_stamps_model() {
        let mut model = demo_model();
        let dir = tempdir().unwrap();
        let generator = Generator::new("flyway", catalog_model::generator::kind::FLYWAY)
            .with_output_base_path(dir.path().to_str().unwrap());

        let outcome = generate(&mut model, &generator).unwrap();
        let path = outcome.migration_path.unwrap();
        assert!(outcome.model_dirty);
        assert!(path.to_string_lossy().contains("_CreateDatabase.sql"));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("CREATE TABLE member("));
        assert_eq!(model.generated_version, 1);
        assert!(dir.path().join("migrations").is_dir());
        assert!(dir.path().join("schema-model").is_dir());
        assert!(dir.path().join("flyway.toml").exists());
    }

    #[test]
    fn second_emission_with_no_changes_writes_no_file() {
        let mut model = demo_model();
        let dir = tempdir().unwrap();
        let generator = Generator::new("flyway", catalog_model::generator::kind::FLYWAY)
            .with_output_base_path(dir.path().to_str().unwrap());

        generate(&mut model, &generator).unwrap();
        let migrations_before: Vec<_> = std::fs::read_dir(dir.path().join("migrations"))
            .unwrap()
            .collect();

        let outcome = generate(&mut model, &generator).unwrap();
        assert!(outcome.migration_path.is_none());
        assert!(!outcome.model_dirty);

        let migrations_after: Vec<_> = std::fs::read_dir(dir.path().join("migrations"))
            .unwrap()
            .collect();
        assert_eq!(migrations_before.len(), migrations_after.len());
    }

    #[test]
    fn toml_renders_environment_per_database() {
        let mut model = Model::new("Demo");
        model.push_database(
            Database::new("app")
                .with_env_name("prod")
                .with_host("db.example.com")
                .with_port(5432)
                .with_username("app_user"),
        );
        let toml = render_toml(&model);
        assert!(toml.contains("databaseType = \"PostgreSql\""));
        assert!(toml.contains("[environments.prod]"));
        assert!(toml.contains("url = \"jdbc:postgresql://db.example.com:5432/app\""));
        assert!(toml.contains("user = \"app_user\""));
        assert!(!toml.contains("password"));
    }

    #[test]
    fn toml_is_move_if_different() {
        let model = demo_model();
        let dir = tempdir().unwrap();
        let generator = Generator::new("flyway", catalog_model::generator::kind::FLYWAY)
            .with_output_base_path(dir.path().to_str().unwrap());

        generate_config_files(&model, &generator).unwrap();
        let toml_path = dir.path().join("flyway.toml");
        let mtime1 = std::fs::metadata(&toml_path).unwrap().modified().unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));
        generate_config_files(&model, &generator).unwrap();
        let mtime2 = std::fs::metadata(&toml_path).unwrap().modified().unwrap();
        assert_eq!(mtime1, mtime2);
    }
}
