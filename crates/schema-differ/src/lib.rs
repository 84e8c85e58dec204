//! The migration differ: compares the live model against the
//! `*_generated` snapshot embedded in it and synthesizes the minimal
//! ordered Flyway migration script. Also hosts the DDL formatting shared
//! with the standalone SQL emitter (`codegen::sql`).

pub mod ddl;
pub mod diff;

pub use diff::{diff, migration_file_name, stamp_after_emission, MigrationResult};
