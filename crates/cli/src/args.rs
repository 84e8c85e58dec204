//! The command-line surface: a single executable operating on one
//! `--model` file, with `--create`/`--generate`/`--listgen` modes and
//! per-emitter-kind filters on `--generate`.

use std::path::PathBuf;

/// `modelgen`'s full argument set: one flat struct, since this CLI has no
/// subcommands.
#[derive(clap::Parser, Debug)]
#[clap(author, version, about = "Schema-driven code and migration generator")]
pub struct Args {
    /// Path to the model JSON document. Required for every mode.
    #[clap(long, env = "MODELGEN_MODEL")]
    pub model: PathBuf,

    /// Write a brand-new empty model to `--model`'s path and exit.
    #[clap(long)]
    pub create: bool,

    /// Run the configured generators against the model.
    #[clap(long, visible_alias = "gen")]
    pub generate: bool,

    /// Print configured generator names, one per line, and exit.
    #[clap(long)]
    pub listgen: bool,

    /// Restrict `--generate` to the Flyway migration generator.
    #[clap(long)]
    pub flyway: bool,

    /// Restrict `--generate` to the SQL generator.
    #[clap(long)]
    pub sql: bool,

    /// Restrict `--generate` to the Java generator.
    #[clap(long)]
    pub java: bool,

    /// The Flyway migration comment to use for incremental migrations
    /// (ignored on first emission, which is always `CreateDatabase`).
    #[clap(long, default_value = "Migration")]
    pub migration_comment: String,

    #[clap(flatten)]
    pub log: crate::logging::LogArgs,
}

impl Args {
    /// The generator-kind filter implied by `--flyway`/`--sql`/`--java`: an
    /// empty set means "run every configured generator".
    pub fn kind_filter(&self) -> Vec<&'static str> {
        let mut kinds = Vec::new();
        if self.flyway {
            kinds.push(catalog_model::generator::kind::FLYWAY);
        }
        if self.sql {
            kinds.push(catalog_model::generator::kind::SQL);
        }
        if self.java {
            kinds.push(catalog_model::generator::kind::JAVA);
        }
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn no_filter_flags_means_empty_filter() {
        let args = Args::parse_from(["modelgen", "--model", "m.json", "--generate"]);
        assert!(args.kind_filter().is_empty());
    }

    #[test]
    fn combining_flyway_and_sql_filters_both_kinds() {
        let args = Args::parse_from(["modelgen", "--model", "m.json", "--generate", "--flyway", "--sql"]);
        let kinds = args.kind_filter();
        assert_eq!(kinds.len(), 2);
        assert!(kinds.contains(&catalog_model::generator::kind::FLYWAY));
        assert!(kinds.contains(&catalog_model::generator::kind::SQL));
    }
}
