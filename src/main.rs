//! profile-reader CLI: resolve subjects across the pilot data sources and
//! print profiles, recommendation reports and source status.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use profile_reader::{
    IdMatchPolicy, ProfileReaderConfig, SourceManifest, build_report, load_bundle, resolve_profile,
};

#[derive(Parser)]
#[command(
    name = "profile-reader",
    version,
    about = "Subject resolution and signal extraction over pilot data sources"
)]
struct Cli {
    /// Root directory holding main.xlsx and the data/ folder.
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// Identifier comparison policy.
    #[arg(long, global = true, value_enum, default_value = "strict")]
    id_match: IdMatchArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum IdMatchArg {
    /// Exact textual equality only.
    Strict,
    /// Also match numerically equal identifiers.
    Coerced,
}

impl From<IdMatchArg> for IdMatchPolicy {
    fn from(arg: IdMatchArg) -> Self {
        match arg {
            IdMatchArg::Strict => IdMatchPolicy::Strict,
            IdMatchArg::Coerced => IdMatchPolicy::Coerced,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build a recommendation report for a subject.
    Recommend {
        /// Subject identifier to resolve.
        #[arg(long, short = 'u')]
        userid: String,
    },

    /// Print a subject's resolved profile: signals and per-source row counts.
    Profile {
        /// Subject identifier to resolve.
        #[arg(long, short = 'u')]
        userid: String,
    },

    /// Show how each source loaded and which subject key was deduced.
    Status,
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ProfileReaderConfig {
        id_match: cli.id_match.into(),
        ..ProfileReaderConfig::default()
    };

    let manifest = SourceManifest::default_layout(&cli.data_dir);
    let bundle = load_bundle(&manifest);

    match cli.command {
        Commands::Recommend { userid } => {
            let report = build_report(&bundle, &userid, &config, None);
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("serializing report")?
            );
        }
        Commands::Profile { userid } => {
            let output = match resolve_profile(&bundle, &userid, &config) {
                Some(profile) => {
                    let sources: BTreeMap<String, usize> = profile
                        .source_row_counts()
                        .iter()
                        .map(|(role, rows)| (role.to_string(), *rows))
                        .collect();
                    serde_json::json!({
                        "subject_id": profile.subject_id,
                        "sources": sources,
                        "merged_rows": profile.merged.num_rows(),
                        "signals": profile.signals,
                    })
                }
                None => serde_json::json!({
                    "message": format!("User {userid} not found in any data source."),
                }),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("serializing profile")?
            );
        }
        Commands::Status => {
            for (role, status) in bundle.statuses() {
                println!("{role:<18} {status}");
            }
            match bundle.subject_key() {
                Some(key) => println!("subject key: {key}"),
                None => println!("subject key: none"),
            }
        }
    }

    Ok(())
}
