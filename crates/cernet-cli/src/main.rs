//! cernet: ceRNA network builder.
//! Entry point for the command-line binary.

use std::path::PathBuf;

use anyhow::Context;
use cernet_common::PipelineConfig;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cernet", version, about = "Build a ceRNA interaction network and filter expression data against it")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download, filter, harmonise and merge the interaction databases.
    Integrate {
        /// Config file (TOML, YAML or JSON). Defaults to $CERNET_CONFIG, then ./cernet.toml.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Stop after writing the merged network.
        #[arg(long)]
        skip_global_filter: bool,
        /// Write a JSON run report here.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Filter an expression matrix to genes in a ceRNA network.
    Preprocess {
        /// Expression matrix, genes × cells (tab or comma delimited).
        #[arg(long)]
        expr: PathBuf,
        /// Network edge list with `source` and `target` columns.
        #[arg(long)]
        network: PathBuf,
        /// Output path for the filtered matrix.
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the effective configuration as TOML.
    ShowConfig {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cernet=info,info")),
        )
        .init();

    let cli = Cli::parse();
    info!(version = env!("CARGO_PKG_VERSION"), "cernet starting");

    match cli.command {
        Command::Integrate { config, skip_global_filter, report } => {
            let config = PipelineConfig::load(config.as_deref()).context("loading configuration")?;
            let outcome = cernet_ingestion::pipeline::run_integration(&config, !skip_global_filter)
                .await
                .context("integrating interaction databases")?;
            info!(
                merged_edges = outcome.merged_edges,
                final_edges = ?outcome.final_edges,
                cutoff = ?outcome.cutoff,
                duration_ms = outcome.duration_ms,
                "Integration complete"
            );
            if let Some(path) = report {
                outcome
                    .write_json(&path)
                    .with_context(|| format!("writing report to {}", path.display()))?;
            }
        }
        Command::Preprocess { expr, network, out } => {
            let report = cernet_expression::preprocess(&expr, &network, &out)
                .with_context(|| format!("preprocessing {}", expr.display()))?;
            info!(
                not_in_network = report.not_in_network,
                zero_expression = report.zero_expression,
                remaining = report.remaining,
                "Preprocessing complete"
            );
        }
        Command::ShowConfig { config } => {
            let config = PipelineConfig::load(config.as_deref()).context("loading configuration")?;
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_requires_all_paths() {
        let err = Cli::try_parse_from(["cernet", "preprocess", "--expr", "e.tsv", "--network", "n.tsv"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_preprocess_parses() {
        let cli = Cli::try_parse_from([
            "cernet", "preprocess", "--expr", "e.tsv", "--network", "n.tsv", "--out", "o.tsv",
        ])
        .unwrap();
        match cli.command {
            Command::Preprocess { expr, network, out } => {
                assert_eq!(expr, PathBuf::from("e.tsv"));
                assert_eq!(network, PathBuf::from("n.tsv"));
                assert_eq!(out, PathBuf::from("o.tsv"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_integrate_defaults() {
        let cli = Cli::try_parse_from(["cernet", "integrate"]).unwrap();
        match cli.command {
            Command::Integrate { config, skip_global_filter, report } => {
                assert!(config.is_none());
                assert!(!skip_global_filter);
                assert!(report.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_integrate_flags() {
        let cli = Cli::try_parse_from([
            "cernet", "integrate", "--config", "run.yaml", "--skip-global-filter", "--report", "r.json",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Integrate { skip_global_filter: true, config: Some(_), report: Some(_) }
        ));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["cernet"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
