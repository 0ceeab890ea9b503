use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lazy")]
#[command(about = "Lazy rebalancing: split a contribution across the neediest assets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Allocate from inline columns (blank value cells are dropped, like a sheet range)
    Alloc {
        /// Current values, comma separated. Empty entries are skipped: "100,,250".
        /// Use ';' to separate when amounts carry thousands separators: "$1,200;;$800"
        #[arg(long)]
        values: String,

        /// Target fractions, aligned to the non-blank values: "0.6,40%" or "0.6;40%"
        #[arg(long)]
        targets: String,

        /// Amount to add (positive) or withdraw (negative)
        #[arg(long, allow_negative_numbers = true)]
        contribution: f64,

        /// Round printed deltas to this many decimal places (0-15)
        #[arg(long)]
        decimals: Option<u32>,

        /// Print a JSON report instead of key=value lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Allocate from layered portfolio YAML files
    Plan {
        /// Portfolio files in merge order (holdings -> overlays)
        #[arg(long = "portfolio", required = true)]
        portfolio_paths: Vec<String>,

        /// Override the file's `contribution`
        #[arg(long, allow_negative_numbers = true)]
        contribution: Option<f64>,

        /// Override the file's `output.decimals`
        #[arg(long)]
        decimals: Option<u32>,

        /// Print a JSON report instead of key=value lines
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Fail on unknown keys instead of warning
        #[arg(long, default_value_t = false)]
        strict_keys: bool,
    },

    /// Compute layered portfolio hash + print canonical JSON
    PortfolioHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Load .env.local if present (dev convenience); silent when absent.
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Alloc {
            values,
            targets,
            contribution,
            decimals,
            json,
        } => commands::alloc::run_alloc(&values, &targets, contribution, decimals, json)?,

        Commands::Plan {
            portfolio_paths,
            contribution,
            decimals,
            json,
            strict_keys,
        } => commands::plan::run_plan(commands::plan::PlanArgs {
            portfolio_paths,
            contribution,
            decimals,
            json,
            strict_keys,
        })?,

        Commands::PortfolioHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = lazy_config::load_layered_yaml(&path_refs)?;
            println!("portfolio_hash={}", loaded.portfolio_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

/// stderr only; stdout carries the report.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}
