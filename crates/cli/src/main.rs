use clap::Parser;
use ferrous_rules_domain::CliOverrides;
use tracing::{info, warn};

mod bootstrap;
mod di;

#[derive(Parser)]
#[command(name = "ferrous-rules")]
#[command(version)]
#[command(about = "Ferrous Rules - merge, de-conflict and DNS-validate domain filter lists")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Output rule file
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<String>,

    /// Local override rule file
    #[arg(short = 'l', long, value_name = "FILE")]
    local_file: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Skip DNS validation of block rules
    #[arg(long)]
    no_validate: bool,

    /// Number of concurrent DNS lookups
    #[arg(long)]
    concurrency: Option<usize>,

    /// Ignore the resolution cache and resolve every domain again
    #[arg(long)]
    force_refresh: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        output_path: cli.output,
        local_file: cli.local_file,
        log_level: cli.log_level,
        concurrency: cli.concurrency,
        no_validate: cli.no_validate,
        force_refresh: cli.force_refresh,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting Ferrous Rules v{}", env!("CARGO_PKG_VERSION"));

    let use_cases = di::UseCases::new(&config)?;
    let summary = use_cases.generate.execute().await?;

    info!(
        local_lines = summary.local_lines,
        upstream_lines = summary.upstream_lines,
        failed_sources = summary.failed_sources,
        merged_rules = summary.merged_rules,
        local_overrides = summary.local_overrides,
        polarity_conflicts = summary.polarity_conflicts,
        final_rules = summary.final_rules,
        "Run complete"
    );

    if let Some(stats) = &summary.validation {
        info!(
            unique_domains = stats.unique_domains,
            cache_hits = stats.cache_hits,
            resolved = stats.resolved,
            not_found = stats.not_found,
            indeterminate = stats.indeterminate,
            timed_out = stats.timed_out,
            allow_exempt = stats.allow_exempt,
            removed = stats.removed,
            "Validation summary"
        );
    }

    if summary.failed_sources > 0 {
        warn!(
            failed_sources = summary.failed_sources,
            "Some upstream sources could not be fetched"
        );
    }

    Ok(())
}
