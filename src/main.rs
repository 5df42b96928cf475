use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use depcheck_core::{
    render, FileSource, Granularity, OutputDetail, OutputFormat, Session, SessionConfig,
};

/// Compare the dependencies several analysis tools extracted from the same codebase.
#[derive(Parser)]
#[command(name = "depcheck", version)]
struct Cli {
    /// Session configuration (TOML)
    #[arg(long, short)]
    config: PathBuf,

    /// Observations of one tool, as TOOL=PATH. Repeat once per tool.
    #[arg(long = "input", short, value_name = "TOOL=PATH", required = true)]
    inputs: Vec<String>,

    /// Write the report here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputDetail::Normal)]
    detail: OutputDetail,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Override the granularity from the configuration
    #[arg(long, value_enum)]
    granularity: Option<Granularity>,

    #[arg(long, short)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = SessionConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(granularity) = cli.granularity {
        config.granularity = granularity;
    }

    let sources = cli
        .inputs
        .iter()
        .map(|spec| FileSource::parse_spec(spec))
        .collect::<Result<Vec<_>, _>>()?;

    let mut session = Session::new(&config)?;
    info!(granularity = config.granularity.as_str(), tools = sources.len(), "collecting");
    for source in &sources {
        session
            .ingest(source)
            .with_context(|| format!("ingesting {}", source.path().display()))?;
    }

    info!("comparing");
    let report = session.compute();
    let rendered = render(&report, &session, cli.detail, cli.format)?;

    match &cli.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
