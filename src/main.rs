use anyhow::Context;
use clap::Parser;
use sqlcraft::config::{self, DialectConfig};
use sqlcraft::entity_catalog::EntityCatalog;
use sqlcraft::sql_generator::StatementRequest;
use std::io::Read;
use std::path::PathBuf;

/// sqlcraft - render a JSON statement request to parameterized MySQL
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML entity catalog
    #[arg(long)]
    catalog: PathBuf,

    /// Entity the statement targets
    #[arg(long)]
    entity: String,

    /// JSON statement request file, or `-` for stdin
    #[arg(long, default_value = "-")]
    request: String,

    /// YAML dialect configuration (defaults to SQLCRAFT_* environment variables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Placeholder prefix override
    #[arg(long)]
    parameter_prefix: Option<String>,

    /// Log rendered statements at debug level
    #[arg(long)]
    log_statements: bool,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

impl From<&Cli> for config::CliConfig {
    fn from(cli: &Cli) -> Self {
        config::CliConfig {
            parameter_prefix: cli.parameter_prefix.clone(),
            log_statements: cli.log_statements,
        }
    }
}

fn read_request(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading request from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading request {}", source))
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => DialectConfig::from_yaml_file(path),
        None => DialectConfig::from_env(),
    }
    .context("Configuration error")?;
    let dialect = base.apply_cli((&cli).into()).context("Configuration error")?;

    let catalog = EntityCatalog::from_yaml_file(&cli.catalog)?;
    let metadata = catalog.get(&cli.entity)?;

    let request: StatementRequest = serde_json::from_str(&read_request(&cli.request)?)
        .context("parsing statement request")?;
    let rendered = request.render(metadata, &dialect)?;
    log::debug!("Rendered {:?} statement for {}", request.kind, cli.entity);

    let output = if cli.pretty {
        serde_json::to_string_pretty(&rendered)?
    } else {
        serde_json::to_string(&rendered)?
    };
    println!("{}", output);
    Ok(())
}
