//! arg-minmax-gen - write the arg_min/arg_max migration pair
//!
//! Usage: arg-minmax-gen [--config FILE] [--out-dir DIR] [--schema NAME] [--type T]...
//!
//! With no arguments, writes `up.sql` and `down.sql` for the built-in roster
//! into the current directory and prints nothing.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use arg_minmax_gen::{ConfigOverrides, GeneratorConfig};

#[derive(Parser)]
#[command(name = "arg-minmax-gen")]
#[command(about = "Generate apply/revert migrations for per-type arg_min/arg_max aggregates")]
struct Cli {
    /// YAML configuration file
    #[arg(long, env = "ARG_MINMAX_CONFIG")]
    config: Option<PathBuf>,

    /// Directory receiving up.sql and down.sql
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Schema the migrations set as search_path
    #[arg(long)]
    schema: Option<String>,

    /// Type to instantiate; repeat to replace the configured roster
    #[arg(long = "type", value_name = "TYPE")]
    types: Vec<String>,

    /// Print both artifacts to stdout instead of writing files
    #[arg(long)]
    stdout: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Apply, exercise and revert the migrations in a scratch schema (rolled back)
    Verify {
        /// Postgres connection string
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let generator = config.generator()?;

    match cli.command {
        None => {
            let pair = generator
                .generate(&config.types)
                .context("Failed to render migrations")?;

            if cli.stdout {
                print!("-- {}\n{}", config.up_file, pair.up);
                print!("\n-- {}\n{}", config.down_file, pair.down);
            } else {
                config
                    .writer()
                    .write_pair(&pair)
                    .context("Failed to write migrations")?;
            }
            Ok(())
        }
        Some(Command::Verify { database_url }) => verify(&generator, &config, database_url),
    }
}

fn resolve_config(cli: &Cli) -> Result<GeneratorConfig> {
    let overrides = ConfigOverrides {
        config: cli.config.clone(),
        out_dir: cli.out_dir.clone(),
        schema: cli.schema.clone(),
        types: cli.types.clone(),
    };
    GeneratorConfig::resolve(&overrides).context("Failed to resolve configuration")
}

#[cfg(feature = "database")]
fn verify(
    generator: &arg_minmax_gen::Generator,
    config: &GeneratorConfig,
    database_url: Option<String>,
) -> Result<()> {
    use arg_minmax_gen::database::{DatabaseConfig, PgScratchRunner, ScratchRunner};

    let mut db_config = DatabaseConfig::default();
    if let Some(url) = database_url {
        db_config.database_url = url;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let report = runtime.block_on(async {
        let runner = PgScratchRunner::connect(&db_config).await?;
        runner.verify(generator, &config.types).await
    })?;

    let report = report.into_result()?;
    println!(
        "OK: {} scenarios passed (apply {}ms, revert {}ms)",
        report.scenarios.len(),
        report.apply_ms,
        report.revert_ms
    );
    Ok(())
}

#[cfg(not(feature = "database"))]
fn verify(
    _generator: &arg_minmax_gen::Generator,
    _config: &GeneratorConfig,
    _database_url: Option<String>,
) -> Result<()> {
    anyhow::bail!("verify requires a build with the `database` feature")
}
