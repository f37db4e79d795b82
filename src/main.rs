use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use sdlift::codegen::{CodeGenConfig, CodeGenerator, OutputTarget, RenderMode, SdlGenerator};
use sdlift::config::DbConfig;
use sdlift::inferrer::Inferrer;
use sdlift::introspect::TableFilter;
use sdlift::schema::Schema;

#[derive(Debug, Clone, ValueEnum)]
enum Database {
    Postgres,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum CliRenderMode {
    /// Full type declarations with fields and directives
    #[default]
    Full,
    /// Empty type skeletons, one per entity table
    Summary,
}

impl From<CliRenderMode> for RenderMode {
    fn from(mode: CliRenderMode) -> Self {
        match mode {
            CliRenderMode::Full => RenderMode::Full,
            CliRenderMode::Summary => RenderMode::Summary,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "sdlift")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source database type
    database: Database,

    /// Output file path, or `-` for stdout
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Render mode
    #[arg(long, value_enum, default_value_t = CliRenderMode::Full)]
    mode: CliRenderMode,

    /// Database schema to introspect (default: DB_SCHEMA or `public`)
    #[arg(long)]
    schema: Option<String>,

    /// Path to .env file for connection config
    #[arg(long, default_value = "./.env")]
    env_file: PathBuf,

    /// Comma-separated list of tables to include (default: all)
    #[arg(long, value_delimiter = ',')]
    tables: Option<Vec<String>>,

    /// Comma-separated list of tables to exclude
    #[arg(long, value_delimiter = ',')]
    exclude: Option<Vec<String>>,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    if let Err(e) = run() {
        error!(error = ?e, "Fatal error");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("sdlift v{}", env!("CARGO_PKG_VERSION"));
    info!(
        database = ?cli.database,
        output = ?cli.output,
        mode = ?cli.mode,
        "Starting SDL generation"
    );

    let config = DbConfig::load(&cli.env_file).context("Failed to load database configuration")?;
    debug!(connection = ?config.redacted_connection_string(), "Loaded configuration");

    let schema_name = cli.schema.clone().unwrap_or_else(|| config.schema.clone());

    let filter = TableFilter {
        include: cli.tables,
        exclude: cli.exclude,
    };

    if filter.is_active() {
        debug!(filter = ?filter, "Table filter configured");
    }

    let (schema, inferrer) = introspect_database(&cli.database, &config, &schema_name, &filter)?;

    if schema.tables.is_empty() {
        warn!("No tables found after filtering");
        return Ok(());
    }

    info!(tables = ?schema.tables.len(), "Schema ready for SDL generation");

    for table in &schema.tables {
        let primary_key: Vec<&str> = table
            .primary_key_columns()
            .into_iter()
            .map(|col| col.name.as_str())
            .collect();
        debug!(
            table = ?table.name,
            columns = ?table.columns.len(),
            primary_key = ?primary_key,
            foreign_keys = table.relations().count(),
            is_join_table = ?table.is_join_table(),
            "Table"
        );
    }

    let output = if cli.output.as_os_str() == "-" {
        OutputTarget::Stdout
    } else {
        OutputTarget::File(cli.output)
    };
    let codegen_config = CodeGenConfig::new(output).with_render_mode(cli.mode.into());
    debug!(codegen_config = ?codegen_config, "Generation config");

    SdlGenerator::new()
        .with_inferrer(inferrer)
        .generate(&schema, &codegen_config)
        .context("Failed to generate SDL")?;

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Logs go to stderr so SDL on stdout stays clean
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn introspect_database(
    database: &Database,
    config: &DbConfig,
    schema_name: &str,
    filter: &TableFilter,
) -> Result<(Schema, Inferrer)> {
    match database {
        Database::Postgres => introspect_postgres(config, schema_name, filter),
    }
}

#[cfg(feature = "postgres")]
fn introspect_postgres(
    config: &DbConfig,
    schema_name: &str,
    filter: &TableFilter,
) -> Result<(Schema, Inferrer)> {
    use sdlift::introspect::Introspector;
    use sdlift::PostgresIntrospector;

    let mut client = PostgresIntrospector::connect(config)?;
    info!("Connected to database");

    let mut introspector = PostgresIntrospector::new(&mut client);
    let schema = introspector
        .introspect(schema_name, filter)
        .context("Failed to introspect schema")?;

    let inferrer = Inferrer::new().with_capabilities(introspector.type_map().clone());

    Ok((schema, inferrer))
}

#[cfg(not(feature = "postgres"))]
fn introspect_postgres(
    _config: &DbConfig,
    _schema_name: &str,
    _filter: &TableFilter,
) -> Result<(Schema, Inferrer)> {
    bail!("PostgreSQL support not enabled. Rebuild with --features postgres")
}
