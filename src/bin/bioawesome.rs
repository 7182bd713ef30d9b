use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use bioawesome_catalog::app::App;
use bioawesome_catalog::config::ConfigLoader;
use bioawesome_catalog::error::CatalogError;
use bioawesome_catalog::output::{JsonOutput, OutputMode, TextOutput};
use bioawesome_catalog::search::SearchCriteria;

#[derive(Parser)]
#[command(name = "bioawesome")]
#[command(about = "Search, aggregate and validate the BioAwesome database catalog")]
#[command(version, author)]
struct Cli {
    /// Databases root (one directory per category)
    #[arg(long, global = true)]
    root: Option<String>,

    /// Config file (defaults to ./bioawesome.json when present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Search and filter database records")]
    Search(SearchArgs),
    #[command(about = "Rebuild catalog.json from the record files")]
    Update,
    #[command(about = "Check record files for errors and warnings")]
    Validate,
}

#[derive(Args)]
#[command(after_help = "Examples:
  bioawesome search --keyword protein
  bioawesome search --category genomics
  bioawesome search --data-type variants
  bioawesome search --keyword expression --organism human
  bioawesome search --access API --detailed")]
struct SearchArgs {
    /// Search keyword (searches name, description, data types)
    #[arg(long, short = 'k')]
    keyword: Option<String>,

    /// Filter by category (e.g., genomics, proteomics)
    #[arg(long, short = 'c')]
    category: Option<String>,

    /// Filter by data type
    #[arg(long, short = 'd')]
    data_type: Option<String>,

    /// Filter by organism
    #[arg(long, short = 'o')]
    organism: Option<String>,

    /// Filter by access method (web, API, download)
    #[arg(long, short = 'a')]
    access: Option<String>,

    /// Show detailed information for each database
    #[arg(long, short = 'v')]
    detailed: bool,

    /// List all available categories
    #[arg(long)]
    list_categories: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(report) => {
            eprintln!("{report:?}");
            if let Some(error) = report.downcast_ref::<CatalogError>() {
                return ExitCode::from(map_exit_code(error));
            }
            ExitCode::from(1)
        }
    }
}

fn map_exit_code(error: &CatalogError) -> u8 {
    match error {
        CatalogError::MissingConfig(_)
        | CatalogError::ConfigRead(_)
        | CatalogError::ConfigParse(_) => 2,
        _ => 1,
    }
}

fn run() -> miette::Result<u8> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    let resolved = ConfigLoader::resolve(cli.config.as_deref(), cli.root.as_deref())?;
    let app = App::new(resolved.store(), resolved.catalog_version.clone());

    match cli.command {
        Commands::Search(args) => run_search(args, &app, output_mode),
        Commands::Update => run_update(&app, output_mode),
        Commands::Validate => run_validate(&app, output_mode),
    }
}

/// Search never fails the process: a missing root or catalog is reported
/// and the command exits 0.
fn run_search(args: SearchArgs, app: &App, output_mode: OutputMode) -> miette::Result<u8> {
    if args.list_categories {
        return match app.list_categories() {
            Ok(result) => {
                match output_mode {
                    OutputMode::Json => JsonOutput::print_categories(&result),
                    OutputMode::Text => TextOutput::print_categories(&result),
                }
                .into_diagnostic()?;
                Ok(0)
            }
            Err(err @ (CatalogError::MissingCatalog(_) | CatalogError::CatalogParse(_))) => {
                println!("Error: {err}");
                Ok(0)
            }
            Err(err) => Err(err.into()),
        };
    }

    let criteria = SearchCriteria {
        keyword: args.keyword,
        category: args.category,
        data_type: args.data_type,
        organism: args.organism,
        access_method: args.access,
    };

    let result = match output_mode {
        OutputMode::Json => app.search(criteria, &JsonOutput),
        OutputMode::Text => app.search(criteria, &TextOutput),
    };
    let result = match result {
        Ok(result) => result,
        Err(err @ CatalogError::MissingRoot(_)) => {
            println!("Error: {err}");
            return Ok(0);
        }
        Err(err) => return Err(err.into()),
    };

    match output_mode {
        OutputMode::Json => JsonOutput::print_search(&result),
        OutputMode::Text => TextOutput::print_search(&result, args.detailed),
    }
    .into_diagnostic()?;
    Ok(0)
}

fn run_update(app: &App, output_mode: OutputMode) -> miette::Result<u8> {
    if !app.store().root_exists() {
        println!(
            "Error: Databases directory not found at {}",
            app.store().root()
        );
        return Ok(1);
    }

    match output_mode {
        OutputMode::Json => {
            let result = app.update_catalog(&JsonOutput)?;
            JsonOutput::print_update(&result).into_diagnostic()?;
        }
        OutputMode::Text => {
            let result = app.update_catalog(&TextOutput)?;
            TextOutput::print_update(&result).into_diagnostic()?;
        }
    }
    Ok(0)
}

fn run_validate(app: &App, output_mode: OutputMode) -> miette::Result<u8> {
    if !app.store().root_exists() {
        println!(
            "Error: Databases directory not found at {}",
            app.store().root()
        );
        return Ok(1);
    }

    let summary = match output_mode {
        OutputMode::Json => {
            let summary = app.validate(&JsonOutput)?;
            JsonOutput::print_validation(&summary).into_diagnostic()?;
            summary
        }
        OutputMode::Text => {
            let summary = app.validate(&TextOutput)?;
            println!();
            TextOutput::print_validation(&summary).into_diagnostic()?;
            summary
        }
    };
    Ok(summary.exit_code())
}
