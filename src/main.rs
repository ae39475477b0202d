use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use food_cost::config::{AppConfig, LogFormat};
use food_cost::costing::CostingEngine;
use food_cost::localization::{detect_language, LocalizationManager};
use food_cost::recipe::Recipe;
use food_cost::report;

#[derive(Parser)]
#[command(name = "food-cost")]
#[command(about = "Recipe costing: unit conversion, ingredient and portion costs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cost sheet of a recipe file
    Cost {
        /// Recipe JSON file
        path: PathBuf,

        /// Print the cost sheet as JSON
        #[arg(long)]
        json: bool,

        /// Report language (overrides FOOD_COST_LANGUAGE)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Convert a quantity between two units of the same measurement type
    Convert {
        /// Quantity to convert
        #[arg(allow_hyphen_values = true)]
        quantity: f64,

        /// Unit the quantity is in (e.g., "pounds")
        from: String,

        /// Unit to convert to (e.g., "ounces")
        to: String,
    },

    /// List the configured units
    Units,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let units = config.load_unit_table()?;
    let engine = CostingEngine::new(units);
    let localization = LocalizationManager::new().context("Failed to load messages")?;

    match cli.command {
        Commands::Cost {
            path,
            json,
            language,
        } => {
            let recipe = Recipe::load(&path)?;
            let sheet = recipe.cost(&engine);

            if json {
                println!("{}", serde_json::to_string_pretty(&sheet)?);
            } else {
                let language = detect_language(Some(language.as_deref().unwrap_or(&config.language)));
                print!(
                    "{}",
                    report::format_cost_sheet(&sheet, &localization, language, &config.currency_symbol)
                );
            }
        }
        Commands::Convert { quantity, from, to } => {
            let converted = engine.convert(quantity, &from, &to)?;
            println!(
                "{}",
                report::format_conversion(&localization, &config.language, quantity, &from, converted, &to)
            );
        }
        Commands::Units => {
            print!(
                "{}",
                report::format_unit_table(engine.units(), &localization, &config.language)
            );
        }
    }

    Ok(())
}

fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);
    info!(language = %config.language, "Starting food-cost");

    if let Err(e) = run(cli, config) {
        error!(error = %e, "Command failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
