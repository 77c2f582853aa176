//! Worldpop CLI
//!
//! Command-line interface for running the dashboard pipeline locally:
//! - Apply a selection and print the three views
//! - List the dataset's years and continents
//! - Export the filtered table
//! - Generate a default config file
//! - Start the API server

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use worldpop::api::{serve, AppState};
use worldpop::config::{generate_default_config, Config};
use worldpop::dataset::{write_records_csv, Metric};
use worldpop::logging::init_logging;
use worldpop::pipeline::{FilterSelection, InteractionController, Trigger, ViewPayload, ALL_YEARS};

#[derive(Parser)]
#[command(name = "worldpop")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "World Population Data dashboard pipeline")]
#[command(long_about = "Worldpop filters a table of country indicators by year and continent,\naverages them per country, and projects the result into a bar chart,\na choropleth map and a table.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Source CSV, overriding the configured dataset path
    #[arg(short, long, global = true)]
    pub dataset: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply a selection and print chart, map and table
    Apply {
        /// Metric: pop, lifeExp, gdpPercap (default: configured metric)
        #[arg(short, long)]
        metric: Option<String>,
        /// Year or "All"
        #[arg(short, long, default_value = ALL_YEARS)]
        year: String,
        /// Continent to include; repeat for several (default: all)
        #[arg(short = 'C', long = "continent")]
        continents: Vec<String>,
        /// Print the full payload as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the years and continents in the dataset
    Domains,

    /// Export the filtered table
    Export {
        /// Year or "All"
        #[arg(short, long, default_value = ALL_YEARS)]
        year: String,
        /// Continent to include; repeat for several (default: all)
        #[arg(short = 'C', long = "continent")]
        continents: Vec<String>,
        /// Output format (csv, json)
        #[arg(short, long, default_value = "csv")]
        format: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the API server
    Serve {
        /// Port, overriding the configured one
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = prepare(&cli)?;

    match cli.command {
        Commands::Apply {
            metric,
            year,
            continents,
            json,
        } => {
            let controller = open(&config)?;
            let metric = metric.unwrap_or_else(|| config.dashboard.default_metric.to_string());
            let continents = or_all(continents, &controller);

            let selection = FilterSelection::parse(&metric, &year, &continents)?;
            let payload = controller.handle(Trigger, &selection)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print_payload(&payload);
            }
        }

        Commands::Domains => {
            let controller = open(&config)?;
            let dataset = controller.dataset();

            println!("Records: {}", dataset.len());
            println!();
            println!(
                "Years: {}",
                dataset
                    .years()
                    .iter()
                    .map(|y| y.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!("Continents: {}", dataset.continents().join(", "));
            println!(
                "Metrics: {}",
                Metric::all()
                    .iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        Commands::Export {
            year,
            continents,
            format,
            output,
        } => {
            let controller = open(&config)?;
            let continents = or_all(continents, &controller);

            let selection = FilterSelection::parse(
                config.dashboard.default_metric.as_str(),
                &year,
                &continents,
            )?;
            let rows = controller.filtered(&selection)?;

            let mut data = Vec::new();
            match format.to_lowercase().as_str() {
                "csv" => write_records_csv(&rows, &mut data)?,
                "json" => serde_json::to_writer_pretty(&mut data, &rows)?,
                other => anyhow::bail!("Unsupported export format: {}. Use: csv, json", other),
            }

            match output {
                Some(path) => {
                    std::fs::write(&path, &data)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Exported {} rows to {:?}", rows.len(), path);
                }
                None => {
                    std::io::stdout().write_all(&data)?;
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }

        Commands::Serve { port } => {
            if let Some(port) = port {
                config.api.port = port;
            }

            let controller = Arc::new(open(&config)?);
            let state = AppState::new(controller, config.dashboard, config.api);
            serve(state).await?;
        }
    }

    Ok(())
}

/// Resolve the config and install logging before any subcommand runs
fn prepare(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(path) = &cli.dataset {
        config.dataset.path = path.clone();
    }

    init_logging(&config.logging);
    Ok(config)
}

fn open(config: &Config) -> anyhow::Result<InteractionController> {
    worldpop::load_controller(config)
        .with_context(|| format!("Failed to load dataset {:?}", config.dataset.path))
}

/// No continent flags means every continent, like the page's initial state
fn or_all(continents: Vec<String>, controller: &InteractionController) -> Vec<String> {
    if continents.is_empty() {
        controller.dataset().continents().to_vec()
    } else {
        continents
    }
}

fn print_payload(payload: &ViewPayload) {
    if payload.is_empty() {
        println!("No data for the selected year and continents");
        return;
    }

    println!("Average {} per continent", payload.metric);
    println!("{}", "-".repeat(40));
    for bar in &payload.chart.bars {
        println!(
            "{:<12} {:>18.3}  ({} countries)",
            bar.continent, bar.value, bar.contributors
        );
    }

    println!();
    println!("Map: {} countries shaded by {}", payload.map.points.len(), payload.metric);

    let table = &payload.table;
    println!();
    println!(
        "Table: {} rows, {} pages of {}",
        table.rows.len(),
        table.total_pages(),
        table.page_size
    );
    println!(
        "{:<24} {:<10} {:>6} {:>8} {:>14} {:>12} {:<4}",
        "country", "continent", "year", "lifeExp", "pop", "gdpPercap", "iso"
    );
    println!("{}", "-".repeat(84));
    for row in table.page(0).rows {
        println!(
            "{:<24} {:<10} {:>6} {:>8.3} {:>14} {:>12.2} {:<4}",
            row.country, row.continent, row.year, row.life_exp, row.pop, row.gdp_percap, row.iso_alpha
        );
    }
    if table.total_pages() > 1 {
        println!("... {} more rows", table.rows.len() - table.page(0).rows.len());
    }
}
