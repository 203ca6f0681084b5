//! Anno 1800 Production Calculator
//!
//! A production chain calculator for Anno 1800.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

use anno_calculator::{
    CalculationRequest, Catalog, DemandMap, DemandProfiles, DemandSelection, ElectricitySelection,
    Populations, Product, calculator, db, demand, parse, request,
};

#[derive(Parser)]
#[command(name = "anno-calculator")]
#[command(about = "Production chain calculator for Anno 1800")]
struct Cli {
    /// Load catalog and demand profiles from an SQLite snapshot instead of the built-in tables
    #[arg(short, long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate facilities and workers for a population
    Calc {
        /// Resident counts (e.g., "Farmer=1200", "Worker=800")
        residents: Vec<String>,

        /// Needs to count (e.g., "Farmer:basic=Fish,Work_clothes"); repeatable
        #[arg(short, long)]
        select: Vec<String>,

        /// Count every need of every resident type
        #[arg(long)]
        all_needs: bool,

        /// Additional demand per minute (e.g., "Steam_carriages=4"); repeatable
        #[arg(long)]
        demand: Vec<String>,

        /// Facility to run on electricity (e.g., "Coal Mine"); repeatable
        #[arg(short, long)]
        electricity: Vec<String>,

        /// Show detailed production tree
        #[arg(short, long)]
        verbose: bool,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Calculate from a JSON request file ("-" reads stdin)
    Request {
        path: PathBuf,
    },

    /// List all production recipes
    ListRecipes,

    /// List all products
    ListProducts,

    /// Show details for a specific recipe
    Recipe {
        /// Recipe name or key
        name: String,
    },

    /// Print demand profiles as JSON
    DemandProfiles,

    /// Write the built-in catalog and demand profiles to an SQLite snapshot
    Export {
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (catalog, profiles) = match &cli.database {
        Some(path) => {
            let conn = Connection::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            db::init_schema(&conn)?;
            let catalog = db::load_catalog(&conn)?;
            if catalog.is_empty() {
                return Err(anyhow!(
                    "No recipes in {}. Run 'export' first.",
                    path.display()
                ));
            }
            (catalog, db::load_profiles(&conn)?)
        }
        None => (Catalog::standard().clone(), demand::standard().clone()),
    };

    match cli.command {
        Commands::Calc {
            residents,
            select,
            all_needs,
            demand: manual,
            electricity,
            verbose,
            json,
        } => {
            let residents: Populations = parse::parse_assignments(&residents)?;
            let manual_demand: DemandMap = parse::parse_assignments(&manual)?;
            let demands = if all_needs {
                DemandSelection::all(&profiles)
            } else {
                parse::parse_selections(&select)?
            };
            let uses_electricity: ElectricitySelection = electricity.into_iter().collect();

            if json {
                let calc_request = CalculationRequest {
                    residents,
                    demands,
                    uses_electricity,
                    manual_demand,
                };
                let response = request::calculate(&catalog, &profiles, &calc_request)?;
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }

            let derived = demand::aggregate_demand(&profiles, &residents, &demands)?;
            let total = demand::merge_demand(derived, &manual_demand)?;
            let chain = calculator::calculate_production_chain(&catalog, &total, &uses_electricity)?;

            if verbose {
                println!("Production chain:\n");
                println!("{}", calculator::format_production_chain(&chain));
            }

            let summary = calculator::summarize_chain(&total, &chain);
            println!("{}", summary);
        }

        Commands::Request { path } => {
            let body = if path.as_os_str() == "-" {
                std::io::read_to_string(std::io::stdin())?
            } else {
                fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?
            };
            let calc_request: CalculationRequest =
                serde_json::from_str(&body).context("Malformed calculation request")?;
            let response = request::calculate(&catalog, &profiles, &calc_request)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::ListRecipes => {
            println!(
                "{:<26} {:<16} {:>8} {:<11} {:>7} {}",
                "Recipe", "Product", "Per min", "Workers", "Count", "Electricity"
            );
            println!("{}", "-".repeat(84));
            for r in request::productions_snapshot(&catalog) {
                let power = match (r.improved_by_electricity, r.requires_electricity) {
                    (_, true) => "required",
                    (true, false) => "boost",
                    (false, false) => "",
                };
                println!(
                    "{:<26} {:<16} {:>8.3} {:<11} {:>7.0} {}",
                    r.name,
                    r.product.as_str(),
                    r.amount_per_minute,
                    r.worker_type.as_str(),
                    r.worker_amount,
                    power
                );
            }
        }

        Commands::ListProducts => {
            println!("Products:");
            for product in Product::ALL {
                let producers: Vec<_> = catalog.producers(*product).map(|r| r.name.as_str()).collect();
                println!("  {:<16} {}", product.as_str(), producers.join(", "));
            }
        }

        Commands::Recipe { name } => {
            if let Some(r) = catalog.find(&name) {
                println!("Recipe: {}", r.name);
                println!("  Key: {}", r.key);
                println!("  Output: {} @ {} /min", r.product, r.amount_per_minute);
                println!("  Workers: {} {}", r.worker_amount, r.worker_type);
                println!("  Improved by electricity: {}", r.improved_by_electricity);
                println!("  Requires electricity: {}", r.requires_electricity);

                let prerequisites = catalog.prerequisites(r)?;
                if !prerequisites.is_empty() {
                    println!("  Requires:");
                    for p in prerequisites {
                        println!("    {} ({})", p.name, p.product);
                    }
                }
            } else {
                println!("Recipe '{}' not found", name);
            }
        }

        Commands::DemandProfiles => {
            let snapshot: DemandProfiles = request::demand_snapshot(&profiles);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        Commands::Export { path } => {
            let mut conn = Connection::open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            db::init_schema(&conn)?;
            db::store_snapshot(&mut conn, &catalog, &profiles)?;
            println!("Snapshot written to: {}", path.display());
        }
    }

    Ok(())
}
