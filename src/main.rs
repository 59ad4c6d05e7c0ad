mod driver;
mod scenario;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use foundry_blocks::Content;
use foundry_machines::RecipeBook;
use foundry_tools::SteamDrill;

use crate::driver::{Driver, run_drill};
use crate::scenario::{DrillSection, Scenario};

#[derive(Parser, Debug)]
#[command(name = "foundry", version, about = "Multiblock machine simulator")]
struct Cli {
    /// Directory holding blocks.toml and recipes.toml
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Overrides RUST_LOG, e.g. `debug` or `structure=debug,craft=trace`
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the scenario and report whether the furnace forms
    Check { scenario: PathBuf },
    /// Run the scenario for a number of ticks
    Run {
        scenario: PathBuf,
        #[arg(long, default_value_t = 200)]
        ticks: u64,
    },
    /// Swing a steam drill with fuel in the next hotbar slot
    Drill {
        #[arg(long, default_value = "coal")]
        fuel: String,
        #[arg(long, default_value_t = 1)]
        count: u32,
        #[arg(long, default_value_t = 2_000)]
        ticks: u64,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filters) = &cli.log_level {
        logger.parse_filters(filters);
    }
    logger.init();

    let content = load_content(&cli.assets)?;
    match cli.command {
        Command::Check { scenario } => check(&cli.assets, &content, &scenario),
        Command::Run { scenario, ticks } => run(&cli.assets, &content, &scenario, ticks),
        Command::Drill { fuel, count, ticks } => {
            let section = DrillSection {
                fuel,
                fuel_count: count,
                ..DrillSection::default()
            };
            drill(&content, &section, ticks)
        }
    }
}

fn load_content(assets: &Path) -> Result<Content, Box<dyn Error>> {
    let content = Content::load_from_path(assets.join("blocks.toml"))?;
    log::info!(
        "loaded {} block(s), {} fuel(s) from {}",
        content.blocks.blocks.len(),
        content.fuels.len(),
        assets.display()
    );
    Ok(content)
}

fn load_recipes(assets: &Path) -> Result<RecipeBook, Box<dyn Error>> {
    let book = RecipeBook::load_from_path(assets.join("recipes.toml"))?;
    log::info!("loaded {} recipe(s)", book.len());
    Ok(book)
}

fn check(assets: &Path, content: &Content, path: &Path) -> Result<(), Box<dyn Error>> {
    let recipes = load_recipes(assets)?;
    let mut scenario = Scenario::load(path)?;
    // One tick resolves the shape; nothing is crafted
    if let Some(section) = scenario.furnace.as_mut() {
        section.recipes.clear();
    }
    let mut driver = Driver::from_scenario(content, &recipes, &scenario)?;
    let stats = driver.world().stats();
    println!(
        "{} block(s) in {} chunk(s), {} energy hatch(es)",
        stats.blocks, stats.chunks, stats.energy_buffers
    );
    driver.tick()?;
    match driver.furnace() {
        Some(f) => println!("{}", f.state()),
        None => println!("no furnace in {}", path.display()),
    }
    Ok(())
}

fn run(assets: &Path, content: &Content, path: &Path, ticks: u64) -> Result<(), Box<dyn Error>> {
    let recipes = load_recipes(assets)?;
    let scenario = Scenario::load(path)?;
    let mut driver = Driver::from_scenario(content, &recipes, &scenario)?;
    for _ in 0..ticks {
        driver.tick()?;
    }
    let report = driver.report();
    println!("ran {} tick(s)", report.ticks);
    println!("finished: {:?}", report.finished);
    if !report.rejected.is_empty() {
        println!("rejected: {:?}", report.rejected);
    }
    println!(
        "stalled {} tick(s), unformed {} tick(s)",
        report.stalled_ticks, report.unformed_ticks
    );
    if let Some(f) = driver.furnace() {
        println!("{}", f.state());
        for (pos, stored) in driver.stored_energy() {
            println!("  energy hatch {pos}: {stored} stored");
        }
    }
    if let Some(section) = &scenario.drill {
        drill(content, section, ticks)?;
    }
    Ok(())
}

fn drill(content: &Content, section: &DrillSection, ticks: u64) -> Result<(), Box<dyn Error>> {
    if content.fuels.burn_ticks_for(&section.fuel).is_none() {
        log::warn!(target: "drill", "`{}` is not a fuel", section.fuel);
    }
    let drill = SteamDrill::new(Arc::new(content.fuels.clone()));
    let report = run_drill(&drill, section, ticks);
    println!(
        "drill: mined {} block(s), {} dry swing(s), water {}, burn {} tick(s), {} {} left",
        report.mined,
        report.dry_swings,
        report.water,
        report.burn_ticks,
        report.fuel_left,
        section.fuel
    );
    Ok(())
}
