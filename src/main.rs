use anyhow::{Context, Result};
use std::io;
use std::path::Path;

use nutri_assist::catalog::load_catalog;
use nutri_assist::cli::parse_args;
use nutri_assist::collector::collect_constraints;
use nutri_assist::meal_filter::filter_candidates;
use nutri_assist::model::{KnnConfig, KnnModel};
use nutri_assist::preferences::seed_preferences;
use nutri_assist::recommender::recommend;

const HOLDOUT_RATIO: f64 = 0.3;
const HOLDOUT_SEED: u64 = 42;

fn main() -> Result<()> {
    let cli_args = parse_args();

    println!("Loading product catalog from '{}'...", cli_args.catalog);
    let catalog = load_catalog(Path::new(&cli_args.catalog))
        .with_context(|| format!("Failed to load product catalog from '{}'", cli_args.catalog))?;
    println!(" > Catalog loaded: {} products.", catalog.len());

    let samples = seed_preferences();
    println!("Fitting rating model on {} preference samples...", samples.len());
    let mut model = KnnModel::new(KnnConfig::default());
    let report = model
        .fit_with_holdout(&samples, HOLDOUT_RATIO, HOLDOUT_SEED)
        .context("Failed to fit the rating model")?;
    match report.rmse {
        Some(rmse) => println!(
            " > Model accuracy (RMSE over {} held-out samples): {:.4}",
            report.holdout_size, rmse
        ),
        None => println!(" > No samples held out; skipping the accuracy report."),
    }

    println!();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let constraints = collect_constraints(&mut input, &mut output)
        .context("Failed to read user constraints")?;

    let candidates = filter_candidates(&catalog, &constraints);
    let meal_plan = recommend(&model, &cli_args.user_id, &candidates)
        .context("Failed to score candidate products")?;

    println!();
    if meal_plan.is_empty() {
        println!("No products match your constraints; nothing to recommend.");
    } else {
        println!("Your personalized meal plan:");
        for (idx, meal) in meal_plan.iter().enumerate() {
            println!("{}. {}", idx + 1, meal);
        }
    }

    Ok(())
}
