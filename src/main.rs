use clap::Parser;
use review_harvest::config::HarvestConfig;
use review_harvest::parsers::{CleanOptions, clean_review};
use review_harvest::store::{CollectionKey, JsonFileStore, persist_reviews, write_csv};
use review_harvest::utils::sanitize_filename;
use review_harvest::{Harvest, HarvestResult, Review};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Starting review collection for query: {}", args.query);
    println!("Note: collection requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );

    let start_time = std::time::Instant::now();
    match run(&args).await {
        Ok(count) => {
            ::log::info!(
                "Collection complete - {} reviews in {:.2} seconds",
                count,
                start_time.elapsed().as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Collection failed: {}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> HarvestResult<usize> {
    let config = build_config(args)?;
    let mut harvest = Harvest::new(&args.query).with_config(config);
    if let Some(url) = &args.webdriver_url {
        harvest = harvest.with_webdriver_url(url);
    }
    let mut report = harvest.run().await?;

    println!(
        "Collected {} reviews from {} of {} products{}",
        report.reviews.len(),
        report.paginated.len(),
        report.products_found,
        if report.is_complete() { "" } else { " (stopped early)" }
    );
    let fatal = report.fatal.take();
    for skipped in &report.skipped {
        println!("  skipped {} ({:?})", skipped.product_ref, skipped.reason);
    }

    let reviews: Vec<Review> = if args.clean_text {
        let options = CleanOptions::default();
        report
            .reviews
            .iter()
            .map(|review| clean_review(review, &options))
            .collect()
    } else {
        report.reviews
    };

    if let Some(path) = &args.csv {
        write_csv(path, &reviews)?;
        println!("Wrote {}", path.display());
    }

    if let Some(root) = &args.store_dir {
        let collection = args
            .collection
            .clone()
            .unwrap_or_else(|| sanitize_filename(&args.query));
        let key = CollectionKey::new(args.database.clone(), collection);
        let mut store = JsonFileStore::new(root);
        let inserted = persist_reviews(&mut store, &key, &reviews)?;
        println!("Stored {} reviews in {}", inserted, key);
    }

    // Reviews gathered before a fatal error are written out before it is reported
    match fatal {
        Some(e) => Err(e),
        None => Ok(reviews.len()),
    }
}

/// Load the configuration file, if any, and apply command-line overrides
fn build_config(args: &Args) -> HarvestResult<HarvestConfig> {
    let mut config = match &args.config {
        Some(path) => HarvestConfig::from_file(path)?,
        None => HarvestConfig::default(),
    };

    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    if let Some(delay) = args.delay_ms {
        config.page_delay_ms = delay;
    }
    if args.max_pages.is_some() {
        config.max_review_pages = args.max_pages;
    }

    config.validate()?;
    Ok(config)
}
