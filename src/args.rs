use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "review-harvest")]
#[command(about = "Collects marketplace product reviews through a WebDriver browser")]
#[command(version)]
pub struct Args {
    /// Search query whose result products are collected
    pub query: String,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides the configuration file)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Marketplace base URL (overrides the configuration file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Delay between page loads in milliseconds
    #[arg(short, long)]
    pub delay_ms: Option<u64>,

    /// Maximum number of review pages per product
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Write collected reviews to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Store collected reviews in a document store rooted at this directory
    #[arg(long)]
    pub store_dir: Option<PathBuf>,

    /// Database name inside the document store
    #[arg(long, default_value = "reviews")]
    pub database: String,

    /// Collection name inside the database (defaults to the sanitized query)
    #[arg(long)]
    pub collection: Option<String>,

    /// Clean review titles and bodies before writing them out
    #[arg(long)]
    pub clean_text: bool,
}
