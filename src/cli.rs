use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the tab-separated product catalog file
    #[arg(short, long, default_value = "en.openfoodfacts.org.products.tsv")]
    pub catalog: String,

    /// User identifier the rating model scores candidates for
    #[arg(short, long, default_value = "1")]
    pub user_id: String,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
