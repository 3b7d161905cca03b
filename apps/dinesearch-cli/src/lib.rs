use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dinesearch_core::catalog::Catalog;
use dinesearch_core::config::{Config, Settings};
use dinesearch_core::controller::{SearchController, SearchMode};
use dinesearch_core::pagination::compute_total_pages;
use dinesearch_core::params::SearchParams;
use dinesearch_text::TantivyClient;

pub mod ingest;
pub mod render;

#[derive(Debug, Parser)]
#[command(name = "dinesearch", version, rename_all = "kebab", about = "Faceted restaurant search over a local tantivy index")]
pub struct Args {
    /// Directory holding config.toml and config.<env>.toml; the index path resolves against it.
    #[arg(long, short = 'c', value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Index every *.json restaurant file under DIR.
    Ingest {
        dir: PathBuf,
        /// Drop the existing index first.
        #[arg(long)]
        fresh: bool,
    },
    /// Run a search page from a query string such as "q=paris+bistro&country=France".
    Search {
        query: String,
        #[arg(long, value_enum, default_value_t = Mode::Facets)]
        mode: Mode,
    },
    /// List indexed restaurants.
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Show { key: String },
    Delete { key: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    Basic,
    Paging,
    Highlighting,
    Facets,
}

impl From<Mode> for SearchMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Basic => SearchMode::Basic,
            Mode::Paging => SearchMode::Paging,
            Mode::Highlighting => SearchMode::Highlighting,
            Mode::Facets => SearchMode::Facets,
        }
    }
}

fn load_config(config_dir: Option<&Path>) -> anyhow::Result<Config> {
    match config_dir {
        Some(dir) => {
            let env_name = std::env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
            Config::load_from(dir, &env_name)
        }
        None => Config::load(),
    }
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log.level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config_dir.as_deref()).context("loading configuration")?;
    let settings = config.settings()?;
    init_tracing(&settings);

    let base = args.config_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let index_dir = settings.index_dir(&base);
    let language = settings.index.language;
    let memory = settings.index.writer_memory_bytes;

    let open = || TantivyClient::open_or_create(&index_dir, language, memory);
    match args.command {
        Command::Ingest { dir, fresh } => {
            let client = if fresh { TantivyClient::create(&index_dir, language, memory)? } else { open()? };
            let (restaurants, skipped) = ingest::load_restaurants(&dir)?;
            if skipped > 0 { warn!(skipped, "skipped invalid restaurant records"); }
            let count = client.index_all(&restaurants)?;
            info!(count, dir = %index_dir.display(), "ingest complete");
            println!("Indexed {} restaurants into {} ({} skipped)", count, index_dir.display(), skipped);
            Ok(())
        }
        Command::Search { query, mode } => {
            let client = open()?;
            let params = SearchParams::from_query_string(&query)?;
            let controller = SearchController::new(&client, client.language(), settings.search.clone());
            let page = controller.handle(mode.into(), &params)?;
            if args.json { println!("{}", serde_json::to_string_pretty(&page)?); } else { render::print_page(&page); }
            Ok(())
        }
        Command::List { page } => {
            let client = open()?;
            let catalog = Catalog::new(&client, client.language());
            let results = catalog.list(page, settings.search.page_size)?;
            let total_pages = compute_total_pages(results.total_matching, settings.search.page_size)?;
            if args.json { println!("{}", serde_json::to_string_pretty(&results)?); } else { render::print_listing(&results, page, total_pages); }
            Ok(())
        }
        Command::Show { key } => {
            let client = open()?;
            let restaurant = Catalog::new(&client, client.language()).get(&key)?;
            if args.json { println!("{}", serde_json::to_string_pretty(&restaurant)?); } else { render::print_restaurant(&restaurant); }
            Ok(())
        }
        Command::Delete { key } => {
            let client = open()?;
            Catalog::new(&client, client.language()).delete(&key)?;
            println!("Deleted {}", key);
            Ok(())
        }
    }
}
