use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use csw_catalog::config::CatalogConfig;
use csw_catalog::{logging, CatalogClient, CatalogResponse, RecordFilter, SearchRequest};

#[derive(Parser)]
#[command(name = "csw_catalog")]
#[command(about = "Query OGC CSW 2.0.2 metadata catalogs")]
#[command(version = "0.1.0")]
struct Cli {
    /// Catalog endpoint; falls back to catalog.toml or CSW_CATALOG_URL
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Page through dataset records without a text constraint
    Records {
        #[arg(long, default_value_t = 1)]
        start: u32,
        /// Page size (defaults to the configured page_size)
        #[arg(long)]
        max: Option<u32>,
    },
    /// Full-text search over csw:AnyText
    Search {
        text: String,
        #[arg(long, default_value_t = 1)]
        start: u32,
        #[arg(long)]
        max: Option<u32>,
    },
    /// Search `workspace:layer` identifiers
    Workspace {
        /// Layer name fragment
        #[arg(long)]
        text: Option<String>,
        /// Workspace name (any workspace when omitted)
        #[arg(long)]
        workspace: Option<String>,
        #[arg(long, default_value_t = 1)]
        start: u32,
        #[arg(long)]
        max: Option<u32>,
    },
    /// Fetch one record from a GetRecordById URL
    Record {
        /// Record URL, e.g. https://host/csw?request=GetRecordById&id=...
        record_url: String,
    },
}

fn print_response<T: serde::Serialize>(response: &CatalogResponse<T>) -> anyhow::Result<()> {
    if let CatalogResponse::Exception(err) = response {
        error!("Catalog exception: {}", err.message);
    }
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    logging::init_logging();

    let config = CatalogConfig::load().context("loading catalog configuration")?;
    let client = CatalogClient::from_config(&config)?;

    let catalog_url = || {
        cli.url
            .clone()
            .or_else(|| config.catalog_url.clone())
            .ok_or_else(|| anyhow!("no catalog URL: pass --url or set catalog_url / CSW_CATALOG_URL"))
    };

    match &cli.command {
        Commands::Records { start, max } => {
            let url = catalog_url()?;
            let request = SearchRequest::new(*start, max.unwrap_or(config.page_size))?;
            info!("Listing records from {}", url);
            print_response(&client.search(&url, &request).await?)?;
        }
        Commands::Search { text, start, max } => {
            let url = catalog_url()?;
            let request = SearchRequest::new(*start, max.unwrap_or(config.page_size))?
                .with_filter(RecordFilter::Text(text.clone()));
            info!("Searching {} for '{}'", url, text);
            print_response(&client.search(&url, &request).await?)?;
        }
        Commands::Workspace {
            text,
            workspace,
            start,
            max,
        } => {
            let url = catalog_url()?;
            let request = SearchRequest::new(*start, max.unwrap_or(config.page_size))?;
            let response = client
                .workspace_search(
                    &url,
                    request.start_position,
                    request.max_records,
                    text.as_deref(),
                    workspace.as_deref(),
                )
                .await?;
            print_response(&response)?;
        }
        Commands::Record { record_url } => {
            print_response(&client.get_record_by_id(record_url).await?)?;
        }
    }

    Ok(())
}
