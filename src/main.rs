use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use findtime_calendar::{link, merge_overlapping, FindTimeClient, QueryCoordinator, RangeInfo};
use findtime_core::Config;

#[derive(Parser)]
#[command(name = "findtime")]
#[command(about = "Query busy/free availability for a set of scheduling links")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the configured availability server base URL
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch busy blocks for the links in a page URL's `q` parameter
    Events {
        /// Page URL carrying the comma-joined link list in `q`
        #[arg(long)]
        page_url: String,

        /// Range start (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Range end (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Fold overlapping busy blocks before printing
        #[arg(long)]
        merge: bool,
    },
    /// Print the page URL with a scheduling link appended to `q`
    Append {
        #[arg(long)]
        page_url: String,

        #[arg(long)]
        link: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    findtime_core::init(&config.log_level)?;

    if let Some(base_url) = cli.base_url {
        config.service.base_url = base_url;
    }

    let (config, _) = config.validated()?;

    match cli.command {
        Commands::Events {
            page_url,
            start,
            end,
            merge,
        } => {
            let page = link::parse_page_url(&page_url)?;
            let key = link::query_key(&page).unwrap_or_default();
            tracing::info!("Querying {} link(s)", link::split_links(&key).len());

            let client = FindTimeClient::new(&config.service.base_url)
                .with_endpoint_path(&config.service.endpoint_path);
            let coordinator = QueryCoordinator::new(client);

            let mut events = coordinator
                .request(&key, &RangeInfo::new(start, end))
                .await
                .map_err(|e| {
                    let message = e.user_message();
                    anyhow::Error::new(e).context(message)
                })?;

            if merge {
                merge_overlapping(&mut events);
            }

            let json = serde_json::to_string_pretty(&events).context("Failed to encode events")?;
            println!("{}", json);
        }
        Commands::Append {
            page_url,
            link: new_link,
        } => {
            let page = link::parse_page_url(&page_url)?;
            println!("{}", link::append_link(&page, &new_link));
        }
    }

    Ok(())
}
