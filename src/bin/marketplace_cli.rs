//! marketplace-cli — browse and search the Waviate Flow marketplace from a terminal.
//!
//! Usage:
//!   marketplace-cli [--endpoint <url>] browse [--tab <tab>]
//!   marketplace-cli [--endpoint <url>] search <query> [--mode name|user|tag]
//!   marketplace-cli [--endpoint <url>] creator <creator-id>
//!   marketplace-cli [--endpoint <url>] login <email> <password>

use anyhow::{bail, Context};
use marketplace_client::{Entry, Listing, MarketplaceClient, MarketplaceClientBuilder, SearchMode, Tab};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

const MAX_TAGS: usize = 5;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(args).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(mut args: Vec<String>) -> anyhow::Result<()> {
    let endpoint = take_flag(&mut args, "--endpoint")?;

    let Some(command) = args.first().cloned() else {
        print_usage();
        bail!("no command given");
    };
    let rest = &args[1..];

    match command.as_str() {
        "browse" => cmd_browse(&connect(endpoint)?, rest).await,
        "search" => cmd_search(&connect(endpoint)?, rest).await,
        "creator" => cmd_creator(&connect(endpoint)?, rest).await,
        "login" => cmd_login(&connect(endpoint)?, rest).await,
        "version" | "--version" | "-V" => {
            println!("marketplace-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!(
        r#"marketplace-cli — Waviate Flow marketplace browser

USAGE:
    marketplace-cli [--endpoint <url>] <COMMAND> [OPTIONS]

COMMANDS:
    browse [--tab <tab>]                 List a tab: popular|best|hot|random|new (default popular)
    search <query> [--mode <mode>]       Search by name|user|tag (default name)
    creator <creator-id>                 List entries published by a creator
    login <email> <password>             Log in and print the API reply
    version                              Show version information
    help                                 Show this help message

ENVIRONMENT:
    MARKETPLACE_API_URL                  API endpoint when --endpoint is not given
    MARKETPLACE_CACHE_TTL_MS             Response cache window (default 60000)
    MARKETPLACE_HTTP_TIMEOUT_SECS        Request timeout (default 30)
    RUST_LOG                             Log filter (e.g. marketplace_client=debug)"#
    );
}

fn connect(endpoint: Option<String>) -> anyhow::Result<MarketplaceClient> {
    let mut builder = MarketplaceClientBuilder::new();
    if let Some(endpoint) = endpoint {
        builder = builder.endpoint(endpoint);
    }
    Ok(builder.build()?)
}

/// Remove `--name <value>` from `args`, returning the value.
fn take_flag(args: &mut Vec<String>, name: &str) -> anyhow::Result<Option<String>> {
    let Some(i) = args.iter().position(|a| a == name) else {
        return Ok(None);
    };
    if i + 1 >= args.len() {
        bail!("{name} needs a value");
    }
    let value = args.remove(i + 1);
    args.remove(i);
    Ok(Some(value))
}

async fn cmd_browse(client: &MarketplaceClient, rest: &[String]) -> anyhow::Result<()> {
    let mut rest = rest.to_vec();
    let tab = take_flag(&mut rest, "--tab")?
        .map(|t| Tab::parse_or_default(&t))
        .unwrap_or_default();
    let listing = client
        .browse(tab)
        .await
        .with_context(|| format!("loading {tab} entries"))?;

    println!("{}", tab.title());
    println!("Browse marketplace nodes & plugins.");
    println!();
    print_listing(&mut io::stdout().lock(), &listing)?;
    Ok(())
}

async fn cmd_search(client: &MarketplaceClient, rest: &[String]) -> anyhow::Result<()> {
    let mut rest = rest.to_vec();
    let mode: SearchMode = match take_flag(&mut rest, "--mode")? {
        Some(m) => m.parse()?,
        None => SearchMode::default(),
    };
    let Some(query) = rest.first() else {
        bail!("search needs a query");
    };
    let listing = client
        .search(query, mode)
        .await
        .with_context(|| format!("searching by {mode} for '{query}'"))?;
    print_listing(&mut io::stdout().lock(), &listing)?;
    Ok(())
}

async fn cmd_creator(client: &MarketplaceClient, rest: &[String]) -> anyhow::Result<()> {
    let Some(creator_id) = rest.first() else {
        bail!("creator needs a creator id");
    };
    let listing = client.list_by_creator(creator_id).await?;
    print_listing(&mut io::stdout().lock(), &listing)?;
    Ok(())
}

async fn cmd_login(client: &MarketplaceClient, rest: &[String]) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (rest.first(), rest.get(1)) else {
        bail!("login needs <email> <password>");
    };
    let reply = client.login(email, password).await?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

fn print_listing(out: &mut impl Write, listing: &Listing) -> io::Result<()> {
    if listing.is_empty() {
        return writeln!(out, "No entries found.");
    }
    for entry in &listing.items {
        print_entry(out, entry)?;
        writeln!(out)?;
    }
    Ok(())
}

fn print_entry(out: &mut impl Write, entry: &Entry) -> io::Result<()> {
    writeln!(out, "{}", entry.name)?;
    if let Some(author) = &entry.author {
        writeln!(out, "  by {author}")?;
    }
    if let Some(description) = &entry.description {
        writeln!(out, "  {description}")?;
    }
    match entry.tags.as_deref() {
        Some(tags) if !tags.is_empty() => {
            let shown: Vec<String> = tags.iter().take(MAX_TAGS).map(|t| format!("#{t}")).collect();
            writeln!(out, "  {}", shown.join(" "))
        }
        _ => writeln!(out, "  No tags"),
    }
}
