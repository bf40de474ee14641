//! Mapi mock server CLI
//!
//! Usage:
//!   mapi <db_file> [port] [hostname]

use clap::builder::FalseyValueParser;
use clap::Parser;
use mapi::{analyze_endpoints, ConsoleLogger, EndpointTable, FaviconSource, MockServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const UNDERLINE: &str = "\x1b[4m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Mock HTTP server serving canned JSON responses from an endpoint map
#[derive(Parser, Debug)]
#[command(name = "mapi")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file mapping endpoint keys to per-method responses
    #[arg(env = "MAPI_DB")]
    db_file: Option<PathBuf>,

    /// Port to listen on
    #[arg(env = "MAPI_PORT", default_value_t = 9000)]
    port: u16,

    /// Host name or address to bind
    #[arg(env = "MAPI_HOST", default_value = "localhost")]
    hostname: String,

    /// Icon served at /favicon.ico (defaults to the bundled icon)
    #[arg(long, env = "MAPI_FAVICON")]
    favicon: Option<PathBuf>,

    /// Disable colored request logs (NO_COLOR=0/false/no/off keeps colors)
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing();

    let Some(db_file) = args.db_file.as_deref() else {
        print_usage("Please provide a DB");
        std::process::exit(1);
    };

    let table = match EndpointTable::from_file(db_file) {
        Ok(table) => table,
        Err(e) => {
            print_usage(&e.to_string());
            std::process::exit(1);
        }
    };

    for warning in analyze_endpoints(&table) {
        warn!("{}", warning.message);
    }

    if let Err(e) = run(&args, table).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: &Args, table: EndpointTable) -> Result<(), anyhow::Error> {
    let addr = resolve_addr(&args.hostname, args.port).await?;

    let logger = Arc::new(ConsoleLogger::new(!args.no_color));
    let mut server = MockServer::new(table, logger);
    if let Some(path) = &args.favicon {
        server = server.with_favicon(FaviconSource::File(path.clone()));
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!(
        "{GREEN}Mock server started{RESET} {MAGENTA}{UNDERLINE}http://{}:{}/_mapi/{RESET}",
        args.hostname, args.port
    );

    server
        .serve(listener, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}

/// Resolve the host name and take the first address.
async fn resolve_addr(hostname: &str, port: u16) -> Result<SocketAddr, anyhow::Error> {
    tokio::net::lookup_host((hostname, port))
        .await?
        .next()
        .ok_or_else(|| anyhow::anyhow!("Could not resolve host {hostname}"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage(error_message: &str) {
    println!("{RED}{error_message}{RESET}");
    println!("{GREEN}{UNDERLINE}Usage:{RESET}");
    println!("  {YELLOW}mapi db.json{RESET}  {DIM}# Just point a file as database{RESET}");
    println!("  {YELLOW}mapi db.json 8080{RESET}  {DIM}# You can set a port as well{RESET}");
    println!(
        "  {YELLOW}mapi db.json 8080 127.0.0.1{RESET}  {DIM}# You can set a hostname as well{RESET}"
    );
    println!("{GREEN}Version: {}{RESET}", env!("CARGO_PKG_VERSION"));
    println!("{GREEN}More details on {}{RESET}", env!("CARGO_PKG_HOMEPAGE"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_flag() {
        let args = Args::try_parse_from(["mapi", "--no-color", "db.json"]).unwrap();
        assert!(args.no_color);
        assert_eq!(args.db_file.as_deref(), Some(std::path::Path::new("db.json")));
    }

    #[test]
    fn test_positional_defaults() {
        let args = Args::try_parse_from(["mapi", "db.json", "8080", "127.0.0.1"]).unwrap();
        assert_eq!(args.port, 8080);
        assert_eq!(args.hostname, "127.0.0.1");
    }
}
