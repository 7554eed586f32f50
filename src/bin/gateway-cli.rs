use axum::http::Uri;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;

use bms_gateway::config::{self, loader};
use bms_gateway::routing::RouteTable;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Inspect the gateway route table and its backends", long_about = None)]
struct Cli {
    /// TOML config file; environment variables still override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the route table in priority order
    Routes,
    /// Show where a request path would be sent
    Resolve {
        /// Request path, optionally with a query string (e.g. /api/schedule/42?day=1)
        path: String,
    },
    /// Send a GET to every backend base URL and report reachability
    Probe {
        #[arg(long, default_value_t = 3)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy().into_owned();
            loader::from_lookup(|var| {
                if var == loader::ENV_CONFIG_FILE {
                    Some(path.clone())
                } else {
                    std::env::var(var).ok()
                }
            })?
        }
        None => config::from_env()?,
    };
    let table = RouteTable::from_config(&config)?;

    match cli.command {
        Commands::Routes => print_json(&serde_json::to_value(table.summaries())?)?,
        Commands::Resolve { path } => print_json(&resolve(&table, &path)?)?,
        Commands::Probe { timeout_secs } => {
            let failures = probe(&table, Duration::from_secs(timeout_secs)).await?;
            if failures > 0 {
                return Err(format!("{failures} backend(s) unreachable").into());
            }
        }
    }

    Ok(())
}

fn resolve(table: &RouteTable, raw: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let uri: Uri = raw.parse()?;
    let path = uri.path();

    Ok(match table.match_path(path) {
        Some(route) => json!({
            "path": path,
            "route": route.rule.name(),
            "upstream": route.upstream_uri(uri.query())?.to_string(),
            "extra_headers": route
                .rule
                .extra_headers()
                .keys()
                .map(|name| name.as_str())
                .collect::<Vec<_>>(),
        }),
        None => json!({
            "path": path,
            "route": null,
            "served_by": "static",
        }),
    })
}

async fn probe(table: &RouteTable, timeout: Duration) -> Result<usize, Box<dyn std::error::Error>> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .no_proxy()
        .build()?;

    let mut seen = Vec::new();
    let mut failures = 0;
    for rule in table.rules() {
        let target = rule.target().to_string();
        if seen.contains(&target) {
            continue;
        }
        seen.push(target.clone());

        let result = client
            .get(&target)
            .headers(rule.extra_headers().clone())
            .send()
            .await;

        let report = match result {
            Ok(res) => json!({ "target": target, "route": rule.name(), "status": res.status().as_u16() }),
            Err(e) => {
                failures += 1;
                json!({ "target": target, "route": rule.name(), "error": e.to_string() })
            }
        };
        print_json(&report)?;
    }

    Ok(failures)
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
