use clap::{Parser, Subcommand};
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use serde_json::json;

use site_edge::routing::{HostRouter, RouteRequest, Scheme};

#[derive(Parser)]
#[command(name = "edge-cli")]
#[command(about = "Inspect routing decisions of the site edge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the routing decision for a host and path without a server
    Route {
        #[arg(long)]
        host: String,

        #[arg(long, default_value = "/")]
        path: String,

        #[arg(long, default_value = "https", value_parser = parse_scheme)]
        scheme: Scheme,
    },
    /// Request a URL from a running edge without following redirects
    Probe {
        #[arg(long)]
        url: String,
    },
}

fn parse_scheme(s: &str) -> Result<Scheme, String> {
    Scheme::parse(s).ok_or_else(|| format!("expected 'http' or 'https', got '{s}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Route { host, path, scheme } => {
            let router = HostRouter::default();
            let request = RouteRequest::new(scheme, &host, &path);
            let report = json!({
                "host": request.authority(),
                "path": request.path_and_query(),
                "host_kind": router.classify(request.authority()),
                "decision": router.route(&request),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Probe { url } => {
            let client = reqwest::Client::builder()
                .redirect(Policy::none())
                .build()?;
            let res = client.get(&url).send().await?;

            let location = res
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let report = json!({
                "url": url,
                "status": res.status().as_u16(),
                "location": location,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
