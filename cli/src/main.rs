//! Command-line interface for the journal resolution service.
//!
//! Commands:
//! - resolve: Look up the journal for a DOI through the server
//! - verify: Check DOI syntax locally and print the normalized form
//!
//! Configuration via environment:
//! - DOI_SERVICE_URL: Base URL of the server (default: http://localhost:3000)

mod commands;

use clap::{Parser, Subcommand};

use commands::{resolve::ResolveArgs, verify::VerifyArgs};

/// Journal resolution service CLI
///
/// Resolve DOIs to journal records from the command line. Prints JSON by
/// default; --human prints formatted text.
#[derive(Parser)]
#[command(name = "doi")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output human-readable formatted text instead of JSON
    #[arg(long, global = true)]
    human: bool,

    /// Journal resolution server URL
    #[arg(
        long,
        env = "DOI_SERVICE_URL",
        default_value = "http://localhost:3000",
        global = true
    )]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the journal a DOI was published in
    Resolve(ResolveArgs),

    /// Check DOI syntax without contacting the server
    Verify(VerifyArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve(args) => match commands::build_client() {
            Ok(client) => commands::resolve::execute(&client, &cli.url, cli.human, args).await,
            Err(e) => Err(e),
        },
        Commands::Verify(args) => commands::verify::execute(cli.human, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
