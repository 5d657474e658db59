//! RESOLVE command - Look up the journal for a DOI.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{HumanReadable, make_request, output, truncate};

/// Arguments for the resolve command.
#[derive(Args)]
pub struct ResolveArgs {
    /// DOI to resolve, bare or prefixed with a doi.org resolver URL
    pub doi: String,
}

/// Response from GET /journal.
#[derive(Debug, Deserialize, Serialize)]
pub struct JournalResponse {
    #[serde(rename = "journal-id")]
    pub journal_id: String,
    pub crossref: Value,
}

impl JournalResponse {
    fn message_str(&self, field: &str) -> Option<&str> {
        self.crossref["message"][field]
            .as_str()
            .or_else(|| self.crossref["message"][field][0].as_str())
    }
}

impl HumanReadable for JournalResponse {
    fn print_human(&self) {
        println!("{}", "Journal".green().bold());
        println!("{}", "=".repeat(60));
        println!();

        println!("  {} {}", "Journal ID:".cyan(), self.journal_id);
        if let Some(journal) = self.message_str("container-title") {
            println!("  {} {}", "Journal:".cyan(), journal);
        }
        if let Some(doi) = self.message_str("DOI") {
            println!("  {} {}", "DOI:".cyan(), doi);
        }
        if let Some(title) = self.message_str("title") {
            println!("  {} {}", "Article:".cyan(), truncate(title, 70));
        }
        if let Some(issns) = self.crossref["message"]["issn-type"].as_array() {
            for issn in issns {
                println!(
                    "  {} {} ({})",
                    "ISSN:".cyan(),
                    issn["value"].as_str().unwrap_or_default(),
                    issn["type"].as_str().unwrap_or("unspecified").dimmed()
                );
            }
        }
    }
}

/// Execute the resolve command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: ResolveArgs,
) -> Result<()> {
    let url = format!("{}/journal", base_url.trim_end_matches('/'));
    let request = client.get(&url).query(&[("doi", args.doi.as_str())]);

    let response: JournalResponse = make_request(request).await?;
    output(&response, human)
}
