//! VERIFY command - Check DOI syntax locally.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use doi_core::Doi;
use serde::Serialize;

use super::{HumanReadable, output};

/// Arguments for the verify command.
#[derive(Args)]
pub struct VerifyArgs {
    /// DOI to check, bare or prefixed with a doi.org resolver URL
    pub doi: String,
}

/// Result of a successful check.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub input: String,
    pub doi: String,
}

impl HumanReadable for VerifyResponse {
    fn print_human(&self) {
        println!("{} {}", "Valid DOI:".green().bold(), self.doi);
        if self.input != self.doi {
            println!("  {} {}", "Input:".cyan(), self.input);
        }
    }
}

/// Execute the verify command.
pub fn execute(human: bool, args: VerifyArgs) -> Result<()> {
    let doi = Doi::parse(&args.doi)?;
    let response = VerifyResponse {
        input: args.doi,
        doi: doi.to_string(),
    };
    output(&response, human)
}
