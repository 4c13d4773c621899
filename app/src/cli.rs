//! Command-line interface definition.

use clap::{Args, Parser, Subcommand};
use scout_core::{ResultsAmount, SearchCriteria};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scout", version, about = "AI-assisted B2B lead discovery")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for leads matching new criteria
    Search(SearchArgs),
    /// Search again with the last submitted criteria
    More,
    /// Export collected leads as CSV
    Export {
        #[arg(long, short, help = "Write to a file instead of stdout")]
        output: Option<PathBuf>,
    },
    /// Print valid emails, one per line
    Emails,
    /// Remove every collected lead
    Clear,
    /// Show collection size and saved criteria
    Status,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[arg(long, default_value = "", help = "Target roles, e.g. \"CTO, VP Engineering\"")]
    pub roles: String,
    #[arg(long, default_value = "", help = "Keywords; email-shaped tokens must be valid")]
    pub keywords: String,
    #[arg(long, default_value = "")]
    pub industries: String,
    #[arg(long, default_value = "")]
    pub location: String,
    #[arg(long, help = "Ask for email and phone details")]
    pub contact: bool,
    #[arg(
        long,
        default_value_t = ResultsAmount::Fifty,
        value_parser = parse_amount,
        help = "Goal: 10, 25, 50, 100 or 250"
    )]
    pub amount: ResultsAmount,
    #[arg(long = "loop", help = "Keep searching every interval until the goal is reached")]
    pub auto_loop: bool,
}

impl From<SearchArgs> for SearchCriteria {
    fn from(args: SearchArgs) -> Self {
        Self {
            target_roles: args.roles,
            keywords: args.keywords,
            industries: args.industries,
            location: args.location,
            include_contact_info: args.contact,
            results_amount: args.amount,
        }
    }
}

fn parse_amount(value: &str) -> Result<ResultsAmount, String> {
    let n: u32 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    ResultsAmount::try_from(n)
}
