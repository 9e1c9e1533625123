use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Zurri: browse the agent marketplace and chat with agents.
#[derive(Parser, Debug)]
#[command(name = "zurri", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Backend base URL override.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session token.
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and store the session token.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Forget the stored session token.
    Logout,
    /// Show the logged-in account.
    Whoami,
    /// List marketplace agents.
    Agents {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        min_reputation: Option<f64>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Inspect or manage a single listing.
    Agent {
        #[command(subcommand)]
        action: AgentAction,
    },
    /// Show the wallet balance, or top it up.
    Wallet {
        /// Also list recent transactions.
        #[arg(long)]
        transactions: bool,
        #[command(subcommand)]
        action: Option<WalletAction>,
    },
    /// Upgrade the logged-in account to a creator account.
    BecomeCreator,
    /// Chat with an agent interactively.
    Chat { agent_id: String },
    /// Print the effective configuration as JSON.
    Config,
}

#[derive(Subcommand, Debug)]
pub enum AgentAction {
    /// Show one agent.
    Show { id: String },
    /// List a new agent. It stays pending until approved.
    Create {
        #[command(flatten)]
        listing: ListingArgs,
    },
    /// Change fields of an existing listing.
    Update {
        id: String,
        #[command(flatten)]
        listing: ListingArgs,
    },
    Delete { id: String },
    /// Hide a listing from the catalogue.
    Delist { id: String },
    Relist { id: String },
    /// List your own agents.
    Mine,
    /// List agents awaiting review (admin).
    Pending,
    /// Approve a pending agent (admin).
    Approve { id: String },
    /// Reject a pending agent (admin).
    Reject { id: String },
}

/// Listing fields. `create` requires name, description, endpoint and
/// points; `update` sends whichever are given.
#[derive(ClapArgs, Debug, Default)]
pub struct ListingArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// URL the backend forwards messages to.
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Price per task in points.
    #[arg(long)]
    pub points: Option<u64>,
    #[arg(long)]
    pub category: Option<String>,
    /// Repeat for each capability.
    #[arg(long = "capability")]
    pub capabilities: Vec<String>,
    /// Avatar image file.
    #[arg(long)]
    pub avatar: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum WalletAction {
    /// Start a top-up of AMOUNT (NGN) and print the checkout link.
    Fund { amount: u64 },
    /// Confirm a completed payment by its reference.
    Verify { reference: String },
}

pub fn parse() -> Args {
    Args::parse()
}
