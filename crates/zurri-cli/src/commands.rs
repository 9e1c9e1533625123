//! One-shot subcommands.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};
use zurri_chat::api::{AgentQuery, AgentUpdate, AuthResponse, NewAgent, TransactionQuery};
use zurri_chat::{FileSelection, ZurriClient};
use zurri_common::{Result, ZurriError};

use crate::cli::{AgentAction, ListingArgs, WalletAction};
use crate::render;

const RECENT_TRANSACTIONS: u32 = 10;

pub async fn login(
    client: &ZurriClient,
    token_path: Option<&Path>,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    let password = resolve_password(password)?;
    let response = client.login(email, &password).await?;
    finish_auth(token_path, &response)
}

pub async fn register(
    client: &ZurriClient,
    token_path: Option<&Path>,
    email: &str,
    password: Option<String>,
    name: Option<&str>,
) -> Result<()> {
    let password = resolve_password(password)?;
    let response = client.register(email, &password, name).await?;
    finish_auth(token_path, &response)
}

pub fn logout(token_path: Option<&Path>) -> Result<()> {
    let Some(path) = token_path else {
        return Ok(());
    };
    match std::fs::remove_file(path) {
        Ok(()) => info!("removed token at {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => debug!("no stored token"),
        Err(e) => return Err(e.into()),
    }
    println!("Logged out.");
    Ok(())
}

pub async fn whoami(client: &ZurriClient) -> Result<()> {
    let user = client.current_user().await?;
    match &user.name {
        Some(name) => println!("{name} <{}>", user.email),
        None => println!("{}", user.email),
    }
    if user.is_creator {
        println!("  creator account");
    }
    if user.is_admin {
        println!("  admin");
    }
    Ok(())
}

pub async fn agents(client: &ZurriClient, query: AgentQuery) -> Result<()> {
    let list = client.list_agents(&query).await?;
    if list.agents.is_empty() {
        println!("No agents found.");
        return Ok(());
    }
    for agent in &list.agents {
        println!("{}", render::agent_line(agent));
    }
    let page = &list.pagination;
    if page.total_pages > 1 {
        println!("\npage {} of {} ({} agents)", page.page, page.total_pages, page.total);
    }
    Ok(())
}

pub async fn agent(client: &ZurriClient, action: AgentAction) -> Result<()> {
    let agent = match action {
        AgentAction::Show { id } => client.agent(&id).await?,
        AgentAction::Create { listing } => {
            let agent = client.create_agent(new_agent(listing).await?).await?;
            println!("Submitted for review.");
            agent
        }
        AgentAction::Update { id, listing } => {
            client.update_agent(&id, listing_update(listing).await?).await?
        }
        AgentAction::Delete { id } => {
            client.delete_agent(&id).await?;
            println!("Deleted {id}.");
            return Ok(());
        }
        AgentAction::Delist { id } => client.delist_agent(&id).await?,
        AgentAction::Relist { id } => client.relist_agent(&id).await?,
        AgentAction::Approve { id } => client.approve_agent(&id).await?,
        AgentAction::Reject { id } => client.reject_agent(&id).await?,
        AgentAction::Mine => return print_agents(&client.my_agents().await?, "You have no agents."),
        AgentAction::Pending => {
            return print_agents(&client.pending_agents().await?, "Nothing awaiting review.")
        }
    };
    println!("{}", render::agent_detail(&agent));
    Ok(())
}

fn print_agents(agents: &[zurri_chat::api::Agent], empty: &str) -> Result<()> {
    if agents.is_empty() {
        println!("{empty}");
    }
    for agent in agents {
        println!("{}", render::agent_line(agent));
    }
    Ok(())
}

async fn new_agent(listing: ListingArgs) -> Result<NewAgent> {
    let required = |value: Option<String>, flag: &str| {
        value.ok_or_else(|| ZurriError::Other(format!("--{flag} is required")))
    };
    let name = required(listing.name, "name")?;
    let description = required(listing.description, "description")?;
    let endpoint = required(listing.endpoint, "endpoint")?;
    let points_per_task = listing
        .points
        .ok_or_else(|| ZurriError::Other("--points is required".into()))?;
    Ok(NewAgent {
        name,
        description,
        endpoint,
        points_per_task,
        category: listing.category,
        capabilities: listing.capabilities,
        avatar: read_avatar(listing.avatar.as_deref()).await?,
    })
}

async fn listing_update(listing: ListingArgs) -> Result<AgentUpdate> {
    Ok(AgentUpdate {
        name: listing.name,
        description: listing.description,
        endpoint: listing.endpoint,
        points_per_task: listing.points,
        category: listing.category,
        capabilities: (!listing.capabilities.is_empty()).then_some(listing.capabilities),
        avatar: read_avatar(listing.avatar.as_deref()).await?,
    })
}

async fn read_avatar(path: Option<&Path>) -> Result<Option<FileSelection>> {
    match path {
        Some(path) => Ok(Some(FileSelection::from_path(path).await?)),
        None => Ok(None),
    }
}

pub async fn become_creator(client: &ZurriClient) -> Result<()> {
    let upgrade = client.become_creator().await?;
    println!(
        "{}",
        upgrade
            .message
            .as_deref()
            .unwrap_or("Your account can now list agents.")
    );
    Ok(())
}

pub async fn wallet(
    client: &ZurriClient,
    with_transactions: bool,
    action: Option<WalletAction>,
) -> Result<()> {
    match action {
        Some(WalletAction::Fund { amount }) => {
            let session = client.fund_wallet(amount).await?;
            println!("{}", render::funding_summary(&session));
            println!("Then run `zurri wallet verify {}`.", session.reference);
            return Ok(());
        }
        Some(WalletAction::Verify { reference }) => {
            let verification = client.verify_transaction(&reference).await?;
            if !verification.success {
                return Err(ZurriError::Other(
                    verification
                        .message
                        .unwrap_or_else(|| format!("payment {reference} not verified")),
                ));
            }
            if let Some(message) = &verification.message {
                println!("{message}");
            }
            if let Some(wallet) = &verification.wallet {
                println!("{}", render::wallet_summary(wallet));
            }
            return Ok(());
        }
        None => {}
    }

    let wallet = client.wallet().await?;
    println!("{}", render::wallet_summary(&wallet));

    if with_transactions {
        let query = TransactionQuery {
            limit: Some(RECENT_TRANSACTIONS),
            ..TransactionQuery::default()
        };
        let list = client.transactions(&query).await?;
        let now = Utc::now();
        println!();
        for tx in &list.transactions {
            println!("{}", render::transaction_line(tx, now));
        }
    }
    Ok(())
}

fn finish_auth(token_path: Option<&Path>, response: &AuthResponse) -> Result<()> {
    match token_path {
        Some(path) => {
            save_token(path, &response.token)?;
            info!("token stored at {}", path.display());
        }
        None => println!("No config directory available; token not stored."),
    }
    println!("Logged in as {}", response.user.email);
    Ok(())
}

/// Write the token file, readable only by the current user.
pub fn save_token(path: &Path, token: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, token)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

fn resolve_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(ZurriError::Other("password required".into()));
    }
    Ok(password)
}

/// Token file location, if the platform has a config directory.
pub fn token_path() -> Option<PathBuf> {
    zurri_config::default_token_path().ok()
}
