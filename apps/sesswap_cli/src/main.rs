use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use sesswap_adapters::configuration;
use sesswap_adapters::telemetry;
use sesswap_adapters::{CdpSessionBridge, FileAccountStore};
use sesswap_core::ports::SessionBridge;
use sesswap_core::use_cases::{AccountManager, SessionSwitch};
use tracing::error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    // --- Account commands ---
    /// List saved accounts
    Accounts,

    /// Add a new account
    Add {
        /// Display name for the account
        name: String,

        /// Credential token (prompted for when omitted)
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Edit a saved account
    Edit {
        /// Account id, or name if unambiguous
        account: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New credential token
        #[arg(long)]
        token: Option<String>,
    },

    /// Remove a saved account
    Remove {
        /// Account id, or name if unambiguous
        account: String,

        /// Skip confirmation prompt
        #[arg(short, long, default_value = "false")]
        yes: bool,
    },

    // --- Session commands ---
    /// Write an account's session into the active page
    Switch {
        /// Account id, or name if unambiguous
        account: String,
    },

    /// List the browser's debuggable targets
    Targets,

    /// Show endpoint, browser and account store status
    Status,
}

fn get_config_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "sesswap", "sesswap")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("~/.config"))
                .join("sesswap")
        })
}

/// Mask a token for display, keeping only the edges.
fn masked(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let _guard = telemetry::init_subscriber("sesswap_cli", "info");

    let settings = match configuration::get_configuration() {
        Ok(s) => s,
        Err(e) => {
            error!(?e, "failed to load configuration");
            return Err(anyhow::anyhow!("configuration loading failed"));
        }
    };

    let cli = Cli::parse();

    match &cli.command {
        // --- Account commands ---
        Commands::Accounts => {
            let config_dir = get_config_dir();
            let manager = AccountManager::new(Arc::new(FileAccountStore::new(config_dir)));

            let accounts = manager.list().await?;
            if accounts.is_empty() {
                println!("No accounts saved.");
                println!("Use 'sesswap_cli add <name>' to add one.");
            } else {
                println!("Saved accounts:");
                for (position, account) in accounts.iter().enumerate() {
                    println!(
                        "  {}. {}  {}  [{}]",
                        position + 1,
                        account.id,
                        account.name,
                        masked(&account.token)
                    );
                }
            }
        }

        Commands::Add { name, token } => {
            let config_dir = get_config_dir();
            let manager = AccountManager::new(Arc::new(FileAccountStore::new(config_dir)));

            let token = match token {
                Some(t) => t.clone(),
                None => rpassword::prompt_password("Token: ")?,
            };

            match manager.add(name, &token).await {
                Ok(account) => {
                    println!("Account '{}' added.", account.name);
                    println!("  Id:    {}", account.id);
                    println!("  Token: {}", masked(&account.token));
                }
                Err(e) => {
                    error!(?e, "failed to add account");
                    println!("Add failed: {}", e);
                }
            }
        }

        Commands::Edit {
            account,
            name,
            token,
        } => {
            let config_dir = get_config_dir();
            let manager = AccountManager::new(Arc::new(FileAccountStore::new(config_dir)));

            if name.is_none() && token.is_none() {
                println!("Nothing to change; pass --name and/or --token.");
                return Ok(());
            }

            let current = match manager.find(account).await {
                Ok(a) => a,
                Err(e) => {
                    println!("{}", e);
                    return Ok(());
                }
            };

            // Omitted fields keep their current value.
            let new_name = name.clone().unwrap_or_else(|| current.name.clone());
            let new_token = match token {
                Some(t) => t.clone(),
                None => current.token.clone(),
            };

            match manager.edit(&current.id, &new_name, &new_token).await {
                Ok(updated) => {
                    println!("Account '{}' updated.", updated.name);
                    println!("  Id:    {}", updated.id);
                    println!("  Token: {}", masked(&updated.token));
                }
                Err(e) => {
                    error!(?e, "failed to edit account");
                    println!("Edit failed: {}", e);
                }
            }
        }

        Commands::Remove { account, yes } => {
            let config_dir = get_config_dir();
            let manager = AccountManager::new(Arc::new(FileAccountStore::new(config_dir)));

            let target = match manager.find(account).await {
                Ok(a) => a,
                Err(e) => {
                    println!("{}", e);
                    return Ok(());
                }
            };

            if !*yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete account '{}'?", target.name))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let removed = manager.remove(&target.id).await?;
            println!("Account '{}' removed.", removed.name);
        }

        // --- Session commands ---
        Commands::Switch { account } => {
            let config_dir = get_config_dir();
            let manager = AccountManager::new(Arc::new(FileAccountStore::new(config_dir)));

            let target = match manager.find(account).await {
                Ok(a) => a,
                Err(e) => {
                    println!("{}", e);
                    return Ok(());
                }
            };

            let bridge = CdpSessionBridge::new(settings.cdp.clone())?;
            let switcher = SessionSwitch::new(Arc::new(bridge));

            println!("Switching to '{}'...", target.name);
            match switcher.switch_to(&target).await {
                Ok(outcome) => {
                    println!(
                        "Session set for '{}' on {}.",
                        outcome.account_name, outcome.page.url
                    );
                    println!("Reload the page (or use its banner) to apply.");
                }
                Err(e) => {
                    error!(?e, "switch failed");
                    println!("Switch failed: {}", e);
                    return Err(anyhow::anyhow!("switch failed"));
                }
            }
        }

        Commands::Targets => {
            let bridge = CdpSessionBridge::new(settings.cdp.clone())?;

            match bridge.list_targets().await {
                Ok(targets) => {
                    if targets.is_empty() {
                        println!("No targets reported by the endpoint.");
                    } else {
                        println!("Found {} targets:", targets.len());
                        let mut marked = false;
                        for target in &targets {
                            // The first user page is the one 'switch' would hit.
                            let marker = if !marked && target.is_user_page() {
                                marked = true;
                                "*"
                            } else {
                                " "
                            };
                            println!(
                                "  {} [{}] {} ({}){}",
                                marker,
                                target.kind,
                                target.title,
                                target.url,
                                if target.ws_url.is_none() {
                                    " [debugger attached]"
                                } else {
                                    ""
                                },
                            );
                        }
                    }
                }
                Err(e) => {
                    error!(?e, "failed to list targets");
                    println!("{}", e);
                }
            }
        }

        Commands::Status => {
            let config_dir = get_config_dir();
            let store = FileAccountStore::new(config_dir);
            println!("Accounts file: {}", store.path().display());

            let manager = AccountManager::new(Arc::new(store));
            match manager.list().await {
                Ok(accounts) => println!("Accounts:      {}", accounts.len()),
                Err(e) => println!("Accounts:      unreadable ({})", e),
            }

            println!("Endpoint:      {}", settings.cdp.base_url());

            let bridge = CdpSessionBridge::new(settings.cdp.clone())?;
            match bridge.browser_version().await {
                Ok(version) => println!("Browser:       {}", version),
                Err(e) => {
                    println!("Browser:       unreachable");
                    println!("  {}", e);
                    return Ok(());
                }
            }

            match bridge.active_page().await {
                Ok(Some(page)) => println!("Active page:   {} ({})", page.title, page.url),
                Ok(None) => println!("Active page:   none"),
                Err(e) => println!("Active page:   unknown ({})", e),
            }
        }
    }

    Ok(())
}
