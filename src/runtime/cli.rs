//! CLI mode
//!
//! Runs one registry command directly against the configured database.

use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::Arc;

use crate::cli::Commands;
use crate::errors::RegistryError;
use crate::services::{CreateLinkRequest, LinkService};
use crate::storage::{Link, LinkStore, StorageFactory};

/// Run a single CLI command. `Serve` is handled by the caller.
pub async fn run_cli(command: Commands) -> Result<()> {
    if command == Commands::Serve {
        return Ok(());
    }

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    let store: Arc<dyn LinkStore> = storage;
    let service = LinkService::from_config(store);

    let outcome = match command {
        Commands::Serve => Ok(()),
        Commands::Add { args } => {
            let (code, url) = Commands::parse_add_args(&args);
            let req = CreateLinkRequest { url, code };
            service.create_link(req).await.map(|link| {
                println!(
                    "{} {} -> {}",
                    "Added".green().bold(),
                    link.code.cyan(),
                    link.url
                );
            })
        }
        Commands::Get { short_code } => service
            .get_link(&short_code)
            .await
            .map(|link| println!("{}", format_link(&link))),
        Commands::Remove { short_code } => service.delete_link(&short_code).await.map(|()| {
            println!("{} {}", "Removed".green().bold(), short_code.cyan());
        }),
        Commands::List => service.list_links().await.map(|links| {
            if links.is_empty() {
                println!("{}", "No links".dimmed());
            }
            for link in &links {
                println!("{}", format_link(link));
            }
        }),
    };

    outcome.map_err(|e: RegistryError| {
        eprintln!("{}", e.format_simple().red());
        anyhow::Error::new(e)
    })
}

fn format_link(link: &Link) -> String {
    let last = link
        .last_clicked
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}  {}  clicks={}  last={}  created={}",
        link.code.cyan(),
        link.url,
        link.click_count,
        last,
        link.created_at.to_rfc3339()
    )
}
