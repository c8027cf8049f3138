use color_eyre::Result;
use moor_core::runner::SystemRunner;
use moor_store::{hosts::HostsStore, StoreError};

use crate::{
    cli::HostsCommand,
    config::Config,
    paths,
    prompt::{self, Selection},
    table,
};

/// Execute a hosts subcommand against the system hosts file.
pub fn handle(cmd: HostsCommand, config: &Config) -> Result<()> {
    let store = HostsStore::new(paths::hosts_path(config), SystemRunner);
    match cmd {
        HostsCommand::Create => create(&store),
        HostsCommand::View => view(&store),
        HostsCommand::Delete => delete(&store),
    }
}

fn create(store: &HostsStore<SystemRunner>) -> Result<()> {
    println!("Adding a new domain to the hosts file...");
    let domain = prompt::input("Domain name")?;
    let ip = prompt::input_with_default("IP address", "127.0.0.1")?;

    println!("Adding {domain} with IP {ip}; this requires sudo privileges.");
    match store.add(&ip, &domain) {
        Ok(()) => println!("Domain '{domain}' added successfully."),
        Err(StoreError::AlreadyExists { domain, ip }) => {
            println!("Domain '{domain}' already exists in the hosts file with IP {ip}.");
        }
        Err(err) => println!("Error updating hosts file: {err}"),
    }
    Ok(())
}

fn view(store: &HostsStore<SystemRunner>) -> Result<()> {
    let entries = store.parse()?;
    if entries.is_empty() {
        println!("No domain entries found in the hosts file.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| vec![e.ip.clone(), e.domain.clone()])
        .collect();
    table::print(&["IP", "DOMAIN"], &rows);
    Ok(())
}

fn delete(store: &HostsStore<SystemRunner>) -> Result<()> {
    let entries = store.parse()?;
    if entries.is_empty() {
        println!("No domain entries found in the hosts file.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| vec![(i + 1).to_string(), e.ip.clone(), e.domain.clone()])
        .collect();
    table::print(&["#", "IP", "DOMAIN"], &rows);

    let index = match prompt::select_index("Enter number of domain to delete", entries.len())? {
        Ok(Selection::Quit) => return Ok(()),
        Ok(Selection::Index(i)) => i,
        Err(err) => {
            println!("{err}");
            return Ok(());
        }
    };

    let domain = &entries[index].domain;
    if !prompt::confirm(&format!("Are you sure you want to delete '{domain}'?"))? {
        return Ok(());
    }

    println!("This operation requires sudo privileges.");
    match store.delete(domain) {
        Ok(()) => println!("Domain '{domain}' deleted successfully."),
        Err(StoreError::NotFound { .. }) => {
            println!("Domain '{domain}' not found in the hosts file.");
        }
        Err(err) => println!("Error updating hosts file: {err}"),
    }
    Ok(())
}
