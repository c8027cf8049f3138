use color_eyre::Result;
use moor_core::runner::{CommandRunner, SystemRunner};
use moor_store::{ssh_config::SshConfigStore, StoreError};

use crate::{
    cli::RemoteCommand,
    config::Config,
    paths,
    prompt::{self, Selection},
    table,
};

/// Execute a remote-connection subcommand against the SSH client config.
pub fn handle(cmd: RemoteCommand, config: &Config) -> Result<()> {
    let store = SshConfigStore::new(paths::ssh_config_path(config)?);
    match cmd {
        RemoteCommand::Create => create(&store),
        RemoteCommand::View => view(&store),
        RemoteCommand::Delete => delete(&store),
        RemoteCommand::Connect => connect(&store),
    }
}

fn create(store: &SshConfigStore) -> Result<()> {
    println!("Adding a new SSH connection...");
    let name = prompt::input("Connection name")?;
    let hostname = prompt::input("Hostname/IP")?;
    let user = prompt::input("Username")?;
    let port_raw = prompt::input_with_default("Port", "22")?;
    let Ok(port) = port_raw.trim().parse::<u16>() else {
        println!("'{port_raw}' is not a valid port number.");
        return Ok(());
    };

    let identity_file = if prompt::confirm("Use identity file?")? {
        Some(prompt::input_with_default(
            "Path to identity file",
            "~/.ssh/id_rsa",
        )?)
    } else {
        None
    };

    match store.add(&name, &hostname, &user, port, identity_file.as_deref()) {
        Ok(()) => println!("SSH connection '{name}' added successfully."),
        Err(err) => println!("Error updating SSH config: {err}"),
    }
    Ok(())
}

fn view(store: &SshConfigStore) -> Result<()> {
    let profiles = store.parse()?;
    if profiles.is_empty() {
        println!("No SSH connections found in config.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = profiles
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.directive("HostName").unwrap_or("").to_string(),
                p.directive("User").unwrap_or("").to_string(),
                p.directive("Port").unwrap_or("22").to_string(),
                p.directive("IdentityFile").unwrap_or("").to_string(),
            ]
        })
        .collect();
    table::print(&["NAME", "HOSTNAME", "USER", "PORT", "IDENTITY FILE"], &rows);
    Ok(())
}

fn delete(store: &SshConfigStore) -> Result<()> {
    let Some(name) = pick(store, "Enter number of connection to delete")? else {
        return Ok(());
    };

    if !prompt::confirm(&format!("Are you sure you want to delete '{name}'?"))? {
        return Ok(());
    }
    match store.delete(&name) {
        Ok(()) => println!("SSH connection '{name}' deleted successfully."),
        Err(StoreError::NotFound { .. }) => println!("Connection '{name}' not found."),
        Err(err) => println!("Error updating SSH config: {err}"),
    }
    Ok(())
}

fn connect(store: &SshConfigStore) -> Result<()> {
    let Some(name) = pick(store, "Enter number of connection to connect")? else {
        return Ok(());
    };

    println!("Connecting to {name}...");
    // ssh owns the terminal until the session ends.
    let ok = SystemRunner.run_interactive("ssh", &[&name])?;
    if !ok {
        println!("ssh to '{name}' exited with an error.");
    }
    Ok(())
}

/// List the profiles as an indexed table and prompt for a pick, returning
/// the chosen profile name. `None` means quit, empty config, or an invalid
/// selection already reported to the user.
fn pick(store: &SshConfigStore, prompt_text: &str) -> Result<Option<String>> {
    let profiles = store.parse()?;
    if profiles.is_empty() {
        println!("No SSH connections found in config.");
        return Ok(None);
    }

    let rows: Vec<Vec<String>> = profiles
        .iter()
        .enumerate()
        .map(|(i, p)| {
            vec![
                (i + 1).to_string(),
                p.name.clone(),
                p.directive("HostName").unwrap_or("").to_string(),
                p.directive("User").unwrap_or("").to_string(),
            ]
        })
        .collect();
    table::print(&["#", "NAME", "HOSTNAME", "USER"], &rows);

    match prompt::select_index(prompt_text, profiles.len())? {
        Ok(Selection::Quit) => Ok(None),
        Ok(Selection::Index(i)) => Ok(Some(profiles[i].name.clone())),
        Err(err) => {
            println!("{err}");
            Ok(None)
        }
    }
}
