use color_eyre::Result;
use moor_core::runner::SystemRunner;
use moor_store::{
    ssh_keys::{SshKeyRecord, SshKeyStore},
    StoreError,
};

use crate::{
    cli::KeyCommand,
    config::Config,
    paths,
    prompt::{self, Selection},
    table,
};

const KEY_TYPES: &[&str] = &["ed25519", "rsa", "ecdsa"];
const RSA_BITS: &[&str] = &["4096", "2048"];

/// Execute a key subcommand against the SSH key directory.
pub fn handle(cmd: KeyCommand, config: &Config) -> Result<()> {
    let store = SshKeyStore::new(paths::ssh_dir(config)?, SystemRunner);
    match cmd {
        KeyCommand::Create => create(&store),
        KeyCommand::View => view(&store),
        KeyCommand::Delete => delete(&store),
    }
}

fn create(store: &SshKeyStore<SystemRunner>) -> Result<()> {
    println!("Creating an SSH key...");
    let name = prompt::input_with_default("Key name (e.g. id_rsa)", "id_rsa")?;

    if store.key_path(&name).exists()
        && !prompt::confirm(&format!("Key '{name}' already exists. Overwrite?"))?
    {
        println!("Operation cancelled.");
        return Ok(());
    }

    let key_type = KEY_TYPES[prompt::choose("Key type", KEY_TYPES, 0)?];
    let bits = if key_type == "rsa" {
        Some(RSA_BITS[prompt::choose("Key bits", RSA_BITS, 0)?])
    } else {
        None
    };
    let passphrase = prompt::password("Passphrase (empty for no passphrase)")?;

    match store.generate(&name, key_type, bits, &passphrase) {
        Ok(_) => {
            println!("SSH key '{name}' created successfully.");
            if let Ok(public) = store.read_public(&name) {
                println!("\nYour public key:");
                println!("{public}");
            }
        }
        Err(err) => println!("Error creating key: {err}"),
    }
    Ok(())
}

fn view(store: &SshKeyStore<SystemRunner>) -> Result<()> {
    let Some(record) = pick(store, "Enter number of key to view details")? else {
        return Ok(());
    };

    println!("\nDetails for key: {}", record.name);
    if !record.has_public {
        println!("No public key found for this private key.");
        return Ok(());
    }

    let details = store.details(&record.public_path())?;
    println!("Type: {}", details.key_type);
    println!("Bits: {}", details.bits);
    println!("Fingerprint: {}", details.fingerprint);
    println!("Comment: {}", details.comment);

    match store.read_public(&record.name) {
        Ok(public) => {
            println!("\nPublic key:");
            println!("{public}");
        }
        Err(err) => println!("Error reading public key: {err}"),
    }
    Ok(())
}

fn delete(store: &SshKeyStore<SystemRunner>) -> Result<()> {
    let Some(record) = pick(store, "Enter number of key to delete")? else {
        return Ok(());
    };

    let name = &record.name;
    if !prompt::confirm(&format!(
        "Are you sure you want to delete '{name}'? This cannot be undone."
    ))? {
        println!("Operation cancelled.");
        return Ok(());
    }

    match store.remove(name) {
        Ok(removed_public) => {
            println!("Deleted private key: {name}");
            if removed_public {
                println!("Deleted public key: {name}.pub");
            }
            println!("SSH key '{name}' deleted successfully.");
        }
        Err(StoreError::NotFound { .. }) => println!("Key '{name}' not found."),
        Err(err) => println!("Error deleting key: {err}"),
    }
    Ok(())
}

/// List the keys as an indexed table and prompt for a pick. `None` means
/// quit, an empty directory, or an invalid selection already reported.
fn pick(
    store: &SshKeyStore<SystemRunner>,
    prompt_text: &str,
) -> Result<Option<SshKeyRecord>> {
    let records = store.list()?;
    if records.is_empty() {
        println!("No SSH keys found in {}.", store.dir().display());
        return Ok(None);
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            vec![
                (i + 1).to_string(),
                r.name.clone(),
                if r.has_public { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    table::print(&["#", "NAME", "HAS PUBLIC KEY"], &rows);

    match prompt::select_index(prompt_text, records.len())? {
        Ok(Selection::Quit) => Ok(None),
        Ok(Selection::Index(i)) => Ok(Some(records[i].clone())),
        Err(err) => {
            println!("{err}");
            Ok(None)
        }
    }
}
