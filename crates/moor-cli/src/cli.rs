use clap::{Parser, Subcommand};

/// CLI surface definition: one subcommand tree per configuration store.
#[derive(Parser, Debug)]
#[command(
    name = "moor",
    about = "Manage hosts entries, SSH remotes, and SSH keys from one place",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Manage domain → IP entries in the hosts file.
    #[command(subcommand)]
    Hosts(HostsCommand),
    /// Manage named SSH connection profiles.
    #[command(subcommand)]
    Remote(RemoteCommand),
    /// Manage SSH key pairs.
    #[command(subcommand)]
    Key(KeyCommand),
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version and exit.
    Version,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HostsCommand {
    /// Add a domain to the hosts file (prompts for domain and IP).
    Create,
    /// List hosts entries in a table.
    View,
    /// Pick a hosts entry and delete it.
    Delete,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    /// Add a new SSH connection profile (prompts for the fields).
    Create,
    /// List configured connections in a table.
    View,
    /// Pick a connection and delete its config block.
    Delete,
    /// Pick a connection and open an SSH session to it.
    Connect,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum KeyCommand {
    /// Generate a new SSH key pair.
    Create,
    /// List key pairs, with drill-down into fingerprint details.
    View,
    /// Pick a key pair and delete both halves.
    Delete,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hosts_view_subcommand() {
        let cli = Cli::try_parse_from(["moor", "hosts", "view"]).expect("parse should succeed");
        assert_eq!(cli.command, Command::Hosts(HostsCommand::View));
    }

    #[test]
    fn parses_remote_connect_subcommand() {
        let cli = Cli::try_parse_from(["moor", "remote", "connect"]).expect("parse should succeed");
        assert_eq!(cli.command, Command::Remote(RemoteCommand::Connect));
    }

    #[test]
    fn parses_key_create_subcommand() {
        let cli = Cli::try_parse_from(["moor", "key", "create"]).expect("parse should succeed");
        assert_eq!(cli.command, Command::Key(KeyCommand::Create));
    }

    #[test]
    fn parses_config_init_subcommand() {
        let cli = Cli::try_parse_from(["moor", "config", "init"]).expect("parse should succeed");
        assert_eq!(cli.command, Command::Config(ConfigCommand::Init));
    }

    #[test]
    fn rejects_missing_subcommand() {
        assert!(Cli::try_parse_from(["moor"]).is_err());
        assert!(Cli::try_parse_from(["moor", "hosts"]).is_err());
    }
}
