//! Resolves the files the stores operate on. The stores always receive
//! explicit paths; nothing below the CLI reads ambient globals.

use std::path::PathBuf;

use color_eyre::Result;

use crate::config::Config;

/// Platform-conventional hosts file location.
pub fn default_hosts_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\Windows\System32\drivers\etc\hosts")
    } else {
        PathBuf::from("/etc/hosts")
    }
}

pub fn hosts_path(config: &Config) -> PathBuf {
    config.hosts_path.clone().unwrap_or_else(default_hosts_path)
}

pub fn ssh_dir(config: &Config) -> Result<PathBuf> {
    if let Some(dir) = &config.ssh_dir {
        return Ok(dir.clone());
    }
    let home =
        dirs::home_dir().ok_or_else(|| color_eyre::eyre::eyre!("no home directory available"))?;
    Ok(home.join(".ssh"))
}

pub fn ssh_config_path(config: &Config) -> Result<PathBuf> {
    Ok(ssh_dir(config)?.join("config"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_overrides_hosts_path() {
        let config = Config {
            hosts_path: Some(PathBuf::from("/tmp/hosts-under-test")),
            ssh_dir: None,
        };
        assert_eq!(hosts_path(&config), PathBuf::from("/tmp/hosts-under-test"));
        assert_eq!(hosts_path(&Config::default()), default_hosts_path());
    }

    #[test]
    fn config_overrides_ssh_dir_and_config_path() {
        let config = Config {
            hosts_path: None,
            ssh_dir: Some(PathBuf::from("/tmp/ssh-under-test")),
        };
        assert_eq!(
            ssh_config_path(&config).expect("path"),
            PathBuf::from("/tmp/ssh-under-test/config")
        );
    }

    #[test]
    fn default_ssh_dir_is_dot_ssh_under_home() {
        let dir = ssh_dir(&Config::default()).expect("ssh dir");
        assert!(dir.ends_with(".ssh"));
    }
}
