//! SSH key-pair inventory over the user's key directory, by filename
//! convention: private key `<name>`, public key `<name>.pub`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use moor_core::runner::CommandRunner;
use tracing::debug;

use crate::StoreError;

const PUBLIC_SUFFIX: &str = ".pub";

/// Filenames in the key directory that are never key material.
const RESERVED: &[&str] = &["authorized_keys", "known_hosts", "config"];

/// A private-key candidate found in the key directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshKeyRecord {
    pub name: String,
    pub path: PathBuf,
    pub has_public: bool,
}

impl SshKeyRecord {
    /// Path of the `.pub` sibling (whether or not it exists).
    pub fn public_path(&self) -> PathBuf {
        let mut os = self.path.clone().into_os_string();
        os.push(PUBLIC_SUFFIX);
        PathBuf::from(os)
    }
}

/// Human-readable key metadata, as reported by the fingerprint utility.
/// Unknown fields are `"?"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDetails {
    pub bits: String,
    pub fingerprint: String,
    pub comment: String,
    pub key_type: String,
}

impl KeyDetails {
    fn degenerate(path: &Path) -> Self {
        let comment = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            bits: "?".to_string(),
            fingerprint: "?".to_string(),
            comment,
            key_type: "?".to_string(),
        }
    }
}

/// Store over the SSH key directory. Performs no caching across calls; the
/// filesystem is the only source of truth.
pub struct SshKeyStore<R: CommandRunner> {
    dir: PathBuf,
    runner: R,
}

impl<R: CommandRunner> SshKeyStore<R> {
    pub fn new(dir: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            dir: dir.into(),
            runner,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn key_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Inventory the directory. A missing directory yields no records.
    /// Records are sorted by name; directory iteration order is not stable
    /// across filesystems and the interactive index pick needs it stable.
    pub fn list(&self) -> Result<Vec<SshKeyRecord>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.ends_with(PUBLIC_SUFFIX) || RESERVED.contains(&name) {
                continue;
            }
            let record = SshKeyRecord {
                name: name.to_string(),
                has_public: false,
                path,
            };
            let has_public = record.public_path().exists();
            records.push(SshKeyRecord {
                has_public,
                ..record
            });
        }
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    /// Metadata for a key file.
    ///
    /// Public keys are fingerprinted via `ssh-keygen -l`; a failed call or
    /// malformed output degrades to the `"?"` record. Private keys always
    /// get the degenerate record — the tool never introspects private key
    /// material directly.
    pub fn details(&self, path: &Path) -> Result<KeyDetails, StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound {
                what: format!("key file {}", path.display()),
            });
        }

        if path.to_string_lossy().ends_with(PUBLIC_SUFFIX) {
            let path_arg = path.to_string_lossy().into_owned();
            let output = self.runner.run("ssh-keygen", &["-l", "-f", &path_arg])?;
            if output.success {
                if let Some(details) = parse_fingerprint(&output.stdout) {
                    return Ok(details);
                }
            }
            debug!(path = %path.display(), "fingerprint unavailable, degrading");
        }

        Ok(KeyDetails::degenerate(path))
    }

    /// Generate a key pair named `name` via `ssh-keygen`. RSA callers pass a
    /// bit length; other types leave it to the tool's default.
    pub fn generate(
        &self,
        name: &str,
        key_type: &str,
        bits: Option<&str>,
        passphrase: &str,
    ) -> Result<PathBuf, StoreError> {
        let path = self.key_path(name);
        let path_arg = path.to_string_lossy().into_owned();

        let mut args = vec!["-t", key_type];
        if let Some(bits) = bits {
            args.push("-b");
            args.push(bits);
        }
        args.extend(["-f", &path_arg, "-N", passphrase]);

        let output = self.runner.run("ssh-keygen", &args)?;
        if !output.success {
            return Err(StoreError::External {
                program: "ssh-keygen".to_string(),
                detail: output.stderr.trim().to_string(),
            });
        }
        debug!(name, key_type, "generated key pair");
        Ok(path)
    }

    /// Contents of the named key's `.pub` sibling, trimmed.
    pub fn read_public(&self, name: &str) -> Result<String, StoreError> {
        let mut path = self.key_path(name).into_os_string();
        path.push(PUBLIC_SUFFIX);
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(StoreError::NotFound {
                what: format!("public key {}", path.display()),
            });
        }
        Ok(fs::read_to_string(&path)?.trim().to_string())
    }

    /// Delete the named private key and, when present, its public sibling.
    /// Returns whether a public half was removed too.
    pub fn remove(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.key_path(name);
        if !path.exists() {
            return Err(StoreError::NotFound {
                what: format!("key '{name}'"),
            });
        }
        fs::remove_file(&path)?;

        let mut public = path.into_os_string();
        public.push(PUBLIC_SUFFIX);
        let public = PathBuf::from(public);
        if public.exists() {
            fs::remove_file(&public)?;
            return Ok(true);
        }
        Ok(false)
    }
}

/// Parse one line of `ssh-keygen -l` output:
/// `2048 SHA256:abcdef... user@host (RSA)` — four fixed positions.
fn parse_fingerprint(line: &str) -> Option<KeyDetails> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 4 {
        return None;
    }
    Some(KeyDetails {
        bits: tokens[0].to_string(),
        fingerprint: tokens[1].to_string(),
        comment: tokens[2].to_string(),
        key_type: tokens[3].trim_matches(|c| c == '(' || c == ')').to_string(),
    })
}
