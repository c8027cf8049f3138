//! Hosts-file store: domain → IP entries with surgical edits on
//! multi-domain lines.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use moor_core::runner::CommandRunner;
use tracing::debug;

use crate::StoreError;

/// One (IP, domain) pair. A file line carrying several domains expands to
/// one entry per domain, all sharing the line's IP. Entries are an ephemeral
/// view recomputed on every read; they own no file position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub ip: String,
    pub domain: String,
}

/// Store over an `/etc/hosts`-style file.
///
/// The system hosts file is only writable with elevated privilege, so every
/// mutation goes through `sudo` via the injected runner: copy the file to a
/// scratch location, edit the scratch copy, then move it over the original.
/// A crash or a denied elevation before the final move leaves the original
/// untouched.
pub struct HostsStore<R: CommandRunner> {
    path: PathBuf,
    runner: R,
}

impl<R: CommandRunner> HostsStore<R> {
    pub fn new(path: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            path: path.into(),
            runner,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file and expand every line into per-domain entries.
    /// A missing file yields no entries rather than an error.
    pub fn parse(&self) -> Result<Vec<HostEntry>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(parse_content(&content))
    }

    /// Append `<ip>\t<domain>` to the end of the file.
    ///
    /// Rejects a domain that already appears in any parsed entry, reporting
    /// the conflicting IP. The scan is exact-match and case-sensitive.
    pub fn add(&self, ip: &str, domain: &str) -> Result<(), StoreError> {
        for entry in self.parse()? {
            if entry.domain == domain {
                return Err(StoreError::AlreadyExists {
                    domain: domain.to_string(),
                    ip: entry.ip,
                });
            }
        }

        let line = format!("\n{ip}\t{domain}\n");
        self.replace_elevated(|scratch| {
            let mut file = fs::OpenOptions::new().append(true).open(scratch)?;
            file.write_all(line.as_bytes())?;
            Ok(())
        })
    }

    /// Remove `domain` wherever it appears as a standalone token.
    ///
    /// A multi-domain line keeps its IP and remaining domains; removing the
    /// last domain drops the line entirely. Every other line is preserved
    /// byte-for-byte. Errors with `NotFound` (file untouched, no elevation
    /// attempted) when no line carries the token.
    pub fn delete(&self, domain: &str) -> Result<(), StoreError> {
        let content = if self.path.exists() {
            fs::read_to_string(&self.path)?
        } else {
            String::new()
        };
        let rewritten = remove_domain(&content, domain).ok_or_else(|| StoreError::NotFound {
            what: format!("domain '{domain}'"),
        })?;

        self.replace_elevated(|scratch| {
            fs::write(scratch, &rewritten)?;
            Ok(())
        })
    }

    /// Copy-edit-replace through `sudo`: `cp` the file to a scratch path,
    /// `chmod` it writable, apply `edit` locally, then `mv` it back over the
    /// original. Any failing step aborts before the final move.
    fn replace_elevated<F>(&self, edit: F) -> Result<(), StoreError>
    where
        F: FnOnce(&Path) -> Result<(), StoreError>,
    {
        let scratch = self.scratch_path();
        let original = self.path.to_string_lossy().into_owned();
        let copy = scratch.to_string_lossy().into_owned();

        self.elevated(&["cp", &original, &copy])?;
        self.elevated(&["chmod", "666", &copy])?;
        edit(&scratch)?;
        self.elevated(&["mv", &copy, &original])?;
        debug!(path = %self.path.display(), "hosts file replaced");
        Ok(())
    }

    fn elevated(&self, args: &[&str]) -> Result<(), StoreError> {
        // Interactive so sudo can prompt for a password on the terminal.
        let ok = self.runner.run_interactive("sudo", args)?;
        if !ok {
            return Err(StoreError::External {
                program: "sudo".to_string(),
                detail: format!("'sudo {}' exited unsuccessfully", args.join(" ")),
            });
        }
        Ok(())
    }

    /// Scratch copy in the temp dir; pid plus a process-local sequence keeps
    /// concurrent invocations from clobbering each other's copy mid-edit.
    fn scratch_path(&self) -> PathBuf {
        static SEQ: AtomicU64 = AtomicU64::new(0);
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "hosts".to_string());
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("{name}.{}.{seq}.new", std::process::id()))
    }
}

/// Expand hosts-file text into per-domain entries, in file order and domain
/// order within a line. Comments, blanks, and lines with fewer than two
/// tokens are skipped.
pub fn parse_content(content: &str) -> Vec<HostEntry> {
    let mut entries = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let Some(ip) = tokens.next() else { continue };
        for domain in tokens {
            entries.push(HostEntry {
                ip: ip.to_string(),
                domain: domain.to_string(),
            });
        }
    }
    entries
}

/// Remove `domain` as an exact whitespace-delimited token from every line
/// that carries it. Returns `None` when no line matches. Untouched lines
/// keep their exact bytes, terminators included; edited lines are rewritten
/// as `<ip>\t<dom> <dom>...`.
pub fn remove_domain(content: &str, domain: &str) -> Option<String> {
    let mut out = String::with_capacity(content.len());
    let mut modified = false;

    for line in content.split_inclusive('\n') {
        let stripped = line.trim();
        // Containment is only a pre-filter; the edit below is token-exact so
        // `example.com` never strips `test.example.com`.
        if !stripped.starts_with('#') && line.contains(domain) {
            let tokens: Vec<&str> = stripped.split_whitespace().collect();
            if tokens.len() >= 2 && tokens[1..].contains(&domain) {
                let kept: Vec<&str> = tokens[1..]
                    .iter()
                    .copied()
                    .filter(|t| *t != domain)
                    .collect();
                if !kept.is_empty() {
                    out.push_str(tokens[0]);
                    out.push('\t');
                    out.push_str(&kept.join(" "));
                    out.push('\n');
                }
                modified = true;
                continue;
            }
        }
        out.push_str(line);
    }

    modified.then_some(out)
}
