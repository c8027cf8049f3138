//! OpenSSH client-config store: named `Host` blocks of key/value directives.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::StoreError;

/// One `Host` block. Directives keep encounter order; a later line for the
/// same keyword overwrites the earlier value (last-write-wins). Keywords are
/// compared ASCII-case-insensitively, as OpenSSH treats them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshHostProfile {
    pub name: String,
    directives: Vec<(String, String)>,
}

impl SshHostProfile {
    fn new(name: String) -> Self {
        Self {
            name,
            directives: Vec::new(),
        }
    }

    pub fn directive(&self, key: &str) -> Option<&str> {
        self.directives
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn directives(&self) -> &[(String, String)] {
        &self.directives
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(slot) = self
            .directives
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            slot.1 = value.to_string();
        } else {
            self.directives.push((key.to_string(), value.to_string()));
        }
    }
}

/// Store over an OpenSSH client config file. Mutations re-read the whole
/// file, edit the line sequence in memory, and rewrite it.
pub struct SshConfigStore {
    path: PathBuf,
}

impl SshConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the file into profiles. A missing file yields no profiles.
    pub fn parse(&self) -> Result<Vec<SshHostProfile>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(parse_content(&content))
    }

    /// Append a new `Host` block, creating the SSH directory (mode 0700) and
    /// the config file (mode 0600) if missing.
    ///
    /// No duplicate-name check: appending an existing name produces two
    /// blocks with the same name, and `parse` yields both. That is accepted
    /// behavior, kept from how OpenSSH itself tolerates the file.
    pub fn add(
        &self,
        name: &str,
        hostname: &str,
        user: &str,
        port: u16,
        identity_file: Option<&str>,
    ) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                create_private_dir(dir)?;
            }
        }

        let mut file = open_append_private(&self.path)?;
        write!(
            file,
            "\nHost {name}\n    HostName {hostname}\n    User {user}\n    Port {port}\n"
        )?;
        if let Some(identity) = identity_file {
            writeln!(file, "    IdentityFile {identity}")?;
        }
        debug!(name, path = %self.path.display(), "appended ssh host block");
        Ok(())
    }

    /// Delete one whole `Host <name>` block: the header plus every following
    /// line that is blank or indented. All other blocks are preserved
    /// byte-identically. Errors with `NotFound` (file untouched) when no
    /// block matches.
    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Err(StoreError::NotFound {
                what: format!("ssh config {}", self.path.display()),
            });
        }
        let content = fs::read_to_string(&self.path)?;
        let rewritten = remove_block(&content, name).ok_or_else(|| StoreError::NotFound {
            what: format!("host '{name}'"),
        })?;
        fs::write(&self.path, rewritten)?;
        debug!(name, "removed ssh host block");
        Ok(())
    }
}

/// Split config text into profiles. Content before the first `Host` header
/// is discarded (pre-block comments, global options). Duplicate block names
/// are preserved as separate profiles.
pub fn parse_content(content: &str) -> Vec<SshHostProfile> {
    let mut profiles = Vec::new();
    let mut current: Option<SshHostProfile> = None;

    for line in content.lines() {
        if let Some(name) = header_name(line) {
            if let Some(done) = current.take() {
                profiles.push(done);
            }
            current = Some(SshHostProfile::new(name.trim().to_string()));
            continue;
        }
        let Some(profile) = current.as_mut() else {
            continue;
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = split_directive(line) {
            profile.set(key, value);
        }
    }
    if let Some(done) = current.take() {
        profiles.push(done);
    }
    profiles
}

/// Remove the block whose header names exactly `name`; a header that merely
/// starts with `name` (`web` vs `web2`) does not match. Returns `None` when
/// no block matches. Every remaining line keeps its exact bytes.
pub fn remove_block(content: &str, name: &str) -> Option<String> {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let start = lines.iter().position(|line| header_matches(line, name))?;

    // Block extent: every following blank or indented line.
    let mut end = start + 1;
    while end < lines.len() {
        let line = lines[end];
        if line.trim().is_empty() || line.starts_with(' ') || line.starts_with('\t') {
            end += 1;
        } else {
            break;
        }
    }

    let mut out = String::with_capacity(content.len());
    for line in lines[..start].iter().chain(lines[end..].iter()) {
        out.push_str(line);
    }
    Some(out)
}

/// `Host <patterns>` at column zero; keyword matched case-insensitively.
fn header_name(line: &str) -> Option<&str> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    let mut split = line.splitn(2, char::is_whitespace);
    let keyword = split.next()?;
    if !keyword.eq_ignore_ascii_case("host") {
        return None;
    }
    match split.next() {
        Some(rest) if !rest.trim().is_empty() => Some(rest),
        _ => None,
    }
}

fn header_matches(line: &str, name: &str) -> bool {
    let Some(rest) = header_name(line) else {
        return false;
    };
    match rest.trim_start().strip_prefix(name) {
        Some(tail) => tail.chars().all(char::is_whitespace),
        None => false,
    }
}

/// Split a directive line on the first whitespace run into key and value.
fn split_directive(line: &str) -> Option<(&str, &str)> {
    let mut split = line.splitn(2, char::is_whitespace);
    let key = split.next()?;
    let value = split.next()?.trim();
    if value.is_empty() {
        return None;
    }
    Some((key, value))
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

fn open_append_private(path: &Path) -> io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BLOCKS: &str = concat!(
        "# global comment, discarded by parse\n",
        "\n",
        "Host testserver1\n",
        "    HostName 10.0.0.1\n",
        "    User alice\n",
        "    Port 22\n",
        "\n",
        "Host testserver2\n",
        "    HostName 10.0.0.2\n",
        "    User bob\n",
        "    Port 2222\n",
        "    IdentityFile ~/.ssh/id_bob\n",
    );

    #[test]
    fn parse_extracts_blocks_and_directives() {
        let profiles = parse_content(TWO_BLOCKS);
        assert_eq!(profiles.len(), 2);

        assert_eq!(profiles[0].name, "testserver1");
        assert_eq!(profiles[0].directive("HostName"), Some("10.0.0.1"));
        assert_eq!(profiles[0].directive("User"), Some("alice"));
        assert_eq!(profiles[0].directive("IdentityFile"), None);

        assert_eq!(profiles[1].name, "testserver2");
        assert_eq!(profiles[1].directive("Port"), Some("2222"));
        assert_eq!(
            profiles[1].directive("IdentityFile"),
            Some("~/.ssh/id_bob")
        );
    }

    #[test]
    fn parse_header_keyword_is_case_insensitive() {
        let profiles = parse_content("host lower\n    HostName 1.2.3.4\n");
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "lower");
    }

    #[test]
    fn parse_skips_comments_inside_blocks() {
        let profiles = parse_content("Host a\n    # note\n    User root\n");
        assert_eq!(profiles[0].directives().len(), 1);
        assert_eq!(profiles[0].directive("user"), Some("root"));
    }

    #[test]
    fn duplicate_directive_is_last_write_wins() {
        let profiles = parse_content("Host a\n    Port 22\n    Port 2200\n");
        assert_eq!(profiles[0].directive("Port"), Some("2200"));
        assert_eq!(profiles[0].directives().len(), 1);
    }

    #[test]
    fn unknown_directives_are_preserved() {
        let profiles = parse_content("Host a\n    ProxyJump bastion\n");
        assert_eq!(profiles[0].directive("ProxyJump"), Some("bastion"));
    }

    #[test]
    fn add_then_parse_round_trips_the_arguments() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SshConfigStore::new(dir.path().join(".ssh").join("config"));

        store
            .add("web", "web.example.com", "deploy", 2222, Some("~/.ssh/id_web"))
            .expect("add");

        let profiles = store.parse().expect("parse");
        assert_eq!(profiles.len(), 1);
        let p = &profiles[0];
        assert_eq!(p.name, "web");
        assert_eq!(p.directive("HostName"), Some("web.example.com"));
        assert_eq!(p.directive("User"), Some("deploy"));
        assert_eq!(p.directive("Port"), Some("2222"));
        assert_eq!(p.directive("IdentityFile"), Some("~/.ssh/id_web"));
    }

    #[test]
    fn add_without_identity_omits_the_directive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SshConfigStore::new(dir.path().join("config"));

        store.add("db", "db.internal", "admin", 22, None).expect("add");

        let profiles = store.parse().expect("parse");
        assert_eq!(profiles[0].directive("IdentityFile"), None);
    }

    #[cfg(unix)]
    #[test]
    fn add_creates_directory_and_file_with_owner_only_modes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = dir.path().join(".ssh").join("config");
        let store = SshConfigStore::new(&config_path);

        store.add("a", "1.2.3.4", "root", 22, None).expect("add");

        let dir_mode = fs::metadata(config_path.parent().unwrap())
            .expect("dir metadata")
            .permissions()
            .mode();
        let file_mode = fs::metadata(&config_path)
            .expect("file metadata")
            .permissions()
            .mode();
        assert_eq!(dir_mode & 0o777, 0o700);
        assert_eq!(file_mode & 0o777, 0o600);
    }

    #[test]
    fn add_duplicate_name_yields_two_profiles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SshConfigStore::new(dir.path().join("config"));

        store.add("twin", "1.1.1.1", "a", 22, None).expect("add");
        store.add("twin", "2.2.2.2", "b", 22, None).expect("add");

        let profiles = store.parse().expect("parse");
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name, "twin");
        assert_eq!(profiles[1].name, "twin");
        assert_eq!(profiles[1].directive("HostName"), Some("2.2.2.2"));
    }

    #[test]
    fn remove_block_leaves_the_other_block_byte_identical() {
        let out = remove_block(TWO_BLOCKS, "testserver1").expect("match");
        assert_eq!(
            out,
            concat!(
                "# global comment, discarded by parse\n",
                "\n",
                "Host testserver2\n",
                "    HostName 10.0.0.2\n",
                "    User bob\n",
                "    Port 2222\n",
                "    IdentityFile ~/.ssh/id_bob\n",
            )
        );
    }

    #[test]
    fn remove_block_at_end_of_file() {
        let out = remove_block(TWO_BLOCKS, "testserver2").expect("match");
        assert!(out.contains("Host testserver1\n"));
        assert!(!out.contains("testserver2"));
        assert!(!out.contains("bob"));
    }

    #[test]
    fn remove_block_does_not_match_name_prefixes() {
        let content = "Host web\n    User a\nHost web2\n    User b\n";
        let out = remove_block(content, "web").expect("match");
        assert_eq!(out, "Host web2\n    User b\n");
        // And the other direction: deleting web2 must keep web.
        let out = remove_block(content, "web2").expect("match");
        assert_eq!(out, "Host web\n    User a\n");
    }

    #[test]
    fn remove_block_unknown_name_is_none() {
        assert!(remove_block(TWO_BLOCKS, "ghost").is_none());
    }

    #[test]
    fn delete_missing_host_reports_not_found_and_keeps_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config");
        fs::write(&path, TWO_BLOCKS).expect("write");
        let store = SshConfigStore::new(&path);

        let err = store.delete("ghost").expect_err("not found");
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(fs::read_to_string(&path).expect("read"), TWO_BLOCKS);
    }

    #[test]
    fn delete_on_absent_file_reports_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SshConfigStore::new(dir.path().join("config"));
        let err = store.delete("any").expect_err("not found");
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
