//! Persistent device aliases.
//!
//! Aliases map a device USN to a friendly name so users can type
//! `--device living-room` instead of a serial number. They live in a flat
//! file, one `usn,name` record per line.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::protocol_constants::{ALIASES_FILE, APP_DIR_NAME};

/// One alias record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// Device unique identifier (prefix-stripped USN).
    pub usn: String,
    /// User-chosen display name.
    pub name: String,
}

impl Alias {
    pub fn new(usn: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            usn: usn.into(),
            name: name.into(),
        }
    }
}

/// Errors from reading or writing the alias file.
#[derive(Debug, Error)]
pub enum AliasError {
    #[error("alias file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A non-blank line has no comma separator.
    #[error("malformed alias line {line}: expected 'usn,name'")]
    MalformedLine { line: usize },

    /// The value cannot be stored in a `usn,name` line.
    #[error("alias {field} '{value}' contains a character the alias file cannot hold")]
    InvalidValue { field: &'static str, value: String },

    /// The platform reports no per-user config directory.
    #[error("no user config directory available")]
    NoConfigDir,
}

/// Convenient Result alias for alias store operations.
pub type AliasResult<T> = Result<T, AliasError>;

/// Removes duplicate usns and names, newest record wins.
///
/// Records are walked from last to first; one is kept only if neither its
/// usn nor its name belongs to a record already kept. Survivors keep their
/// original relative order.
pub fn dedupe(aliases: Vec<Alias>) -> Vec<Alias> {
    let mut seen_usn = HashSet::new();
    let mut seen_name = HashSet::new();
    let mut kept: Vec<Alias> = aliases
        .into_iter()
        .rev()
        .filter(|a| {
            if seen_usn.contains(&a.usn) || seen_name.contains(&a.name) {
                return false;
            }
            seen_usn.insert(a.usn.clone());
            seen_name.insert(a.name.clone());
            true
        })
        .collect();
    kept.reverse();
    kept
}

fn parse_aliases(contents: &str) -> AliasResult<Vec<Alias>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.split_once(',')
                .map(|(usn, name)| Alias::new(usn, name))
                .ok_or(AliasError::MalformedLine { line: i + 1 })
        })
        .collect()
}

fn validate(field: &'static str, value: &str, forbidden: &[char]) -> AliasResult<()> {
    if value.contains(forbidden) {
        return Err(AliasError::InvalidValue {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn format_aliases(aliases: &[Alias]) -> String {
    aliases
        .iter()
        .map(|a| format!("{},{}\n", a.usn, a.name))
        .collect()
}

/// File-backed alias store. Every call reads or rewrites the whole file.
#[derive(Debug, Clone)]
pub struct AliasStore {
    path: PathBuf,
}

impl AliasStore {
    /// Store backed by an explicit file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<user config dir>/rokuctl/aliases`.
    pub fn default_location() -> AliasResult<Self> {
        let dir = dirs::config_dir().ok_or(AliasError::NoConfigDir)?;
        Ok(Self::new(dir.join(APP_DIR_NAME).join(ALIASES_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> AliasError {
        AliasError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Reads all records in file order.
    ///
    /// A missing file is an empty store.
    pub fn load(&self) -> AliasResult<Vec<Alias>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("[Alias] No alias file at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let aliases = parse_aliases(&contents)?;
        log::debug!(
            "[Alias] Loaded {} alias(es) from {}",
            aliases.len(),
            self.path.display()
        );
        Ok(aliases)
    }

    /// Deduplicates and writes `aliases`, replacing the file.
    ///
    /// Writes to a temp file first and renames it into place. Creates the
    /// parent directory if needed.
    pub fn save(&self, aliases: Vec<Alias>) -> AliasResult<Vec<Alias>> {
        let aliases = dedupe(aliases);

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }

        let mut temp_path = self.path.clone().into_os_string();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        std::fs::write(&temp_path, format_aliases(&aliases)).map_err(|e| self.io_error(e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;

        log::debug!(
            "[Alias] Saved {} alias(es) to {}",
            aliases.len(),
            self.path.display()
        );
        Ok(aliases)
    }

    /// Appends an alias and saves. Older records sharing the usn or name are dropped.
    ///
    /// The usn may not contain a comma and neither part may contain a line break.
    pub fn add(&self, usn: &str, name: &str) -> AliasResult<Vec<Alias>> {
        validate("usn", usn, &[',', '\n', '\r'])?;
        validate("name", name, &['\n', '\r'])?;

        let mut aliases = self.load()?;
        aliases.push(Alias::new(usn, name));
        self.save(aliases)
    }

    /// Drops every record whose usn or name equals `key`.
    ///
    /// Returns how many were removed. Skips the write when nothing matches.
    pub fn remove(&self, key: &str) -> AliasResult<usize> {
        let mut aliases = self.load()?;
        let before = aliases.len();
        aliases.retain(|a| a.usn != key && a.name != key);
        let removed = before - aliases.len();
        if removed > 0 {
            self.save(aliases)?;
        }
        Ok(removed)
    }

    /// Loads the store as a usn → name map. Later records win.
    pub fn lookup(&self) -> AliasResult<HashMap<String, String>> {
        Ok(self
            .load()?
            .into_iter()
            .map(|a| (a.usn, a.name))
            .collect())
    }
}
