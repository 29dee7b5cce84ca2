use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::catalog;
use super::import::{self, ImportError};
use super::tables::ReferenceTables;

/// Where the active reference tables came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSourceKind {
    Static,
    Loaded,
}

impl RuleSourceKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Static => "built-in catalog",
            Self::Loaded => "external reference tables",
        }
    }
}

/// Immutable tables plus a content fingerprint used to key memoized results.
#[derive(Debug, Clone)]
pub struct RuleSnapshot {
    tables: ReferenceTables,
    version: String,
    loaded_at: DateTime<Utc>,
}

impl RuleSnapshot {
    pub fn new(tables: ReferenceTables) -> Self {
        let version = fingerprint(&tables);
        Self {
            tables,
            version,
            loaded_at: Utc::now(),
        }
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

fn fingerprint(tables: &ReferenceTables) -> String {
    let canonical = serde_json::to_vec(tables).unwrap_or_default();
    let digest = Sha256::digest(&canonical);
    format!("{digest:x}")
}

/// Single seam between the aggregator and however reference data is supplied.
pub trait RuleSource: Send + Sync {
    fn kind(&self) -> RuleSourceKind;
    fn snapshot(&self) -> &RuleSnapshot;

    fn tables(&self) -> &ReferenceTables {
        self.snapshot().tables()
    }
}

/// Hand-authored tables compiled into the binary.
#[derive(Debug, Clone)]
pub struct StaticRuleSource {
    snapshot: RuleSnapshot,
}

impl StaticRuleSource {
    pub fn standard() -> Self {
        Self::with_tables(catalog::standard_tables())
    }

    pub fn with_tables(tables: ReferenceTables) -> Self {
        Self {
            snapshot: RuleSnapshot::new(tables),
        }
    }
}

impl Default for StaticRuleSource {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleSource for StaticRuleSource {
    fn kind(&self) -> RuleSourceKind {
        RuleSourceKind::Static
    }

    fn snapshot(&self) -> &RuleSnapshot {
        &self.snapshot
    }
}

/// Tables fetched once from an external read-only store.
#[derive(Debug, Clone)]
pub struct LoadedRuleSource {
    snapshot: RuleSnapshot,
    origin: Option<PathBuf>,
}

impl LoadedRuleSource {
    pub fn new(tables: ReferenceTables, origin: Option<PathBuf>) -> Self {
        Self {
            snapshot: RuleSnapshot::new(tables),
            origin,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let tables = import::load_tables(path)?;
        Ok(Self::new(tables, Some(path.to_path_buf())))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ImportError> {
        Ok(Self::new(import::parse_tables(reader)?, None))
    }

    /// Extends the loaded tables with a client rule sheet and re-fingerprints them.
    pub fn with_client_rules_csv(self, path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let file = File::open(path.as_ref())?;
        self.with_client_rules_reader(BufReader::new(file))
    }

    pub fn with_client_rules_reader<R: Read>(self, reader: R) -> Result<Self, ImportError> {
        let Self { snapshot, origin } = self;
        let mut tables = snapshot.tables;
        import::apply_client_rules(&mut tables, reader)?;
        Ok(Self::new(tables, origin))
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

impl RuleSource for LoadedRuleSource {
    fn kind(&self) -> RuleSourceKind {
        RuleSourceKind::Loaded
    }

    fn snapshot(&self) -> &RuleSnapshot {
        &self.snapshot
    }
}
