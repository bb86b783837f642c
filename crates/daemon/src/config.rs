// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The configuration collaborator: the repository registry.
//!
//! Persisted as TOML under the per-user config directory, written
//! atomically. The registry is the primary way the daemon learns which
//! repository to supervise; the cwd upward walk is a fallback for
//! running against an unregistered checkout.

use std::path::{Path, PathBuf};

use nv_core::{ErrorKind, RepoRecord};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Registry file name inside the config dir.
const REGISTRY_FILE: &str = "repos.toml";

/// Errors from registry operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("repository {id} not found")]
    NotFound { id: String },

    #[error("{path} is not a valid repository (no plan/task.json)")]
    NotARepo { path: PathBuf },

    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("registry is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("registry serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::NotFound { .. } => ErrorKind::NotFound,
            ConfigError::NotARepo { .. } => ErrorKind::Validation,
            ConfigError::Io(_) | ConfigError::Parse(_) | ConfigError::Serialize(_) => {
                ErrorKind::External
            }
        }
    }
}

// `active` precedes `repos`: TOML requires scalar values before
// arrays of tables, and serialization follows field order.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active: Option<String>,
    #[serde(default)]
    repos: Vec<RepoRecord>,
}

/// On-disk repository registry.
pub struct RepoRegistry {
    path: PathBuf,
    data: RegistryData,
}

impl RepoRegistry {
    /// Load the registry from `config_dir`, starting empty if absent.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(REGISTRY_FILE);
        let data = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => RegistryData::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, data })
    }

    pub fn list(&self) -> &[RepoRecord] {
        &self.data.repos
    }

    pub fn active_id(&self) -> Option<&str> {
        self.data.active.as_deref()
    }

    pub fn active(&self) -> Option<&RepoRecord> {
        let id = self.data.active.as_deref()?;
        self.data.repos.iter().find(|r| r.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&RepoRecord> {
        self.data.repos.iter().find(|r| r.id == id)
    }

    /// Register a repository. The first registered repository becomes
    /// active. Re-adding a known path returns the existing record.
    pub fn add(&mut self, path: &Path) -> Result<RepoRecord, ConfigError> {
        let resolved = path.canonicalize().map_err(|_| ConfigError::NotARepo {
            path: path.to_path_buf(),
        })?;
        if !resolved.join(nv_core::repo::TASK_FILE).exists() {
            return Err(ConfigError::NotARepo { path: resolved });
        }
        if let Some(existing) = self.data.repos.iter().find(|r| r.path == resolved) {
            return Ok(existing.clone());
        }
        let record = RepoRecord::new(nanoid::nanoid!(8), resolved);
        self.data.repos.push(record.clone());
        if self.data.active.is_none() {
            self.data.active = Some(record.id.clone());
        }
        self.save()?;
        Ok(record)
    }

    /// Drop a repository from the registry; clears active if it pointed
    /// there.
    pub fn remove(&mut self, id: &str) -> Result<(), ConfigError> {
        let before = self.data.repos.len();
        self.data.repos.retain(|r| r.id != id);
        if self.data.repos.len() == before {
            return Err(ConfigError::NotFound { id: id.to_string() });
        }
        if self.data.active.as_deref() == Some(id) {
            self.data.active = self.data.repos.first().map(|r| r.id.clone());
        }
        self.save()
    }

    /// Make `id` the active repository.
    pub fn switch(&mut self, id: &str) -> Result<RepoRecord, ConfigError> {
        let record = self
            .get(id)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound { id: id.to_string() })?;
        self.data.active = Some(record.id.clone());
        self.save()?;
        Ok(record)
    }

    /// Atomic write: temp file in the same directory, then rename.
    fn save(&self) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(&self.data)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension(format!("tmp.{}", std::process::id()));
        std::fs::write(&tmp, content)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Whether `path` is a usable repository, and how many tasks it holds.
pub fn validate_repository(path: &Path) -> (bool, usize) {
    let task_file = path.join(nv_core::repo::TASK_FILE);
    let Ok(content) = std::fs::read_to_string(&task_file) else {
        return (false, 0);
    };
    match serde_json::from_str::<Vec<nv_core::Task>>(&content) {
        Ok(tasks) => (true, tasks.len()),
        Err(e) => {
            warn!(path = %task_file.display(), error = %e, "task file does not parse");
            (false, 0)
        }
    }
}

/// Fallback repository detection: walk up from `start` looking for a
/// directory containing `plan/task.json`. Used only when the registry
/// names no active repository.
pub fn detect_repository(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(nv_core::repo::TASK_FILE).is_file() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
