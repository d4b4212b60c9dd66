use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::contest::Contest;
use crate::store::{read_document, try_read_document, write_document, StorageBackend};

pub const SOLUTIONS_KEY: &str = "contestSolutions";

/// Why an admin submission was not saved.
#[derive(Debug, Error)]
pub enum SolutionLinkError {
    #[error("Please select a contest")]
    MissingContestId,
    #[error("Please enter a valid URL")]
    InvalidUrl,
    #[error("URL must be from YouTube")]
    NotYoutube,
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl SolutionLinkError {
    pub fn is_validation(&self) -> bool {
        !matches!(self, SolutionLinkError::Storage(_))
    }
}

/// Admin form payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionLinkForm {
    pub contest_id: String,
    pub solution_url: String,
}

impl SolutionLinkForm {
    /// The url must parse as an absolute URL and contain `youtube.com` or
    /// `youtu.be` anywhere (substring, not a host check).
    pub fn validate(&self) -> Result<(), SolutionLinkError> {
        if self.contest_id.trim().is_empty() {
            return Err(SolutionLinkError::MissingContestId);
        }
        let url = self.solution_url.trim();
        if reqwest::Url::parse(url).is_err() {
            return Err(SolutionLinkError::InvalidUrl);
        }
        if !(url.contains("youtube.com") || url.contains("youtu.be")) {
            return Err(SolutionLinkError::NotYoutube);
        }
        Ok(())
    }
}

/// Contest id → solution url. `set` overwrites; entries are never deleted.
pub struct SolutionLinkStore {
    backend: Arc<dyn StorageBackend>,
    write_lock: Mutex<()>,
}

impl SolutionLinkStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    pub fn get(&self, contest_id: &str) -> Option<String> {
        self.all().remove(contest_id)
    }

    /// Like [`get`](Self::get), but a storage load error is returned rather
    /// than read as "no link".
    pub fn try_get(&self, contest_id: &str) -> Result<Option<String>> {
        Ok(self.try_all()?.remove(contest_id))
    }

    pub fn set(&self, contest_id: &str, url: &str) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut all = self.try_all()?;
        all.insert(contest_id.to_string(), url.to_string());
        write_document(self.backend.as_ref(), SOLUTIONS_KEY, &all)?;
        tracing::info!(target: "store", contest_id, "solution link saved");
        Ok(())
    }

    /// Validate and save an admin submission; an invalid form leaves the
    /// store untouched.
    pub fn submit(&self, form: &SolutionLinkForm) -> Result<(), SolutionLinkError> {
        form.validate()?;
        self.set(form.contest_id.trim(), form.solution_url.trim())?;
        Ok(())
    }

    pub fn all(&self) -> BTreeMap<String, String> {
        read_document(self.backend.as_ref(), SOLUTIONS_KEY)
    }

    pub fn try_all(&self) -> Result<BTreeMap<String, String>> {
        try_read_document(self.backend.as_ref(), SOLUTIONS_KEY)
    }

    /// Copy of `contest` with its stored link attached.
    pub fn resolve(&self, contest: &Contest) -> Contest {
        contest.with_solution_link(self.get(&contest.id))
    }

    /// Resolve many contests against a single read of the document.
    pub fn resolve_all(&self, contests: &[Contest]) -> Vec<Contest> {
        let links = self.all();
        contests
            .iter()
            .map(|c| c.with_solution_link(links.get(&c.id).cloned()))
            .collect()
    }
}
