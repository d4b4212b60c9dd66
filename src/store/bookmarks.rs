use anyhow::Result;
use std::sync::{Arc, Mutex};

use crate::contest::Contest;
use crate::store::{read_document, try_read_document, write_document, StorageBackend};

pub const BOOKMARKS_KEY: &str = "bookmarkedContests";

/// Bookmarked contests, keyed by contest id, in insertion order.
pub struct BookmarkStore {
    backend: Arc<dyn StorageBackend>,
    write_lock: Mutex<()>,
}

impl BookmarkStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Add a copy of `contest`. Returns `false` (and writes nothing) when
    /// the id is already bookmarked.
    pub fn add(&self, contest: &Contest) -> Result<bool> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut all = self.try_list()?;
        if all.iter().any(|b| b.id == contest.id) {
            return Ok(false);
        }
        // bookmarks store the fetched contest, never a resolved link
        all.push(contest.with_solution_link(None));
        write_document(self.backend.as_ref(), BOOKMARKS_KEY, &all)?;
        tracing::debug!(target: "store", id = %contest.id, "bookmark added");
        Ok(true)
    }

    /// Remove by id. Returns `false` when nothing matched; the document is
    /// then left untouched.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut all = self.try_list()?;
        let before = all.len();
        all.retain(|b| b.id != id);
        if all.len() == before {
            return Ok(false);
        }
        write_document(self.backend.as_ref(), BOOKMARKS_KEY, &all)?;
        tracing::debug!(target: "store", id, "bookmark removed");
        Ok(true)
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.list().iter().any(|b| b.id == id)
    }

    pub fn list(&self) -> Vec<Contest> {
        rebuild(read_document(self.backend.as_ref(), BOOKMARKS_KEY))
    }

    /// Like [`list`](Self::list), but a storage load error is returned.
    pub fn try_list(&self) -> Result<Vec<Contest>> {
        Ok(rebuild(try_read_document(self.backend.as_ref(), BOOKMARKS_KEY)?))
    }
}

// stored documents may predate the duration invariant
fn rebuild(stored: Vec<Contest>) -> Vec<Contest> {
    stored
        .into_iter()
        .map(|c| Contest::new(c.id, c.name, c.platform, c.url, c.start_time, c.end_time))
        .collect()
}
