//! Commit history operations and the local repository provider

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use git2::Oid;
use tracing::{debug, info};

use markline_core::HistoryError;

use crate::pager::{page_offset, HistoryPager, Result};
use crate::repository::GitRepo;
use crate::types::CommitInfo;

impl GitRepo {
    /// Resolve a branch, tag or hash to a commit id; `None` means HEAD
    pub fn resolve_revision(&self, revision: Option<&str>) -> Result<Oid> {
        match revision {
            Some(rev) => {
                let object = self.repo.revparse_single(rev).map_err(|e| {
                    if e.code() == git2::ErrorCode::NotFound {
                        HistoryError::RevisionNotFound(rev.to_string())
                    } else {
                        HistoryError::Git2(e)
                    }
                })?;
                Ok(object.peel_to_commit()?.id())
            }
            None => Ok(self.repo.head()?.peel_to_commit()?.id()),
        }
    }
}

/// Convert a git2 signature time to UTC
fn to_utc(time: git2::Time) -> DateTime<Utc> {
    Utc.timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Convert a git2 Commit to CommitInfo
fn commit_to_info(commit: &git2::Commit<'_>) -> CommitInfo {
    let author = commit.author();
    let committer = commit.committer();
    let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();

    CommitInfo::new(
        commit.id().to_string(),
        message,
        author.name().unwrap_or("Unknown"),
        author.email().unwrap_or("unknown@example.com"),
        to_utc(author.when()),
    )
    .with_committer(
        committer.name().unwrap_or("Unknown"),
        committer.email().unwrap_or("unknown@example.com"),
        to_utc(committer.when()),
    )
}

/// First-parent chain from the start revision, discovered as pages ask for it
struct FirstParentWalk {
    repo: GitRepo,
    revision: Option<String>,
    oids: Vec<Oid>,
    started: bool,
    finished: bool,
}

impl FirstParentWalk {
    /// Follow first parents until `len` commits are known or the root is reached
    fn extend_to(&mut self, len: usize) -> Result<()> {
        if !self.started {
            if self.repo.is_empty()? {
                self.finished = true;
            } else {
                let start = self.repo.resolve_revision(self.revision.as_deref())?;
                self.oids.push(start);
            }
            self.started = true;
        }

        while !self.finished && self.oids.len() < len {
            let Some(&last) = self.oids.last() else {
                self.finished = true;
                break;
            };
            match self.repo.repo.find_commit(last)?.parent_ids().next() {
                Some(parent) => self.oids.push(parent),
                None => self.finished = true,
            }
        }

        Ok(())
    }

    fn page(&mut self, skip: usize, take: usize) -> Result<Vec<CommitInfo>> {
        self.extend_to(skip.saturating_add(take))?;

        self.oids
            .iter()
            .skip(skip)
            .take(take)
            .map(|oid| -> Result<CommitInfo> {
                Ok(commit_to_info(&self.repo.repo.find_commit(*oid)?))
            })
            .collect()
    }
}

/// History provider reading a local repository.
///
/// The first-parent chain is followed once, lazily; later pages continue
/// from where the previous one stopped. Reads run on the blocking pool.
pub struct LocalHistory {
    walk: Arc<Mutex<FirstParentWalk>>,
    revision: Option<String>,
}

impl LocalHistory {
    /// Read history from HEAD of an opened repository
    pub fn new(repo: GitRepo) -> Self {
        info!(path = %repo.path().display(), "local history source created");
        Self::with_start(repo, None)
    }

    /// Read history from a branch, tag or commit instead of HEAD
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        let revision = revision.into();
        if let Ok(mut walk) = self.walk.lock() {
            walk.revision = Some(revision.clone());
            walk.oids.clear();
            walk.started = false;
            walk.finished = false;
        }
        self.revision = Some(revision);
        self
    }

    fn with_start(repo: GitRepo, revision: Option<String>) -> Self {
        Self {
            walk: Arc::new(Mutex::new(FirstParentWalk {
                repo,
                revision: revision.clone(),
                oids: Vec::new(),
                started: false,
                finished: false,
            })),
            revision,
        }
    }

    /// Number of commits discovered on the first-parent chain so far
    pub fn walked(&self) -> usize {
        self.walk.lock().map(|walk| walk.oids.len()).unwrap_or_default()
    }
}

#[async_trait]
impl HistoryPager for LocalHistory {
    fn name(&self) -> &str {
        "local"
    }

    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<CommitInfo>> {
        debug!(page, per_page, revision = ?self.revision, "loading page of local history");

        let walk = Arc::clone(&self.walk);
        let (skip, take) = (page_offset(page, per_page), per_page as usize);

        tokio::task::spawn_blocking(move || -> Result<Vec<CommitInfo>> {
            let mut walk = walk
                .lock()
                .map_err(|_| HistoryError::OpenFailed("repository lock poisoned".to_string()))?;
            walk.page(skip, take)
        })
        .await
        .map_err(|e| HistoryError::Task(e.to_string()))?
    }
}
