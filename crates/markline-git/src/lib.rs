//! Markline Git - commit history providers
//!
//! A history provider hands out raw commits in pages, newest first. This crate
//! defines the [`HistoryPager`] seam and ships providers for the GitHub REST
//! API, local repositories and in-memory history.

mod commits;
pub mod github;
mod memory;
mod pager;
mod repository;
pub mod types;

pub use commits::LocalHistory;
pub use github::{GitHubConfig, GitHubHistory};
pub use memory::MemoryHistory;
pub use pager::{HistoryPager, Result};
pub use repository::GitRepo;
pub use types::CommitInfo;
