//! Commit message parsing

mod conventional;

pub use conventional::ConventionalParser;
