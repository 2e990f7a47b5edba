//! CLI commands

mod changelog;
mod init;
mod parse;
mod version;

pub use changelog::ChangelogCommand;
pub use init::InitCommand;
pub use parse::ParseCommand;
pub use version::VersionCommand;
