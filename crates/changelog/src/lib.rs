#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Debian changelog handling for debforge
//!
//! A changelog is an ordered list of release blocks, newest first. Parsing
//! keeps the exact text of every block so that rewriting the file after
//! adding a release changes nothing but the new block at the top.

mod entry;
mod parse;
mod store;

pub use entry::{ChangelogEntry, CHANGELOG_DATE_FORMAT};
pub use parse::{Changelog, ChangelogBlock};
pub use store::{ChangelogStore, FileChangelogStore};
