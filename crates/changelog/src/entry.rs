//! New release entries

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// RFC 2822 date as written in changelog trailers
pub const CHANGELOG_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// A release about to be added to a changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub package: String,
    pub version: String,
    pub distribution: String,
    pub urgency: String,
    /// `Full Name <email>`
    pub author: String,
    pub timestamp: DateTime<FixedOffset>,
    /// One bullet per item
    pub changes: Vec<String>,
}

impl ChangelogEntry {
    /// Trailer date string
    #[must_use]
    pub fn date(&self) -> String {
        self.timestamp.format(CHANGELOG_DATE_FORMAT).to_string()
    }

    /// Render as a complete block, including the blank separator line
    #[must_use]
    pub fn render(&self) -> String {
        let mut block = format!(
            "{} ({}) {}; urgency={}\n\n",
            self.package, self.version, self.distribution, self.urgency
        );
        for change in &self.changes {
            let _ = writeln!(block, "  * {change}");
        }
        let _ = write!(block, "\n -- {}  {}\n\n", self.author, self.date());
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> ChangelogEntry {
        ChangelogEntry {
            package: "hello".to_string(),
            version: "1.0+abc123-1".to_string(),
            distribution: "unstable".to_string(),
            urgency: "low".to_string(),
            author: "Builder <builder@example.org>".to_string(),
            timestamp: FixedOffset::east_opt(2 * 3600)
                .unwrap()
                .with_ymd_and_hms(2024, 3, 5, 14, 7, 9)
                .unwrap(),
            changes: vec!["Automated build".to_string()],
        }
    }

    #[test]
    fn renders_debian_block() {
        assert_eq!(
            sample().render(),
            "hello (1.0+abc123-1) unstable; urgency=low\n\
             \n\
             \x20 * Automated build\n\
             \n\
             \x20-- Builder <builder@example.org>  Tue, 05 Mar 2024 14:07:09 +0200\n\
             \n"
        );
    }

    #[test]
    fn date_keeps_offset() {
        let mut entry = sample();
        entry.timestamp = FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 12, 31, 23, 0, 0)
            .unwrap();
        assert_eq!(entry.date(), "Tue, 31 Dec 2024 23:00:00 -0500");
    }
}
