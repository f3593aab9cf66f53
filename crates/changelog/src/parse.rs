//! Changelog parsing with exact round trip

use debforge_errors::ChangelogError;
use serde::{Deserialize, Serialize};

use crate::entry::ChangelogEntry;

/// One release block with its original text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogBlock {
    package: String,
    version: String,
    distributions: Vec<String>,
    urgency: Option<String>,
    author: String,
    date: String,
    raw: String,
}

impl ChangelogBlock {
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn distributions(&self) -> &[String] {
        &self.distributions
    }

    #[must_use]
    pub fn urgency(&self) -> Option<&str> {
        self.urgency.as_deref()
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Trailer date exactly as written
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Block text from its header up to the next header
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl From<&ChangelogEntry> for ChangelogBlock {
    fn from(entry: &ChangelogEntry) -> Self {
        Self {
            package: entry.package.clone(),
            version: entry.version.clone(),
            distributions: vec![entry.distribution.clone()],
            urgency: Some(entry.urgency.clone()),
            author: entry.author.clone(),
            date: entry.date(),
            raw: entry.render(),
        }
    }
}

/// Parsed changelog, newest block first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changelog {
    /// Blank lines before the first header
    preamble: String,
    blocks: Vec<ChangelogBlock>,
    /// Editor footer or `Old Changelog:` section after the last block
    #[serde(default)]
    epilogue: String,
}

struct Header {
    package: String,
    version: String,
    distributions: Vec<String>,
    urgency: Option<String>,
}

/// Partially read block: header, header line number, text so far, trailer
type OpenBlock = (Header, usize, String, Option<(String, String)>);

impl Changelog {
    /// Parse changelog text
    ///
    /// Every non-blank line that starts in the first column must be a block
    /// header, and every block must end in a ` -- author  date` trailer. A
    /// `Local variables:` or `Old Changelog:` line ends the blocks; it and
    /// everything after it is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns a [`ChangelogError`] if the text holds no blocks or a header or
    /// trailer line is malformed.
    pub fn parse(text: &str) -> Result<Self, ChangelogError> {
        let mut preamble = String::new();
        let mut blocks = Vec::new();
        let mut current: Option<OpenBlock> = None;
        let mut epilogue = String::new();
        let mut offset = 0;

        for (index, line) in text.split_inclusive('\n').enumerate() {
            let number = index + 1;
            let start = offset;
            offset += line.len();
            let content = line.trim_end_matches(['\n', '\r']);

            let starts_block = !content.trim().is_empty()
                && !content.starts_with(char::is_whitespace);

            if starts_block && is_epilogue_start(content) {
                epilogue = text[start..].to_string();
                break;
            }

            if starts_block {
                let header =
                    parse_header(content).ok_or_else(|| ChangelogError::MalformedHeader {
                        line: number,
                        content: content.to_string(),
                    })?;
                if let Some(open) = current.take() {
                    blocks.push(close_block(open)?);
                }
                current = Some((header, number, line.to_string(), None));
                continue;
            }

            match current.as_mut() {
                Some((_, _, raw, trailer)) => {
                    raw.push_str(line);
                    if content.starts_with(" --") {
                        *trailer = Some(parse_trailer(content).ok_or_else(|| {
                            ChangelogError::MalformedTrailer {
                                line: number,
                                content: content.to_string(),
                            }
                        })?);
                    }
                }
                None => preamble.push_str(line),
            }
        }

        if let Some(open) = current.take() {
            blocks.push(close_block(open)?);
        }

        if blocks.is_empty() {
            return Err(ChangelogError::Empty);
        }

        Ok(Self {
            preamble,
            blocks,
            epilogue,
        })
    }

    /// Serialize back to text
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = self.preamble.clone();
        for block in &self.blocks {
            text.push_str(&block.raw);
        }
        text.push_str(&self.epilogue);
        text
    }

    /// Add a release as the newest block
    pub fn add_entry(&mut self, entry: &ChangelogEntry) {
        self.blocks.insert(0, ChangelogBlock::from(entry));
    }

    #[must_use]
    pub fn blocks(&self) -> &[ChangelogBlock] {
        &self.blocks
    }

    /// Trailing text after the last block, empty when there is none
    #[must_use]
    pub fn epilogue(&self) -> &str {
        &self.epilogue
    }

    /// The newest block
    #[must_use]
    pub fn latest(&self) -> Option<&ChangelogBlock> {
        self.blocks.first()
    }

    /// Package name of the newest block
    #[must_use]
    pub fn package(&self) -> Option<&str> {
        self.latest().map(ChangelogBlock::package)
    }

    /// Version of the newest block
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.latest().map(ChangelogBlock::version)
    }
}

fn close_block(
    (header, line, raw, trailer): OpenBlock,
) -> Result<ChangelogBlock, ChangelogError> {
    let (author, date) = trailer.ok_or(ChangelogError::MissingTrailer { line })?;
    Ok(ChangelogBlock {
        package: header.package,
        version: header.version,
        distributions: header.distributions,
        urgency: header.urgency,
        author,
        date,
        raw,
    })
}

// Emacs local variables footer, optionally `;;` prefixed, or old-format history
fn is_epilogue_start(line: &str) -> bool {
    let line = line.strip_prefix(";;").map_or(line, str::trim_start);
    let lower = line.to_ascii_lowercase();
    lower.starts_with("local variables:") || lower.starts_with("old changelog:")
}

// package (version) dist [dist...]; key=value[, key=value...]
fn parse_header(line: &str) -> Option<Header> {
    let (package, rest) = line.split_once(" (")?;
    if package.is_empty() || package.contains(char::is_whitespace) {
        return None;
    }

    let (version, rest) = rest.split_once(')')?;
    if version.trim().is_empty() {
        return None;
    }

    let (dists, metadata) = rest.split_once(';')?;
    let distributions: Vec<String> = dists.split_whitespace().map(str::to_string).collect();
    if distributions.is_empty() {
        return None;
    }

    let urgency = metadata
        .split(',')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.eq_ignore_ascii_case("urgency"))
        .map(|(_, value)| value.to_string());

    Some(Header {
        package: package.to_string(),
        version: version.to_string(),
        distributions,
        urgency,
    })
}

//  -- author  date
fn parse_trailer(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix(" -- ")?;
    let (author, date) = rest.split_once("  ")?;
    let (author, date) = (author.trim(), date.trim());
    if author.is_empty() || date.is_empty() {
        return None;
    }
    Some((author.to_string(), date.to_string()))
}
