use thiserror::Error;

/// A ban-list split into its header line and its entry lines.
///
/// Only [`parse_payload`] builds one, so a `ParsedList` always has a header
/// and at least one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedList {
    header: String,
    entries: Vec<String>,
}

impl ParsedList {
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.header, self.entries)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("ban-list is empty ({lines} usable line(s), need a header and at least one entry)")]
    Empty { lines: usize },
}

/// Split a raw payload into header and entries.
///
/// Lines end at `\n` with an optional preceding `\r`. Trailing empty lines are
/// dropped before counting; blank lines in the middle are kept as entries.
pub fn parse_payload(payload: &str) -> Result<ParsedList, ParseError> {
    let mut lines: Vec<&str> = payload.lines().collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    if lines.len() < 2 {
        return Err(ParseError::Empty { lines: lines.len() });
    }

    let mut lines = lines.into_iter().map(str::to_owned);
    let header = lines.next().unwrap_or_default();
    Ok(ParsedList {
        header,
        entries: lines.collect(),
    })
}
