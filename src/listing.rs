//! Parser for `ls --time-style=long-iso -l` output.
//!
//! ```text
//! total 12
//! drwxr-xr-x 2 alice staff 4096 2024-01-01 10:00 docs
//! -rw-r--r-- 1 alice staff  100 2024-01-01 10:00 my file.txt
//! ```

use serde::{Deserialize, Serialize};

/// Minimum column count of a well-formed long-format line.
const MIN_COLUMNS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// One line of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// File name, embedded spaces kept
    pub name: String,
    /// Permission string, e.g. `drwxr-xr-x`
    #[serde(rename = "rights")]
    pub permissions: String,
    /// Size column as printed
    pub size: String,
    /// `YYYY-MM-DD HH:MM:00`
    #[serde(rename = "date")]
    pub modified: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Parse a full listing, keeping the listing order. Header and malformed
/// lines are dropped.
pub fn parse_ls_output(output: &str) -> Vec<DirEntry> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<DirEntry> {
    if line.is_empty() || line.starts_with("total") {
        return None;
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < MIN_COLUMNS {
        return None;
    }

    // Names may contain spaces: take the line from the first name token on,
    // searching only past the time column.
    let mut cursor = 0;
    for token in &tokens[..7] {
        cursor += line[cursor..].find(*token)? + token.len();
    }
    let name_start = cursor + line[cursor..].find(tokens[7])?;
    let kind = if tokens[0].starts_with('d') {
        EntryKind::Dir
    } else {
        EntryKind::File
    };

    Some(DirEntry {
        name: line[name_start..].to_string(),
        permissions: tokens[0].to_string(),
        size: tokens[4].to_string(),
        modified: format!("{} {}:00", tokens[5], tokens[6]),
        kind,
    })
}
