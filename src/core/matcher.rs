//! Classifies a single file against the search keyword.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{file_name_str, MatchKind};

/// Decides whether a file matches the keyword, and how.
///
/// The filename is checked first; a name match suppresses the content check
/// entirely, so a file never yields more than one match. Otherwise the file
/// is read line by line and the first line containing the keyword (as a
/// case-sensitive literal substring) wins, short-circuiting the rest of the
/// file.
///
/// Files that cannot be opened or decoded classify as no match. This is the
/// engine's tolerance policy: one unreadable file must not abort a search of
/// a large tree, so read errors are swallowed here rather than surfaced.
pub fn classify(path: &Path, keyword: &str) -> Option<MatchKind> {
    if file_name_str(path).contains(keyword) {
        return Some(MatchKind::Name);
    }

    if content_contains(path, keyword) {
        return Some(MatchKind::Content);
    }

    None
}

/// Line-oriented scan for the keyword. Any I/O or decoding error ends the
/// scan as "no match"; the file handle closes on every exit path.
fn content_contains(path: &Path, keyword: &str) -> bool {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!("Skipping unreadable file {:?}: {}", path, e);
            return false;
        }
    };

    for line in BufReader::new(file).lines() {
        match line {
            Ok(line) if line.contains(keyword) => return true,
            Ok(_) => continue,
            // Undecodable bytes or a read failure mid-file: treat the rest
            // of the file as unreadable.
            Err(e) => {
                tracing::debug!("Stopping content scan of {:?}: {}", path, e);
                return false;
            }
        }
    }

    false
}
