//! Iterative depth-first directory traversal feeding the matcher.

use std::fs;
use std::path::Path;

use super::sink::EventSink;
use super::{matcher, CancelFlag, MatchResult, SearchEvent, SearchOutcome};

/// Walks a directory tree depth-first, classifying every regular file
/// against the keyword and emitting one event per match.
///
/// Traversal uses an explicit work stack of pending directories instead of
/// call recursion, so the walk depth is bounded by the work list rather than
/// the thread's call stack. Unreadable directories are treated as empty and
/// unreadable files as non-matches; nothing a single entry does can abort
/// the walk.
///
/// Symlinks (to files or directories) are skipped outright, which also makes
/// the walk immune to symlink cycles.
pub struct Walker {
    keyword: String,
}

impl Walker {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
        }
    }

    /// Runs the walk to completion or until the cancellation flag is
    /// observed. The flag is checked once per entry, so cancellation takes
    /// effect before the next file or directory is visited, never mid-read.
    ///
    /// Match events are emitted into the sink in discovery order; the
    /// returned outcome tells the session how to terminate the stream.
    pub fn run(&self, root: &Path, sink: &impl EventSink, cancel: &CancelFlag) -> SearchOutcome {
        // Emitted paths are absolute as long as the root is; a relative root
        // is resolved here once rather than per entry.
        let root = root
            .canonicalize()
            .unwrap_or_else(|_| root.to_path_buf());

        tracing::info!("Starting walk at {:?} for keyword {:?}", root, self.keyword);

        let mut files_visited: usize = 0;
        let mut matches_found: usize = 0;
        let mut pending = vec![root];

        while let Some(dir) = pending.pop() {
            if cancel.is_cancelled() {
                tracing::info!("Walk cancelled after {} files", files_visited);
                return SearchOutcome::Cancelled;
            }

            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    // Permission error or a race with deletion: treat the
                    // directory as having no entries.
                    tracing::debug!("Skipping unreadable directory {:?}: {}", dir, e);
                    continue;
                }
            };

            let mut subdirs = Vec::new();
            for entry in entries.filter_map(Result::ok) {
                if cancel.is_cancelled() {
                    tracing::info!("Walk cancelled after {} files", files_visited);
                    return SearchOutcome::Cancelled;
                }

                let file_type = match entry.file_type() {
                    Ok(file_type) => file_type,
                    Err(_) => continue,
                };

                if file_type.is_dir() {
                    subdirs.push(entry.path());
                } else if file_type.is_file() {
                    files_visited += 1;
                    let path = entry.path();
                    if let Some(kind) = matcher::classify(&path, &self.keyword) {
                        matches_found += 1;
                        sink.send(SearchEvent::Match(MatchResult { path, kind }));
                    }
                }
                // Symlinks and other special entries fall through untouched.
            }

            // Reversed so the stack pops subdirectories in enumeration
            // order, each subtree fully visited before its next sibling.
            pending.extend(subdirs.into_iter().rev());
        }

        tracing::info!(
            "Walk complete: {} files visited, {} matches",
            files_visited,
            matches_found
        );
        SearchOutcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sink::test_support::RecordingSink;
    use crate::core::MatchKind;
    use crate::utils::test_helpers::setup_test_logging;
    use std::collections::HashSet;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn run_walker(root: &Path, keyword: &str) -> (Vec<MatchResult>, SearchOutcome) {
        let sink = RecordingSink::new();
        let outcome = Walker::new(keyword).run(root, &sink, &CancelFlag::new());
        (sink.matches(), outcome)
    }

    fn canonical_root(dir: &TempDir) -> PathBuf {
        dir.path().canonicalize().unwrap()
    }

    #[test]
    fn empty_directory_completes_without_matches() {
        setup_test_logging();
        let dir = tempdir().unwrap();

        let (matches, outcome) = run_walker(dir.path(), "keyword");
        assert!(matches.is_empty());
        assert_eq!(outcome, SearchOutcome::Completed);
    }

    #[test]
    fn finds_name_and_content_matches_across_the_tree() {
        setup_test_logging();
        let dir = tempdir().unwrap();
        let root = canonical_root(&dir);
        write_file(&root, "report-keyword.txt", "irrelevant");
        write_file(&root, "sub/notes.txt", "the keyword is here\n");
        write_file(&root, "sub/other.txt", "nothing\n");

        let (matches, outcome) = run_walker(&root, "keyword");
        assert_eq!(outcome, SearchOutcome::Completed);

        let by_path: Vec<(PathBuf, MatchKind)> =
            matches.into_iter().map(|m| (m.path, m.kind)).collect();
        assert_eq!(by_path.len(), 2);
        assert!(by_path.contains(&(root.join("report-keyword.txt"), MatchKind::Name)));
        assert!(by_path.contains(&(root.join("sub/notes.txt"), MatchKind::Content)));
    }

    #[test]
    fn match_found_regardless_of_depth() {
        setup_test_logging();
        let dir = tempdir().unwrap();
        let root = canonical_root(&dir);
        let target = write_file(&root, "a/b/target-keyword.txt", "");

        let (matches, outcome) = run_walker(&root, "keyword");
        assert_eq!(outcome, SearchOutcome::Completed);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, target);
        assert_eq!(matches[0].kind, MatchKind::Name);
    }

    #[test]
    fn file_matching_name_and_content_reported_once_as_name() {
        setup_test_logging();
        let dir = tempdir().unwrap();
        let root = canonical_root(&dir);
        write_file(&root, "keyworddata.txt", "keyword in content too\n");

        let (matches, outcome) = run_walker(&root, "keyword");
        assert_eq!(outcome, SearchOutcome::Completed);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].kind, MatchKind::Name);
    }

    #[test]
    fn subtree_visited_before_sibling_directory() {
        setup_test_logging();
        let dir = tempdir().unwrap();
        let root = canonical_root(&dir);
        // Forced order: files of a directory come before its subtrees, and
        // a subtree is exhausted before the walk continues elsewhere.
        write_file(&root, "a/inner/deep-keyword.txt", "");
        write_file(&root, "a/shallow-keyword.txt", "");

        let (matches, outcome) = run_walker(&root, "keyword");
        assert_eq!(outcome, SearchOutcome::Completed);
        let paths: Vec<PathBuf> = matches.into_iter().map(|m| m.path).collect();
        assert_eq!(
            paths,
            vec![
                root.join("a/shallow-keyword.txt"),
                root.join("a/inner/deep-keyword.txt"),
            ]
        );
    }

    #[test]
    fn identical_runs_yield_identical_match_sets() {
        setup_test_logging();
        let dir = tempdir().unwrap();
        let root = canonical_root(&dir);
        write_file(&root, "one-keyword.txt", "");
        write_file(&root, "two.txt", "keyword\n");
        write_file(&root, "nested/three-keyword.log", "");

        let (first, _) = run_walker(&root, "keyword");
        let (second, _) = run_walker(&root, "keyword");
        let first: HashSet<PathBuf> = first.into_iter().map(|m| m.path).collect();
        let second: HashSet<PathBuf> = second.into_iter().map(|m| m.path).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn pre_set_cancellation_emits_nothing() {
        setup_test_logging();
        let dir = tempdir().unwrap();
        let root = canonical_root(&dir);
        write_file(&root, "match-keyword.txt", "");

        let sink = RecordingSink::new();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let outcome = Walker::new("keyword").run(&root, &sink, &cancel);

        assert_eq!(outcome, SearchOutcome::Cancelled);
        assert!(sink.events().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_does_not_abort_the_walk() {
        use std::os::unix::fs::PermissionsExt;

        setup_test_logging();
        if crate::utils::test_helpers::running_as_root() {
            // Root ignores directory permissions; nothing to verify.
            return;
        }

        let dir = tempdir().unwrap();
        let root = canonical_root(&dir);
        write_file(&root, "visible-keyword.txt", "");
        let locked = root.join("locked");
        write_file(&locked, "hidden-keyword.txt", "");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let (matches, outcome) = run_walker(&root, "keyword");

        // Restore permissions so the tempdir can be cleaned up.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(outcome, SearchOutcome::Completed);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, root.join("visible-keyword.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn directory_symlinks_are_skipped() {
        setup_test_logging();
        let dir = tempdir().unwrap();
        let root = canonical_root(&dir);
        write_file(&root, "real/found-keyword.txt", "");
        // A cycle back to the root; following it would walk forever.
        std::os::unix::fs::symlink(&root, root.join("real/loop")).unwrap();

        let (matches, outcome) = run_walker(&root, "keyword");
        assert_eq!(outcome, SearchOutcome::Completed);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, root.join("real/found-keyword.txt"));
    }
}
