//! High score list
//!
//! Persisted as plain text, one decimal integer per line, top 5 kept.

use std::fs;
use std::path::Path;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// Top scores, highest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScores {
    pub entries: Vec<u32>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary scores, sorted and trimmed
    pub fn from_scores(scores: impl IntoIterator<Item = u32>) -> Self {
        let mut entries: Vec<u32> = scores.into_iter().collect();
        entries.sort_unstable_by(|a, b| b.cmp(a));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Insert a finished session's score.
    /// Returns the rank achieved (1-indexed) or None if it fell off the list.
    pub fn add_score(&mut self, score: u32) -> Option<usize> {
        // Ties rank below existing entries
        let pos = self
            .entries
            .iter()
            .position(|&e| score > e)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, score);
        self.entries.truncate(MAX_HIGH_SCORES);
        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().copied()
    }

    /// Parse the line format. Unparseable lines are skipped.
    pub fn parse(text: &str) -> Self {
        let scores = text.lines().filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            match line.parse::<u32>() {
                Ok(score) => Some(score),
                Err(_) => {
                    log::warn!("Ignoring malformed high score line: {line:?}");
                    None
                }
            }
        });
        Self::from_scores(scores)
    }

    /// One score per line, trailing newline included
    pub fn to_text(&self) -> String {
        self.entries.iter().map(|score| format!("{score}\n")).collect()
    }

    /// Load from `path`. A missing or unreadable file is an empty list.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => {
                let scores = Self::parse(&text);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not read high scores from {}: {e}", path.display());
                Self::new()
            }
        }
    }

    /// Overwrite `path` with the current list. Failures are logged only.
    pub fn save(&self, path: &Path) {
        match fs::write(path, self.to_text()) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Could not write high scores to {}: {e}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("endless_runner_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_insert_into_file_list() {
        let path = temp_path("scores_insert.txt");
        fs::write(&path, "10\n7\n3\n").unwrap();

        let mut scores = HighScores::load(&path);
        assert_eq!(scores.add_score(8), Some(2));
        scores.save(&path);

        assert_eq!(fs::read_to_string(&path).unwrap(), "10\n8\n7\n3\n");
        assert_eq!(HighScores::load(&path).entries, vec![10, 8, 7, 3]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let scores = HighScores::load(&temp_path("does_not_exist.txt"));
        assert!(scores.is_empty());
        assert_eq!(scores.top_score(), None);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let scores = HighScores::parse("4\nabc\n\n9\n-1\n");
        assert_eq!(scores.entries, vec![9, 4]);
    }

    #[test]
    fn test_full_list_drops_lowest() {
        let mut scores = HighScores::from_scores([50, 40, 30, 20, 10]);
        assert_eq!(scores.add_score(5), None);
        assert_eq!(scores.entries, vec![50, 40, 30, 20, 10]);
        assert_eq!(scores.add_score(45), Some(2));
        assert_eq!(scores.entries, vec![50, 45, 40, 30, 20]);
        assert_eq!(scores.top_score(), Some(50));
    }

    #[test]
    fn test_save_to_bad_path_is_silent() {
        let scores = HighScores::from_scores([1]);
        scores.save(Path::new("/nonexistent_dir/for/sure/scores.txt"));
    }

    proptest! {
        #[test]
        fn prop_add_matches_sorted_prefix(
            old in prop::collection::vec(0u32..1000, 0..=5),
            new in 0u32..1000,
        ) {
            let mut scores = HighScores::from_scores(old.clone());
            let before = scores.entries.clone();
            scores.add_score(new);

            let mut expected = before;
            expected.push(new);
            expected.sort_unstable_by(|a, b| b.cmp(a));
            expected.truncate(MAX_HIGH_SCORES);

            prop_assert_eq!(&scores.entries, &expected);
            prop_assert!(scores.entries.len() <= MAX_HIGH_SCORES);
            prop_assert!(scores.entries.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
