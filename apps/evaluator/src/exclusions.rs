//! Exclusion-Set Loader — emails to leave out of a run.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::candidate::{normalize_email, Candidate};

/// Normalized (trimmed, lower-cased) email addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    emails: HashSet<String>,
}

impl ExclusionSet {
    /// One address per line; blank lines and lines without `@` are ignored.
    pub fn parse(content: &str) -> Self {
        let emails = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && line.contains('@'))
            .map(normalize_email)
            .collect();
        Self { emails }
    }

    pub fn from_emails<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails.into_iter().map(|e| normalize_email(e.as_ref())).collect(),
        }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&normalize_email(email))
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    /// Keeps only candidates not in the set; returns how many were dropped.
    pub fn retain_unlisted(&self, candidates: &mut Vec<Candidate>) -> usize {
        let before = candidates.len();
        candidates.retain(|c| !self.contains(&c.email));
        before - candidates.len()
    }

    /// Sorted, newline-delimited rendering for writing back to disk.
    pub fn to_file_contents(&self) -> String {
        let mut emails: Vec<&str> = self.emails.iter().map(String::as_str).collect();
        emails.sort_unstable();
        emails.join("\n")
    }
}

/// Loads the exclusion file. `Ok(None)` when the file does not exist, in
/// which case the full eligible set is used.
pub fn load_exclusions(path: &Path) -> Result<Option<ExclusionSet>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read exclusion file {}", path.display()))?;
    Ok(Some(ExclusionSet::parse(&content)))
}
