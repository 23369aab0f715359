//! Discovery of ReviewBoard requests referenced by commit messages.

use regex::Regex;
use tracing::debug;

use crate::error::PushError;
use crate::vcs::VersionControl;

const REVIEW_MARKER: &str = "Review: ";

/// A review to close, paired with the commit log that closes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: String,
    pub commit_log: String,
}

/// Recognises `Review: <server>/r/<id>` at the end of a commit log.
#[derive(Debug, Clone)]
pub struct ReviewMatcher {
    pattern: Regex,
}

impl ReviewMatcher {
    pub fn new(reviewboard_url: &str) -> Result<Self, PushError> {
        let base = regex::escape(reviewboard_url.trim_end_matches('/'));
        let pattern = Regex::new(&format!("{REVIEW_MARKER}({base}/r/[0-9]+)$"))?;
        Ok(Self { pattern })
    }

    /// `Ok(None)` for logs without the marker; an error when the marker
    /// is present but the URL does not have the expected shape.
    pub fn parse(&self, commit_log: &str) -> Result<Option<Review>, PushError> {
        let Some(pos) = commit_log.find(REVIEW_MARKER) else {
            return Ok(None);
        };

        let trimmed = commit_log.trim().trim_end_matches('/');
        let url = self
            .pattern
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| PushError::InvalidReviewUrl(commit_log[pos..].to_string()))?;

        let id = url.rsplit('/').next().unwrap_or(url).to_string();
        Ok(Some(Review {
            id,
            commit_log: commit_log.to_string(),
        }))
    }
}

/// Scans `range` oldest first and collects every review it references.
pub fn discover_reviews<V: VersionControl + ?Sized>(
    vcs: &V,
    matcher: &ReviewMatcher,
    range: &str,
) -> Result<Vec<Review>, PushError> {
    let mut reviews = Vec::new();
    for rev in vcs.rev_list(range)? {
        let commit_log = vcs.show(&rev)?;
        if let Some(review) = matcher.parse(commit_log.trim())? {
            debug!(rev = %rev, review = %review.id, "found review");
            reviews.push(review);
        }
    }
    Ok(reviews)
}
