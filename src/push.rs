//! Push a locally applied review chain and mark its reviews as submitted.

use colored::*;
use tracing::{debug, info};

use crate::config::PushConfig;
use crate::error::PushError;
use crate::review::{Review, ReviewMatcher, discover_reviews};
use crate::vcs::{ReviewClient, VersionControl};

const BRANCH_REF_PREFIX: &str = "refs/heads/";

pub struct Pusher<'a, V: ?Sized, R: ?Sized> {
    vcs: &'a V,
    review_client: &'a R,
    config: &'a PushConfig,
    dry_run: bool,
}

impl<'a, V, R> Pusher<'a, V, R>
where
    V: VersionControl + ?Sized,
    R: ReviewClient + ?Sized,
{
    pub fn new(vcs: &'a V, review_client: &'a R, config: &'a PushConfig, dry_run: bool) -> Self {
        Self {
            vcs,
            review_client,
            config,
            dry_run,
        }
    }

    /// Discovers, pushes and closes. Returns the reviews that were closed.
    pub fn run(&self) -> Result<Vec<Review>, PushError> {
        let branch = &self.config.integration_branch;

        let current_ref = self.vcs.current_branch_ref()?;
        let current_branch = current_ref
            .strip_prefix(BRANCH_REF_PREFIX)
            .unwrap_or(current_ref.as_str());
        if current_branch != branch {
            debug!(current = current_branch, expected = %branch, "wrong branch");
            return Err(PushError::WrongBranch {
                expected: branch.clone(),
                actual: current_branch.to_string(),
            });
        }

        let upstream = self.vcs.upstream_of(branch)?;
        let merge_base = self.vcs.merge_base(&upstream, branch)?;
        let tip = self.vcs.resolve(&current_ref)?;
        debug!(upstream = %upstream, merge_base = %merge_base, tip = %tip, "computed range");
        if merge_base == tip {
            return Err(PushError::NothingToPush);
        }

        let matcher = ReviewMatcher::new(&self.config.reviewboard_url)?;
        let reviews = discover_reviews(self.vcs, &matcher, &format!("{merge_base}..{current_ref}"))?;
        info!(count = reviews.len(), "discovered reviews");

        let remote = self.vcs.branch_remote(branch)?;
        println!("Pushing commits to {}", remote.green());
        self.vcs
            .push(&remote, &format!("{branch}:{branch}"), self.dry_run)?;

        self.close_reviews(&reviews)?;
        Ok(reviews)
    }

    /// Closes `reviews` in order; under dry run only reports them.
    pub fn close_reviews(&self, reviews: &[Review]) -> Result<(), PushError> {
        for review in reviews {
            println!("Closing review {}", review.id.bright_blue());
            if self.dry_run {
                continue;
            }
            self.review_client.close(&review.id, &review.commit_log)?;
            info!(review = %review.id, "review closed");
        }
        Ok(())
    }
}
