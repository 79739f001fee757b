//! Uniform random pick of one issue.

use crate::models::IssueRecord;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Choose one issue with probability `1/n`. `None` only for an empty slice.
pub fn choose_issue<'a, R>(issues: &'a [IssueRecord], rng: &mut R) -> Option<&'a IssueRecord>
where
    R: Rng + ?Sized,
{
    let picked = issues.choose(rng);
    if let Some(issue) = picked {
        debug!(
            year = %issue.year,
            month = %issue.month,
            issue_number = ?issue.issue_number,
            of = issues.len(),
            "Picked issue"
        );
    }
    picked
}

/// Deterministic generator when `seed` is given, OS-seeded otherwise.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}
