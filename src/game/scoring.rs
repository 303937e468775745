//! Point awards for letter guesses

use super::{Outcome, DOUBLE_FALLBACK_POINTS};

/// Points earned for opening `opened_count` letters under `outcome`.
///
/// `last_points` is the value of the most recent Points sector spun this
/// game, if any; Double pays twice that per letter, or twice the fallback
/// when nothing has been spun yet. Outcomes that never accept a letter
/// guess pay nothing.
pub fn score(outcome: Outcome, last_points: Option<u32>, opened_count: usize) -> u32 {
    let opened = opened_count as u32;
    match outcome {
        Outcome::Points(value) => value.saturating_mul(opened),
        Outcome::Double => last_points
            .unwrap_or(DOUBLE_FALLBACK_POINTS)
            .saturating_mul(opened)
            .saturating_mul(2),
        Outcome::Bonus | Outcome::Zero | Outcome::Bankrupt => 0,
    }
}
