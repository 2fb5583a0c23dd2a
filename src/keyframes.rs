use std::collections::BTreeSet;

use super::*;

/// Every frame any channel of `action` is keyed on, ascending and unique.
///
/// Frame coordinates round half-to-even, so a key at `2.5` lands on frame 2.
pub fn extract_keyframes(action: &Action) -> Vec<i32> {
    let frames: BTreeSet<i32> = action
        .channels
        .iter()
        .flat_map(|chan| chan.keyframes.iter())
        .map(|k| k.frame.round_ties_even() as i32)
        .collect();
    frames.into_iter().collect()
}
