//! Picks the one candidate that represents the requested isochrone.
//!
//! Providers often return several small disconnected shapes plus one
//! large main shape, in no particular order. Geometric containment of
//! the requested center therefore outranks shape size:
//!
//! 1. the first ring that contains the center (ray casting),
//! 2. else the first ring whose bounding box contains the center,
//! 3. else the ring with the most vertices (earliest wins ties).

use std::cmp::Reverse;

use sitescout_isochrone_models::{QueryCenter, SelectionTier};

use crate::candidates::ShapeCandidate;

/// The outcome of candidate selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Index into the candidate list.
    pub index: usize,
    /// Which rule matched.
    pub tier: SelectionTier,
}

impl Selection {
    /// Formats the selection reason for `candidates[self.index]`.
    #[must_use]
    pub fn reason(&self, candidates: &[ShapeCandidate]) -> String {
        self.tier.reason(&candidates[self.index].label)
    }
}

/// Selects a candidate, or returns `None` when there are none.
#[must_use]
pub fn select_candidate(candidates: &[ShapeCandidate], center: QueryCenter) -> Option<Selection> {
    if candidates.is_empty() {
        return None;
    }

    let selection = candidates
        .iter()
        .position(|c| c.ring.contains_center(center))
        .map(|index| Selection {
            index,
            tier: SelectionTier::CenterCovered,
        })
        .or_else(|| {
            candidates
                .iter()
                .position(|c| c.bounds.contains_center(center))
                .map(|index| Selection {
                    index,
                    tier: SelectionTier::BboxOverlap,
                })
        })
        .or_else(|| {
            // `min_by_key` keeps the first of equal keys, which is the
            // earliest of the longest rings.
            candidates
                .iter()
                .enumerate()
                .min_by_key(|(_, c)| Reverse(c.ring.len()))
                .map(|(index, _)| Selection {
                    index,
                    tier: SelectionTier::FallbackLongestRing,
                })
        })?;

    log::info!("[Isochrone] Selected {}", selection.reason(candidates));

    Some(selection)
}
