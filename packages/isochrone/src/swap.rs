//! Axis swap correction for the selected ring.
//!
//! Bare `[a, b]` sequences are read as `[lng, lat]`, but some responses
//! arrive as `[lat, lng]`. When the selected ring was built from sequences
//! and does not contain the center, the ring is retried with its axes
//! exchanged. The swap is applied only if it improves coverage, and an
//! applied swap always produces a warning.

use sitescout_isochrone_models::{QueryCenter, SelectionTier};

use crate::candidates::ShapeCandidate;
use crate::diagnostics::Diagnostics;

/// What the swap stage did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The ring already contains the center, or its encoding is unambiguous.
    NotApplicable,
    /// Swapping did not improve coverage (or left the valid range).
    Rejected,
    /// The ring was replaced; carries the coverage the swapped ring achieves.
    Applied(SelectionTier),
}

/// Swaps the axes of `candidate` in place when that restores coverage.
///
/// Runs only when `tier` does not already cover the center and the
/// candidate came from the ambiguous sequence encoding.
pub fn correct_axis_swap(
    candidate: &mut ShapeCandidate,
    tier: SelectionTier,
    center: QueryCenter,
    diagnostics: &mut Diagnostics,
) -> SwapOutcome {
    if tier.covers_center() || !candidate.format.is_ambiguous() {
        return SwapOutcome::NotApplicable;
    }

    log::debug!(
        "[Isochrone] Center not covered by {}, checking for swapped axes",
        candidate.label
    );

    let ring = candidate.ring.swapped();
    if !ring.is_in_range() {
        log::debug!(
            "[Isochrone] Swapped ring for {} leaves the valid lat/lng range",
            candidate.label
        );
        return SwapOutcome::Rejected;
    }

    let Some(bounds) = ring.bounds() else {
        return SwapOutcome::Rejected;
    };

    let swapped = ShapeCandidate {
        label: candidate.label.clone(),
        ring,
        bounds,
        format: candidate.format.swapped(),
        holes: candidate.holes.clone(),
    };

    let before = candidate.coverage(center);
    let after = swapped.coverage(center);
    if after >= before {
        log::debug!(
            "[Isochrone] Swapping {} does not improve coverage ({before} -> {after})",
            candidate.label
        );
        return SwapOutcome::Rejected;
    }

    log::info!(
        "[Isochrone] Coordinates for {} were swapped, coverage {before} -> {after}",
        candidate.label
    );
    diagnostics.warn(format!(
        "coordinates for {} appeared to be in [lat, lng] order and were swapped \
         to restore center coverage",
        candidate.label
    ));

    *candidate = swapped;
    SwapOutcome::Applied(after)
}
