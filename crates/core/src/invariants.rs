//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::{HashMap, HashSet};

use crate::models::{Booth, BoothId, BoothStatus};

/// Validate that a booth's state is internally consistent
pub fn assert_booth_invariants(booth: &Booth) {
    debug_assert!(booth.id != 0, "Booth has reserved id 0");

    if booth.is_registered() {
        debug_assert!(
            booth.name().is_some() && booth.address().is_some() && booth.submitted_at().is_some(),
            "Booth {} is registered without a complete claim",
            booth.id
        );
    }

    if booth.status() == BoothStatus::Unset {
        debug_assert!(
            !booth.is_registered() && booth.address().is_none(),
            "Booth {} is unset but looks claimed",
            booth.id
        );
    }

    if let Some(claim) = booth.claim() {
        debug_assert!(
            !claim.name.trim().is_empty(),
            "Booth {} has a claim with an empty name",
            booth.id
        );
        debug_assert!(
            !claim.address.is_empty(),
            "Booth {} has a claim with an empty address",
            booth.id
        );
    }
}

/// Validate that the id index matches the ordered booth list
pub fn assert_registry_invariants(booths: &[Booth], index: &HashMap<BoothId, usize>) {
    let mut seen = HashSet::new();
    for booth in booths {
        debug_assert!(seen.insert(booth.id), "Duplicate booth id {}", booth.id);
    }

    debug_assert!(
        index.len() == booths.len(),
        "Index has {} entries for {} booths",
        index.len(),
        booths.len()
    );

    for (id, &pos) in index {
        debug_assert!(
            booths.get(pos).map(|b| b.id) == Some(*id),
            "Index maps booth {} to slot {} holding another booth",
            id,
            pos
        );
    }

    for booth in booths {
        assert_booth_invariants(booth);
    }
}

/// Validate that moderation left the claim untouched
pub fn assert_claim_preserved(before: &Booth, after: &Booth) {
    debug_assert!(
        before.claim() == after.claim(),
        "Booth {} claim changed during moderation",
        before.id
    );
}
