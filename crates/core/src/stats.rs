//! Dashboard statistics and rankings
//!
//! Everything here is a pure projection over a booth slice, recomputed on
//! every call.

use serde::Serialize;

use crate::models::{Booth, BoothStatus};

/// Aggregate usage figures for the operator dashboard
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Statistics {
    pub total_booths: usize,
    pub registered_booths: usize,
    pub pending_booths: usize,
    pub total_views: u64,
    /// Mean over booths with a non-zero popularity
    pub average_popularity: f64,
    /// registered / (registered + pending), in percent
    pub approval_rate: f64,
    pub average_views_per_registered_booth: f64,
}

impl Statistics {
    pub fn compute(booths: &[Booth]) -> Self {
        let total_booths = booths.len();
        let registered_booths = booths.iter().filter(|b| b.is_registered()).count();
        let pending_booths = booths
            .iter()
            .filter(|b| b.status() == BoothStatus::Pending)
            .count();
        let total_views = booths
            .iter()
            .map(|b| b.views.unwrap_or(0))
            .fold(0u64, u64::saturating_add);

        let rated: Vec<f64> = booths
            .iter()
            .filter_map(|b| b.popularity)
            .filter(|p| *p != 0.0 && !p.is_nan())
            .collect();

        Self {
            total_booths,
            registered_booths,
            pending_booths,
            total_views,
            average_popularity: ratio(rated.iter().sum(), rated.len() as f64),
            approval_rate: ratio(
                registered_booths as f64,
                (registered_booths + pending_booths) as f64,
            ) * 100.0,
            average_views_per_registered_booth: ratio(
                total_views as f64,
                registered_booths as f64,
            ),
        }
    }
}

/// Division that yields 0 for an empty denominator
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Registered vs. empty slot counts for the visitor sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Occupancy {
    pub registered: usize,
    pub vacant: usize,
}

impl Occupancy {
    pub fn compute(booths: &[Booth]) -> Self {
        let registered = booths.iter().filter(|b| b.is_registered()).count();
        Self {
            registered,
            vacant: booths.len() - registered,
        }
    }
}

/// One row of the per-booth analytics table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRank {
    /// 1-based position
    pub rank: usize,
    pub booth: Booth,
}

/// Booths with a popularity score, highest first, stable on ties
///
/// NaN scores cannot be ordered and are left out.
pub fn top_by_popularity(booths: &[Booth], n: usize) -> Vec<Booth> {
    let mut ranked: Vec<&Booth> = booths
        .iter()
        .filter(|b| b.popularity.is_some_and(|p| !p.is_nan()))
        .collect();
    ranked.sort_by(|a, b| {
        let (a, b) = (a.popularity.unwrap_or(0.0), b.popularity.unwrap_or(0.0));
        b.total_cmp(&a)
    });
    ranked.into_iter().take(n).cloned().collect()
}

/// Booths with a submission date, newest first, stable on ties
pub fn recent_submissions(booths: &[Booth], n: usize) -> Vec<Booth> {
    let mut submitted: Vec<&Booth> = booths.iter().filter(|b| b.submitted_at().is_some()).collect();
    submitted.sort_by(|a, b| b.submitted_at().cmp(&a.submitted_at()));
    submitted.into_iter().take(n).cloned().collect()
}

/// Named booths ordered by views, highest first, stable on ties
pub fn rank_by_views(booths: &[Booth]) -> Vec<ViewRank> {
    let mut named: Vec<&Booth> = booths.iter().filter(|b| b.name().is_some()).collect();
    named.sort_by(|a, b| b.views.unwrap_or(0).cmp(&a.views.unwrap_or(0)));
    named
        .into_iter()
        .enumerate()
        .map(|(i, booth)| ViewRank {
            rank: i + 1,
            booth: booth.clone(),
        })
        .collect()
}
