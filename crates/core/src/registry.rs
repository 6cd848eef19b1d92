//! Booth registry - owns the booth records and their lifecycle
//!
//! The registry is seeded once, then moves booths through
//! `unset -> pending -> approved | rejected`. Every failed operation leaves
//! the records untouched.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::instrument;

use crate::clock::{Clock, SystemClock};
use crate::config::EventConfig;
use crate::error::{Error, Result};
use crate::invariants;
use crate::models::{Booth, BoothId, BoothStage, BoothStatus, Claim, EventSchedule};
use crate::stats::{self, Occupancy, Statistics, ViewRank};

/// Operator verdict on a pending claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// The status a pending booth ends up in
    pub fn status(&self) -> BoothStatus {
        match self {
            Decision::Approve => BoothStatus::Approved,
            Decision::Reject => BoothStatus::Rejected,
        }
    }
}

/// In-memory booth registry for one event
#[derive(Debug)]
pub struct BoothRegistry {
    /// `<event>` part of every address minted here
    prefix: String,
    title: Option<String>,
    schedule: Option<EventSchedule>,
    /// Booths in seed order
    booths: Vec<Booth>,
    /// Booth id to position in `booths`
    index: HashMap<BoothId, usize>,
    clock: Box<dyn Clock>,
}

impl BoothRegistry {
    /// Create a registry from seed booths, rejecting repeated ids
    pub fn new(prefix: impl Into<String>, seed: Vec<Booth>) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.trim().is_empty() {
            return Err(Error::InvalidInput("event prefix must not be empty".to_string()));
        }

        let mut index = HashMap::with_capacity(seed.len());
        for (pos, booth) in seed.iter().enumerate() {
            validate_seed(booth)?;
            if index.insert(booth.id, pos).is_some() {
                return Err(Error::DuplicateId(booth.id));
            }
        }

        tracing::debug!(prefix = %prefix, booths = seed.len(), "Seeded booth registry");

        let registry = Self {
            prefix,
            title: None,
            schedule: None,
            booths: seed,
            index,
            clock: Box::new(SystemClock),
        };
        invariants::assert_registry_invariants(&registry.booths, &registry.index);
        Ok(registry)
    }

    /// Create a registry from an event configuration
    pub fn from_config(config: &EventConfig) -> Result<Self> {
        let mut registry = Self::new(config.event.prefix.clone(), config.seed_booths()?)?;
        registry.title = config.event.title.clone();
        registry.schedule = config.schedule.clone();
        Ok(registry)
    }

    /// Replace the clock used to stamp new claims
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// The date new claims are stamped with
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn len(&self) -> usize {
        self.booths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.booths.is_empty()
    }

    /// Snapshot of every booth in seed order
    pub fn all(&self) -> Vec<Booth> {
        self.booths.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Booth> {
        self.booths.iter()
    }

    /// Look up a booth by id
    pub fn get(&self, id: BoothId) -> Result<&Booth> {
        self.slot(id).map(|pos| &self.booths[pos])
    }

    fn slot(&self, id: BoothId) -> Result<usize> {
        self.index.get(&id).copied().ok_or(Error::NotFound(id))
    }

    /// Claim an unregistered booth under `name`
    ///
    /// The booth becomes pending with address `<prefix>-<name>` and today's
    /// date. A rejected booth may be claimed again; its old claim is replaced.
    #[instrument(skip(self, description))]
    pub fn register(&mut self, id: BoothId, name: &str, description: &str) -> Result<Booth> {
        let pos = self.slot(id)?;

        let name = name.trim();
        if name.is_empty() {
            tracing::warn!(booth_id = id, "Rejected registration with empty name");
            return Err(Error::InvalidInput("shop name must not be empty".to_string()));
        }

        if self.booths[pos].is_registered() {
            tracing::warn!(booth_id = id, "Rejected registration of a claimed booth");
            return Err(Error::AlreadyRegistered(id));
        }

        let claim = Claim::new(&self.prefix, name, description, self.clock.today());
        tracing::info!(booth_id = id, address = %claim.address, "Booth registered, awaiting review");

        let booth = &mut self.booths[pos];
        booth.stage = BoothStage::Pending(claim);
        invariants::assert_booth_invariants(booth);
        Ok(booth.clone())
    }

    /// Resolve a pending claim
    ///
    /// Only pending booths can be moderated. The claim (name, address,
    /// submission date) is carried over unchanged.
    #[instrument(skip(self))]
    pub fn set_status(&mut self, id: BoothId, decision: Decision) -> Result<Booth> {
        let pos = self.slot(id)?;
        let booth = &mut self.booths[pos];

        #[cfg(debug_assertions)]
        let before = booth.clone();

        booth.stage = match std::mem::take(&mut booth.stage) {
            BoothStage::Pending(claim) => match decision {
                Decision::Approve => BoothStage::Approved(claim),
                Decision::Reject => BoothStage::Rejected(claim),
            },
            other => {
                let from = other.status();
                booth.stage = other;
                tracing::warn!(booth_id = id, %from, "Rejected moderation of a non-pending booth");
                return Err(Error::InvalidTransition {
                    id,
                    from,
                    to: decision.status(),
                });
            }
        };

        #[cfg(debug_assertions)]
        invariants::assert_claim_preserved(&before, booth);
        invariants::assert_booth_invariants(booth);

        tracing::info!(booth_id = id, status = %booth.status(), "Booth moderated");
        Ok(booth.clone())
    }

    /// Aggregate dashboard figures
    pub fn statistics(&self) -> Statistics {
        Statistics::compute(&self.booths)
    }

    /// Up to `n` booths by popularity, highest first
    pub fn top_by_popularity(&self, n: usize) -> Vec<Booth> {
        stats::top_by_popularity(&self.booths, n)
    }

    /// Up to `n` claimed booths, most recently submitted first
    pub fn recent_submissions(&self, n: usize) -> Vec<Booth> {
        stats::recent_submissions(&self.booths, n)
    }

    /// Named booths ranked by views
    pub fn rank_by_views(&self) -> Vec<ViewRank> {
        stats::rank_by_views(&self.booths)
    }

    pub fn occupancy(&self) -> Occupancy {
        Occupancy::compute(&self.booths)
    }

    /// Booths awaiting moderation, in seed order
    pub fn pending(&self) -> Vec<Booth> {
        self.booths
            .iter()
            .filter(|b| b.status() == BoothStatus::Pending)
            .cloned()
            .collect()
    }

    /// Find the registered booth holding `address`
    ///
    /// Addresses are not unique: two booths may register the same shop name.
    /// The first match in seed order wins.
    pub fn find_by_address(&self, address: &str) -> Option<&Booth> {
        self.booths
            .iter()
            .find(|b| b.is_registered() && b.address() == Some(address))
    }

    pub fn schedule(&self) -> Option<&EventSchedule> {
        self.schedule.as_ref()
    }

    /// Replace the event schedule
    pub fn set_schedule(&mut self, schedule: EventSchedule) -> Result<()> {
        if !schedule.is_well_formed() {
            return Err(Error::InvalidInput(format!(
                "event ends on {} before it starts on {}",
                schedule.ends_on, schedule.starts_on
            )));
        }

        tracing::info!(
            starts_on = %schedule.starts_on,
            ends_on = %schedule.ends_on,
            "Event schedule updated"
        );
        self.schedule = Some(schedule);
        Ok(())
    }

    /// Whether `address` resolves on the given day
    ///
    /// Without a schedule, any registered address resolves.
    pub fn is_address_active(&self, address: &str, on: NaiveDate) -> bool {
        self.find_by_address(address).is_some()
            && self
                .schedule
                .as_ref()
                .map_or(true, |s| s.is_address_active(on))
    }
}

/// Reject seed booths the lifecycle could never have produced
fn validate_seed(booth: &Booth) -> Result<()> {
    if booth.id == 0 {
        return Err(Error::InvalidInput("booth id 0 is reserved".to_string()));
    }

    if let Some(claim) = booth.claim() {
        if claim.name.trim().is_empty() || claim.address.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "booth {} has a claim with a blank name or address",
                booth.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::Position;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn grid(n: u32) -> Vec<Booth> {
        (1..=n)
            .map(|id| Booth::vacant(id, (id - 1) / 3 + 1, (id - 1) % 3 + 1, Position::default()))
            .collect()
    }

    fn registry(n: u32) -> BoothRegistry {
        BoothRegistry::new("Market", grid(n))
            .unwrap()
            .with_clock(FixedClock(today()))
    }

    fn demo() -> BoothRegistry {
        BoothRegistry::from_config(&EventConfig::demo().unwrap())
            .unwrap()
            .with_clock(FixedClock(today()))
    }

    fn assert_all_invariants(registry: &BoothRegistry) {
        for booth in registry.iter() {
            if booth.is_registered() {
                assert!(booth.name().is_some());
                assert!(booth.address().is_some());
                assert!(booth.submitted_at().is_some());
            }
        }
    }

    #[test]
    fn test_initialize_preserves_order() {
        let registry = BoothRegistry::new("Market", grid(4)).unwrap();
        let ids: Vec<BoothId> = registry.all().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_initialize_rejects_duplicate_ids() {
        let mut seed = grid(3);
        seed.push(Booth::vacant(2, 9, 9, Position::default()));
        let err = BoothRegistry::new("Market", seed).unwrap_err();
        assert!(matches!(err, Error::DuplicateId(2)));
    }

    #[test]
    fn test_initialize_rejects_empty_prefix() {
        assert!(matches!(
            BoothRegistry::new(" ", grid(1)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_initialize_rejects_reserved_id() {
        let seed = vec![Booth::vacant(0, 1, 1, Position::default())];
        assert!(matches!(
            BoothRegistry::new("Market", seed),
            Err(Error::InvalidInput(msg)) if msg.contains("id 0")
        ));
    }

    #[test]
    fn test_initialize_rejects_blank_claim() {
        let mut claim = Claim::new("Market", "Stall", "", today());
        claim.address = String::new();
        let seed = vec![Booth::vacant(1, 1, 1, Position::default())
            .with_stage(BoothStage::Approved(claim))];
        assert!(matches!(
            BoothRegistry::new("Market", seed),
            Err(Error::InvalidInput(_))
        ));

        let seed = vec![Booth::vacant(1, 1, 1, Position::default())
            .with_stage(BoothStage::Pending(Claim::new("Market", "  ", "", today())))];
        assert!(matches!(
            BoothRegistry::new("Market", seed),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_today_comes_from_clock() {
        assert_eq!(registry(1).today(), today());
    }

    #[test]
    fn test_get_unknown_id() {
        let registry = registry(3);
        assert!(matches!(registry.get(42), Err(Error::NotFound(42))));
        assert_eq!(registry.get(2).unwrap().id, 2);
    }

    #[test]
    fn test_register_success() {
        let mut registry = registry(3);
        let booth = registry.register(2, "Joe's Tacos", "Tacos").unwrap();

        assert_eq!(booth.address(), Some("Market-Joe's Tacos"));
        assert_eq!(booth.status(), BoothStatus::Pending);
        assert!(booth.is_registered());
        assert_eq!(booth.submitted_at(), Some(today()));
        assert_eq!(booth.description(), Some("Tacos"));
        assert_eq!(registry.get(2).unwrap(), &booth);
        assert_all_invariants(&registry);
    }

    #[test]
    fn test_register_trims_name() {
        let mut registry = registry(1);
        let booth = registry.register(1, "  Noodle Bar ", "").unwrap();
        assert_eq!(booth.name(), Some("Noodle Bar"));
        assert_eq!(booth.address(), Some("Market-Noodle Bar"));
    }

    #[test]
    fn test_register_unknown_id_leaves_state() {
        let mut registry = registry(3);
        let before = registry.all();
        assert!(matches!(
            registry.register(99, "Stall", ""),
            Err(Error::NotFound(99))
        ));
        assert_eq!(registry.all(), before);
    }

    #[test]
    fn test_register_blank_name_leaves_state() {
        let mut registry = registry(3);
        let before = registry.all();
        for name in ["", "   "] {
            assert!(matches!(
                registry.register(1, name, "desc"),
                Err(Error::InvalidInput(_))
            ));
        }
        assert_eq!(registry.all(), before);
    }

    #[test]
    fn test_register_twice_fails() {
        let mut registry = registry(3);
        registry.register(1, "First", "").unwrap();
        let before = registry.all();

        assert!(matches!(
            registry.register(1, "Second", ""),
            Err(Error::AlreadyRegistered(1))
        ));
        assert_eq!(registry.all(), before);
    }

    #[test]
    fn test_register_approved_seed_fails() {
        let mut registry = demo();
        assert!(matches!(
            registry.register(1, "Usurper", ""),
            Err(Error::AlreadyRegistered(1))
        ));
    }

    #[test]
    fn test_approve_pending() {
        let mut registry = registry(3);
        let registered = registry.register(1, "Stall", "").unwrap();
        let booth = registry.set_status(1, Decision::Approve).unwrap();

        assert_eq!(booth.status(), BoothStatus::Approved);
        assert!(booth.is_registered());
        assert_eq!(booth.claim(), registered.claim());
        assert_all_invariants(&registry);
    }

    #[test]
    fn test_reject_pending_keeps_claim() {
        let mut registry = registry(3);
        let registered = registry.register(1, "Stall", "").unwrap();
        let booth = registry.set_status(1, Decision::Reject).unwrap();

        assert_eq!(booth.status(), BoothStatus::Rejected);
        assert!(!booth.is_registered());
        assert_eq!(booth.name(), Some("Stall"));
        assert_eq!(booth.address(), registered.address());
        assert_eq!(booth.submitted_at(), Some(today()));
    }

    #[test]
    fn test_reregister_after_rejection() {
        let mut registry = registry(1);
        registry.register(1, "Old", "").unwrap();
        registry.set_status(1, Decision::Reject).unwrap();

        let booth = registry.register(1, "New", "fresh").unwrap();
        assert_eq!(booth.status(), BoothStatus::Pending);
        assert_eq!(booth.address(), Some("Market-New"));
    }

    #[test]
    fn test_set_status_unknown_id() {
        let mut registry = registry(1);
        assert!(matches!(
            registry.set_status(5, Decision::Approve),
            Err(Error::NotFound(5))
        ));
    }

    #[test]
    fn test_set_status_requires_pending() {
        let mut registry = demo();
        let before = registry.all();

        let err = registry.set_status(1, Decision::Reject).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                id: 1,
                from: BoothStatus::Approved,
                to: BoothStatus::Rejected,
            }
        ));

        let err = registry.set_status(7, Decision::Approve).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: BoothStatus::Unset,
                ..
            }
        ));
        assert_eq!(registry.all(), before);
    }

    #[test]
    fn test_demo_scenario() {
        let registry = demo();
        let stats = registry.statistics();
        assert_eq!(stats.total_booths, 9);
        assert_eq!(stats.registered_booths, 3);
        assert_eq!(stats.pending_booths, 0);
        assert_eq!(stats.total_views, 590);
        assert!((stats.average_popularity - 7.5).abs() < 1e-9);
        assert_eq!(stats.approval_rate, 100.0);

        let top = registry.top_by_popularity(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].popularity, Some(8.5));
        assert_eq!(top[0].name(), Some("HongGildongShop"));
    }

    #[test]
    fn test_statistics_follow_transitions() {
        let mut registry = demo();
        registry.register(4, "Dumplings", "").unwrap();
        registry.register(5, "Kimchi", "").unwrap();

        let stats = registry.statistics();
        assert_eq!(stats.registered_booths, 5);
        assert_eq!(stats.pending_booths, 2);

        registry.set_status(4, Decision::Approve).unwrap();
        registry.set_status(5, Decision::Reject).unwrap();

        let stats = registry.statistics();
        assert_eq!(stats.registered_booths, 4);
        assert_eq!(stats.pending_booths, 0);
        assert_eq!(registry.occupancy().vacant, 5);
    }

    #[test]
    fn test_empty_registry_statistics() {
        let registry = BoothRegistry::new("Market", Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.statistics(), Statistics::default());
    }

    #[test]
    fn test_recent_submissions_after_registration() {
        let mut registry = demo();
        registry.register(9, "Late Stall", "").unwrap();

        let recent: Vec<BoothId> = registry
            .recent_submissions(2)
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(recent, vec![9, 3]);
    }

    #[test]
    fn test_pending_queue() {
        let mut registry = registry(4);
        registry.register(3, "C", "").unwrap();
        registry.register(1, "A", "").unwrap();

        let ids: Vec<BoothId> = registry.pending().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_find_by_address_only_registered() {
        let mut registry = registry(2);
        registry.register(1, "Stall", "").unwrap();
        assert_eq!(registry.find_by_address("Market-Stall").map(|b| b.id), Some(1));

        registry.set_status(1, Decision::Reject).unwrap();
        assert!(registry.find_by_address("Market-Stall").is_none());
    }

    #[test]
    fn test_shared_address_resolves_to_first_booth() {
        let mut registry = registry(3);
        registry.register(3, "Stall", "").unwrap();
        registry.register(1, "Stall", "").unwrap();

        assert_eq!(registry.find_by_address("Market-Stall").map(|b| b.id), Some(1));

        registry.set_status(1, Decision::Reject).unwrap();
        assert_eq!(registry.find_by_address("Market-Stall").map(|b| b.id), Some(3));
    }

    #[test]
    fn test_address_activation_window() {
        let registry = demo();
        let address = "YeonsuFleaMarket-SweetCafe";

        assert!(!registry.is_address_active(address, date(2027, 7, 7)));
        assert!(registry.is_address_active(address, date(2027, 7, 8)));
        assert!(registry.is_address_active(address, date(2027, 7, 9)));
        assert!(!registry.is_address_active(address, date(2027, 7, 10)));
        assert!(!registry.is_address_active("YeonsuFleaMarket-Nobody", date(2027, 7, 8)));
    }

    #[test]
    fn test_no_schedule_means_always_active() {
        let mut registry = registry(1);
        registry.register(1, "Stall", "").unwrap();
        assert!(registry.schedule().is_none());
        assert!(registry.is_address_active("Market-Stall", date(2000, 1, 1)));
    }

    #[test]
    fn test_set_schedule() {
        let mut registry = registry(1);
        let backwards = EventSchedule::new(date(2027, 7, 9), date(2027, 7, 8));
        assert!(matches!(
            registry.set_schedule(backwards),
            Err(Error::InvalidInput(_))
        ));
        assert!(registry.schedule().is_none());

        let schedule = EventSchedule::new(date(2027, 7, 8), date(2027, 7, 9));
        registry.set_schedule(schedule.clone()).unwrap();
        assert_eq!(registry.schedule(), Some(&schedule));
    }

    #[test]
    fn test_rank_by_views_on_demo() {
        let registry = demo();
        let ranks: Vec<(usize, BoothId)> = registry
            .rank_by_views()
            .iter()
            .map(|r| (r.rank, r.booth.id))
            .collect();
        assert_eq!(ranks, vec![(1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_title_from_config() {
        assert_eq!(demo().title(), Some("Yeonsu Flea Market"));
        assert_eq!(demo().prefix(), "YeonsuFleaMarket");
    }
}
