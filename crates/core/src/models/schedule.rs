//! Event schedule and address activation window

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How long before the event opens addresses start resolving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivationLead {
    /// Same day the event starts
    #[default]
    AtStart,
    OneDayBefore,
    ThreeDaysBefore,
    OneWeekBefore,
}

impl ActivationLead {
    fn days(&self) -> u64 {
        match self {
            ActivationLead::AtStart => 0,
            ActivationLead::OneDayBefore => 1,
            ActivationLead::ThreeDaysBefore => 3,
            ActivationLead::OneWeekBefore => 7,
        }
    }
}

/// How long after the event closes addresses keep resolving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeactivationLag {
    /// Same day the event ends
    #[default]
    AtEnd,
    OneDayAfter,
    OneWeekAfter,
    OneMonthAfter,
}

/// Event dates plus the address activation policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSchedule {
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    #[serde(default)]
    pub activation: ActivationLead,
    #[serde(default)]
    pub deactivation: DeactivationLag,
}

impl EventSchedule {
    pub fn new(starts_on: NaiveDate, ends_on: NaiveDate) -> Self {
        Self {
            starts_on,
            ends_on,
            activation: ActivationLead::default(),
            deactivation: DeactivationLag::default(),
        }
    }

    pub fn with_activation(mut self, activation: ActivationLead) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_deactivation(mut self, deactivation: DeactivationLag) -> Self {
        self.deactivation = deactivation;
        self
    }

    /// End date does not precede start date
    pub fn is_well_formed(&self) -> bool {
        self.ends_on >= self.starts_on
    }

    /// First and last day (inclusive) on which addresses resolve
    pub fn address_window(&self) -> (NaiveDate, NaiveDate) {
        let opens = self
            .starts_on
            .checked_sub_days(Days::new(self.activation.days()))
            .unwrap_or(NaiveDate::MIN);

        let closes = match self.deactivation {
            DeactivationLag::AtEnd => Some(self.ends_on),
            DeactivationLag::OneDayAfter => self.ends_on.checked_add_days(Days::new(1)),
            DeactivationLag::OneWeekAfter => self.ends_on.checked_add_days(Days::new(7)),
            DeactivationLag::OneMonthAfter => self.ends_on.checked_add_months(Months::new(1)),
        }
        .unwrap_or(NaiveDate::MAX);

        (opens, closes)
    }

    pub fn is_address_active(&self, on: NaiveDate) -> bool {
        let (opens, closes) = self.address_window();
        opens <= on && on <= closes
    }
}
