use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tix_common::Money;

use crate::db_types::{Event, HostId, TicketTier};

/// A tier as described by the host, before it has an id or belongs to a stored event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDraft {
    pub name: String,
    pub price: Money,
    pub capacity: i64,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl TierDraft {
    pub fn new<S: Into<String>>(name: S, price: Money, capacity: i64) -> Self {
        Self { name: name.into(), price, capacity, active: true }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Every tier needs a name".into());
        }
        if self.price.is_negative() {
            return Err(format!("Tier '{}' has a negative price", self.name));
        }
        if self.capacity <= 0 {
            return Err(format!("Tier '{}' must have a capacity of at least 1", self.name));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub host_id: HostId,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub tiers: Vec<TierDraft>,
}

impl EventDraft {
    pub fn new<S: Into<String>>(host_id: HostId, title: S, starts_at: DateTime<Utc>) -> Self {
        Self { host_id, title: title.into(), starts_at, tiers: vec![] }
    }

    pub fn with_tier(mut self, tier: TierDraft) -> Self {
        self.tiers.push(tier);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("The event needs a title".into());
        }
        if self.tiers.is_empty() {
            return Err("The event needs at least one ticket tier".into());
        }
        self.tiers.iter().try_for_each(TierDraft::validate)
    }
}

/// An event with its tiers in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWithTiers {
    pub event: Event,
    pub tiers: Vec<TicketTier>,
}

#[cfg(test)]
mod test {
    use super::*;

    fn draft() -> EventDraft {
        EventDraft::new(HostId::from("host_1"), "Warehouse", Utc::now())
            .with_tier(TierDraft::new("Early bird", Money::from(1_000), 50))
    }

    #[test]
    fn valid_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn invalid_drafts() {
        let mut d = draft();
        d.title = "  ".into();
        assert!(d.validate().is_err());

        let mut d = draft();
        d.tiers.clear();
        assert!(d.validate().is_err());

        let d = draft().with_tier(TierDraft::new("Door", Money::from(-1), 10));
        assert!(d.validate().unwrap_err().contains("negative price"));

        let d = draft().with_tier(TierDraft::new("VIP", Money::from(5_000), 0));
        assert!(d.validate().unwrap_err().contains("capacity"));

        let d = draft().with_tier(TierDraft::new("", Money::from(5_000), 3));
        assert!(d.validate().is_err());
    }

    #[test]
    fn tiers_default_to_active() {
        let tier: TierDraft = serde_json::from_str(r#"{"name":"GA","price":1500,"capacity":100}"#).unwrap();
        assert!(tier.active);
    }
}
