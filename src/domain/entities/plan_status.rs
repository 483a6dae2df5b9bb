use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Status column of a persisted plan row.
///
/// Stored as free text. Anything that is neither active nor cancelled is
/// treated as `None`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RecordStatus {
    Active,
    #[strum(to_string = "cancelled", serialize = "canceled")]
    Cancelled,
    #[default]
    None,
}

impl RecordStatus {
    pub fn from_text(s: &str) -> Self {
        s.trim().parse().unwrap_or_default()
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlanType {
    Free,
    Paid,
}

/// Canonical entitlement status, computed once per resolution and consumed
/// by every gate.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlanStatus {
    /// Paid period running, not cancelled
    Active,
    /// Cancelled, but the paid period has not ended yet
    CancelledGrace,
    /// End date has passed
    Expired,
    /// No usable plan record
    NoPlan,
}

impl PlanStatus {
    pub fn is_expired(&self) -> bool {
        !self.has_access()
    }

    /// Cancelled plans keep their features until the end date.
    pub fn has_access(&self) -> bool {
        matches!(self, PlanStatus::Active | PlanStatus::CancelledGrace)
    }

    pub fn description(&self) -> &'static str {
        match self {
            PlanStatus::Active => "Subscription is active",
            PlanStatus::CancelledGrace => "Subscription cancelled, access continues until the end date",
            PlanStatus::Expired => "Subscription has expired",
            PlanStatus::NoPlan => "No subscription on record",
        }
    }
}

/// Which persisted schema a resolved plan came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlanSource {
    Current,
    Legacy,
    None,
}
