use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Product features gated by the subscription state.
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Feature {
    ProcessResearch,
    ProcessTranscripts,
    PushToHubspot,
    GenerateEmails,
    GeneratePresentations,
    InviteUsers,
    AccessAnalytics,
    /// Never gated: users must always be able to reach billing settings.
    AccessSettings,
}

impl Feature {
    pub const ALL: [Feature; 8] = [
        Feature::ProcessResearch,
        Feature::ProcessTranscripts,
        Feature::PushToHubspot,
        Feature::GenerateEmails,
        Feature::GeneratePresentations,
        Feature::InviteUsers,
        Feature::AccessAnalytics,
        Feature::AccessSettings,
    ];

    /// Whether an expired plan loses access to this feature.
    pub fn is_premium(&self) -> bool {
        !matches!(self, Feature::AccessSettings)
    }
}
