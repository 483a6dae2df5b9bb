use serde::Serialize;

use crate::domain::entities::{feature::Feature, plan_status::PlanType};

/// Per-feature permissions derived from the plan status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGateSet {
    pub process_research: bool,
    pub process_transcripts: bool,
    pub push_to_hubspot: bool,
    pub generate_emails: bool,
    pub generate_presentations: bool,
    pub invite_users: bool,
    pub access_analytics: bool,
    pub access_settings: bool,
    pub restriction_reason: Option<String>,
}

impl FeatureGateSet {
    fn uniform(premium_allowed: bool, restriction_reason: Option<String>) -> Self {
        Self {
            process_research: premium_allowed,
            process_transcripts: premium_allowed,
            push_to_hubspot: premium_allowed,
            generate_emails: premium_allowed,
            generate_presentations: premium_allowed,
            invite_users: premium_allowed,
            access_analytics: premium_allowed,
            access_settings: true,
            restriction_reason,
        }
    }

    pub fn allows(&self, feature: Feature) -> bool {
        match feature {
            Feature::ProcessResearch => self.process_research,
            Feature::ProcessTranscripts => self.process_transcripts,
            Feature::PushToHubspot => self.push_to_hubspot,
            Feature::GenerateEmails => self.generate_emails,
            Feature::GeneratePresentations => self.generate_presentations,
            Feature::InviteUsers => self.invite_users,
            Feature::AccessAnalytics => self.access_analytics,
            Feature::AccessSettings => self.access_settings,
        }
    }
}

pub fn gate(is_expired: bool, plan_type: PlanType) -> FeatureGateSet {
    if is_expired {
        FeatureGateSet::uniform(false, Some(expired_reason(plan_type)))
    } else {
        FeatureGateSet::uniform(true, None)
    }
}

pub fn expired_reason(plan_type: PlanType) -> String {
    let subject = match plan_type {
        PlanType::Free => "free trial",
        PlanType::Paid => "subscription",
    };
    format!(
        "Your {} has expired. Please upgrade to continue using premium features.",
        subject
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_plan_allows_everything() {
        let set = gate(false, PlanType::Paid);
        for feature in Feature::ALL {
            assert!(set.allows(feature), "{} should be allowed", feature);
        }
        assert_eq!(set.restriction_reason, None);
    }

    #[test]
    fn test_expired_plan_keeps_only_settings() {
        let set = gate(true, PlanType::Paid);
        for feature in Feature::ALL {
            assert_eq!(set.allows(feature), !feature.is_premium());
        }
        assert!(set.access_settings);
    }

    #[test]
    fn test_expired_reason_depends_on_plan_type() {
        assert_eq!(
            gate(true, PlanType::Free).restriction_reason.as_deref(),
            Some("Your free trial has expired. Please upgrade to continue using premium features.")
        );
        assert_eq!(
            gate(true, PlanType::Paid).restriction_reason.as_deref(),
            Some("Your subscription has expired. Please upgrade to continue using premium features.")
        );
    }

    #[test]
    fn test_settings_allowed_in_every_state() {
        for is_expired in [true, false] {
            for plan_type in [PlanType::Free, PlanType::Paid] {
                assert!(gate(is_expired, plan_type).access_settings);
            }
        }
    }

    #[test]
    fn test_serializes_with_feature_keys() {
        let json = serde_json::to_value(gate(true, PlanType::Free)).unwrap();
        for feature in Feature::ALL {
            assert!(json.get(feature.as_ref()).is_some(), "missing {}", feature);
        }
        assert!(json["restrictionReason"].is_string());
    }
}
