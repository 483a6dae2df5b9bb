use serde::Serialize;

pub const UPGRADE_ACTION_LABEL: &str = "Upgrade Plan";

const DEFAULT_UPGRADE_REASON: &str = "Upgrade your plan to unlock this feature.";

/// User-visible notice raised when a feature is denied or an upgrade is
/// suggested. The action points at the billing settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenialNotice {
    pub title: String,
    pub message: String,
    pub feature_label: String,
    pub reason: Option<String>,
    pub action_label: String,
    pub action_url: String,
}

impl DenialNotice {
    pub fn feature_restricted(
        feature_label: &str,
        reason: Option<&str>,
        billing_url: &str,
    ) -> Self {
        let detail = reason.unwrap_or(DEFAULT_UPGRADE_REASON);
        Self {
            title: "Feature Restricted".to_string(),
            message: format!("{} is not available. {}", feature_label, detail),
            feature_label: feature_label.to_string(),
            reason: reason.map(str::to_string),
            action_label: UPGRADE_ACTION_LABEL.to_string(),
            action_url: billing_url.to_string(),
        }
    }

    pub fn upgrade_prompt(feature_label: &str, billing_url: &str) -> Self {
        Self {
            title: "Upgrade Required".to_string(),
            message: format!(
                "Upgrade your plan to access {}. {}",
                feature_label, DEFAULT_UPGRADE_REASON
            ),
            feature_label: feature_label.to_string(),
            reason: None,
            action_label: UPGRADE_ACTION_LABEL.to_string(),
            action_url: billing_url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restricted_notice_carries_reason() {
        let notice = DenialNotice::feature_restricted(
            "Research",
            Some("Your subscription has expired."),
            "/settings?tab=billing",
        );

        assert_eq!(notice.feature_label, "Research");
        assert!(notice.message.contains("Research"));
        assert!(notice.message.contains("Your subscription has expired."));
        assert_eq!(notice.action_url, "/settings?tab=billing");
    }

    #[test]
    fn test_restricted_notice_without_reason_uses_default() {
        let notice = DenialNotice::feature_restricted("Emails", None, "/billing");
        assert!(notice.message.ends_with(DEFAULT_UPGRADE_REASON));
        assert_eq!(notice.reason, None);
    }
}
