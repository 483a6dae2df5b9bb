use crate::domain::entities::denial_notice::DenialNotice;

/// Delivers denial notices to the user. Delivery never fails.
pub trait NoticeSink: Send + Sync {
    fn deliver(&self, notice: DenialNotice);
}
