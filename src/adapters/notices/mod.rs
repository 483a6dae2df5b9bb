use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::{
    application::ports::notice_sink::NoticeSink, domain::entities::denial_notice::DenialNotice,
};

/// Notices collected for one request, drained into its response.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: Mutex<Vec<DenialNotice>>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<DenialNotice> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *pending)
    }

    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NoticeSink for NoticeQueue {
    fn deliver(&self, notice: DenialNotice) {
        info!(
            feature_label = %notice.feature_label,
            title = %notice.title,
            "Queued denial notice"
        );
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

/// Session default sink. Notices that no request collects are only logged.
#[derive(Debug, Default, Clone)]
pub struct TracingNoticeSink;

impl TracingNoticeSink {
    pub fn new() -> Self {
        Self
    }
}

impl NoticeSink for TracingNoticeSink {
    fn deliver(&self, notice: DenialNotice) {
        info!(
            feature_label = %notice.feature_label,
            title = %notice.title,
            "Denial notice outside a request"
        );
    }
}
