//! Notifier that only writes log events.
//!
//! Used when no mail API credentials are configured.

use crate::model::posting::Posting;
use crate::model::recipient::Recipient;
use crate::notify::{NotificationMessage, Notifier, NotifyError};
use log::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(
        &self,
        recipients: &[Recipient],
        posting: &Posting,
        is_new: bool,
    ) -> Result<(), NotifyError> {
        let message = NotificationMessage::render(posting, is_new);
        for recipient in recipients {
            info!(
                "event=notify module=notify status=ok transport=log to={} identity={} subject={:?}",
                recipient.email, posting.identity, message.subject
            );
        }
        Ok(())
    }
}
