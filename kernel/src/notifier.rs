use async_trait::async_trait;

use crate::model::id::MemberId;
use crate::model::session::ClassSession;

/// Fire-and-forget hook invoked after a waitlist promotion has been
/// committed. Implementations must swallow their own failures; a lost
/// notification never unwinds a promotion.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn promoted(&self, member_id: MemberId, session: &ClassSession);
}

/// Writes promotions to the log.
/// TODO: replace with the push-notification channel once the member
/// app ships; the trait is already shaped for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn promoted(&self, member_id: MemberId, session: &ClassSession) {
        tracing::info!(
            member_id = %member_id,
            session_id = %session.session_id,
            session_name = %session.name,
            "member promoted from waitlist"
        );
    }
}
