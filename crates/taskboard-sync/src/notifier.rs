use async_trait::async_trait;
use taskboard_core::BoardResult;
use taskboard_domain::NotificationRequest;

/// Delivers notification requests. Callers never wait on delivery and
/// only log failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, request: NotificationRequest) -> BoardResult<()>;
}

/// Records notifications in the log instead of sending them.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, request: NotificationRequest) -> BoardResult<()> {
        tracing::info!(
            kind = request.kind().as_str(),
            recipient = request.recipient().unwrap_or_default(),
            "Notification: {}",
            request.task_title()
        );
        Ok(())
    }
}
