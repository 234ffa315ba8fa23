pub mod notifier;
pub mod outbox;
pub mod retry;
pub mod session;

pub use notifier::{LogNotifier, Notifier};
pub use outbox::{dispatch_batch, IntentFailure, Outbox, SyncEvent};
pub use retry::RetryPolicy;
pub use session::{BoardSession, SessionContext};
