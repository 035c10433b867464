//! Task lifecycle notifiers
//!
//! The host runtime calls a [`Notifier`] once per lifecycle event it is
//! subscribed to. Whatever goes wrong inside, the host sees a single
//! [`NotificationError`](crate::error::NotificationError).

mod context;
mod keep;

pub use context::EventContext;
pub use keep::KeepNotifier;

use crate::error::NotificationError;

/// Notification channel invoked by the host runtime
pub trait Notifier: Send + Sync {
    /// Handle one lifecycle event
    fn notify(&self, context: &EventContext) -> Result<(), NotificationError>;

    /// Channel name for identification
    fn name(&self) -> &str;
}
