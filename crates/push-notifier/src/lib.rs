//! Push notifications for run results.
//!
//! The read loop only knows the [`Notifier`] trait; [`HttpPushNotifier`]
//! delivers through a handful of push services selected by [`PushMethod`].

mod error;
mod http;
mod method;

pub use error::{NotifyError, NotifyResult};
pub use http::{HttpPushNotifier, PushCredentials, PushEndpoints, PUSH_TIMEOUT};
pub use method::PushMethod;

use async_trait::async_trait;

/// Title attached to every push.
pub const PUSH_TITLE: &str = "WeRead autoread";

/// Delivers a human-readable status message.
///
/// `method` is `None` when no delivery channel is configured; the attempt
/// still happens and implementations report it as an error.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str, method: Option<&PushMethod>) -> NotifyResult<()>;
}
