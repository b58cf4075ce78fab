//! Order notifications.

mod dispatch;
mod errors;
mod log;
mod mailer;
mod messages;
mod notifier;

pub use dispatch::notify_paid_order;
pub use errors::NotificationError;
pub use log::LogNotifier;
pub use mailer::{HttpMailer, MailerConfig};
pub use messages::*;
pub use notifier::*;
