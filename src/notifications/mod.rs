pub mod mailer;
pub mod templates;

pub use mailer::{start_mailer, Notifier, OutboundEmail};
pub use templates::NotificationTemplates;
