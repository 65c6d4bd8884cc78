pub mod notifier;
pub mod payload;

pub use notifier::{deliver, DeliveryError, DeliveryRecord, DeliveryReport, DeliveryStatus};
pub use payload::{format_entry, NotificationPayload};
