pub mod notification_filter;
pub mod notification_models;
pub mod notification_store;

pub use notification_filter::{FilteredPage, InboxFilter};
pub use notification_models::{
    DeliveryChannel, Notification, NotificationCategory, NotificationPriority,
    NotificationStatus,
};
pub use notification_store::{InboxSnapshot, NotificationStore};
