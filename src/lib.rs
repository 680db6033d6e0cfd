//! Client-side synchronization engine for the pressing dashboard's
//! notification inbox: a REST snapshot merged with a live push channel,
//! exposed as one consistent read-model with optimistic mutations.

pub mod api;
pub mod channel;
pub mod config;
pub mod error;
pub mod notification;
pub mod principal;
pub mod sync;

pub use api::{ApiClient, ApiScope, NotificationApi, NotificationQuery};
pub use channel::{ChannelEvent, PushChannel};
pub use config::Config;
pub use error::{Result, SyncError};
pub use notification::{
    InboxFilter, InboxSnapshot, Notification, NotificationCategory, NotificationPriority,
    NotificationStatus, NotificationStore,
};
pub use principal::{Principal, Role};
pub use sync::NotificationSync;
