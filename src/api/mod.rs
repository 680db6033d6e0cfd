pub mod client;
pub mod dto;

use async_trait::async_trait;

use crate::error::Result;
use crate::notification::{Notification, NotificationStatus};

pub use client::ApiClient;
pub use dto::NotificationQuery;

/// Which endpoint family a request targets. Elevated principals read the
/// admin-scoped variants; response shapes are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiScope {
    Own,
    Admin,
}

/// The REST surface the sync facade depends on, kept behind a trait so
/// tests can substitute a fake backend.
#[async_trait]
pub trait NotificationApi: Send + Sync {
    async fn list(&self, scope: ApiScope, query: &NotificationQuery) -> Result<Vec<Notification>>;

    async fn unread_count(&self, scope: ApiScope) -> Result<u64>;

    async fn update_status(&self, id: i64, status: NotificationStatus) -> Result<()>;

    async fn update_status_bulk(&self, ids: &[i64], status: NotificationStatus) -> Result<()>;
}
