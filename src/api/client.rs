use async_trait::async_trait;

use crate::error::{Result, SyncError};
use crate::notification::{Notification, NotificationStatus};

use super::dto::{
    BulkStatusUpdateRequest, CountResponse, ListEnvelope, NotificationQuery, StatusUpdateRequest,
};
use super::{ApiScope, NotificationApi};

/// `reqwest`-backed implementation of the notification REST endpoints.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn list_path(scope: ApiScope) -> &'static str {
        match scope {
            ApiScope::Own => "/api/notifications",
            ApiScope::Admin => "/api/admin/notifications",
        }
    }

    fn count_path(scope: ApiScope) -> &'static str {
        match scope {
            ApiScope::Own => "/api/notifications/non-lues/count",
            ApiScope::Admin => "/api/admin/notifications/unread-count",
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(SyncError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl NotificationApi for ApiClient {
    async fn list(&self, scope: ApiScope, query: &NotificationQuery) -> Result<Vec<Notification>> {
        let response = self
            .http
            .get(self.url(Self::list_path(scope)))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;
        let envelope: ListEnvelope = Self::check(response).await?.json().await?;
        if !envelope.success {
            return Err(SyncError::Api {
                status: 200,
                message: "backend reported failure".to_string(),
            });
        }
        Ok(envelope.data)
    }

    async fn unread_count(&self, scope: ApiScope) -> Result<u64> {
        let response = self
            .http
            .get(self.url(Self::count_path(scope)))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let count: CountResponse = Self::check(response).await?.json().await?;
        Ok(count.count)
    }

    async fn update_status(&self, id: i64, status: NotificationStatus) -> Result<()> {
        let response = self
            .http
            .patch(self.url(&format!("/api/notifications/{}/statut", id)))
            .bearer_auth(&self.token)
            .json(&StatusUpdateRequest { status })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update_status_bulk(&self, ids: &[i64], status: NotificationStatus) -> Result<()> {
        let response = self
            .http
            .patch(self.url("/api/notifications/statut"))
            .bearer_auth(&self.token)
            .json(&BulkStatusUpdateRequest {
                ids: ids.to_vec(),
                status,
            })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
