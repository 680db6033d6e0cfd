use serde::{Deserialize, Serialize};

use crate::notification::{
    Notification, NotificationCategory, NotificationPriority, NotificationStatus,
};

/// `{success, data}` envelope the list endpoints wrap their payload in.
#[derive(Debug, Deserialize)]
pub struct ListEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Notification>,
}

/// Unread-count response. The admin endpoint answers `{"count": n}`, the
/// self-scoped one `{"nonLuesCount": n}`; both land on the same field.
#[derive(Debug, Deserialize)]
pub struct CountResponse {
    #[serde(alias = "nonLuesCount")]
    pub count: u64,
}

/// Query parameters the list endpoints understand. `search` never goes to
/// the server; the free-text term is applied client-side over the returned
/// page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(rename = "statut", skip_serializing_if = "Option::is_none")]
    pub status: Option<NotificationStatus>,
    #[serde(rename = "categorie", skip_serializing_if = "Option::is_none")]
    pub category: Option<NotificationCategory>,
    #[serde(rename = "priorite", skip_serializing_if = "Option::is_none")]
    pub priority: Option<NotificationPriority>,
    #[serde(skip)]
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateRequest {
    #[serde(rename = "statut")]
    pub status: NotificationStatus,
}

#[derive(Debug, Serialize)]
pub struct BulkStatusUpdateRequest {
    pub ids: Vec<i64>,
    #[serde(rename = "statut")]
    pub status: NotificationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_response_accepts_both_field_names() {
        let admin: CountResponse = serde_json::from_str(r#"{"count": 4}"#).unwrap();
        assert_eq!(admin.count, 4);

        let own: CountResponse = serde_json::from_str(r#"{"nonLuesCount": 2}"#).unwrap();
        assert_eq!(own.count, 2);
    }

    #[test]
    fn test_list_envelope_tolerates_missing_data() {
        let envelope: ListEnvelope = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(envelope.success);
        assert!(envelope.data.is_empty());
    }

    #[test]
    fn test_query_serializes_server_vocabulary_only() {
        let query = NotificationQuery {
            page: Some(1),
            page_size: Some(20),
            status: Some(NotificationStatus::Unread),
            category: None,
            priority: Some(NotificationPriority::High),
            search: Some("commande".to_string()),
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "page": 1,
                "page_size": 20,
                "statut": "non_lue",
                "priorite": "haute",
            })
        );
    }

    #[test]
    fn test_status_update_body() {
        let body = serde_json::to_string(&StatusUpdateRequest {
            status: NotificationStatus::Deleted,
        })
        .unwrap();
        assert_eq!(body, r#"{"statut":"supprimee"}"#);
    }
}
