use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NotificationStatus {
    #[default]
    #[serde(rename = "non_lue")]
    Unread,
    #[serde(rename = "lue")]
    Read,
    #[serde(rename = "supprimee")]
    Deleted,
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationStatus::Unread => write!(f, "non_lue"),
            NotificationStatus::Read => write!(f, "lue"),
            NotificationStatus::Deleted => write!(f, "supprimee"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NotificationCategory {
    #[serde(rename = "commande")]
    Order,
    #[serde(rename = "paiement")]
    Payment,
    #[serde(rename = "service")]
    Service,
    #[serde(rename = "promotion")]
    Promotion,
    #[default]
    #[serde(rename = "autre")]
    #[serde(other)]
    Other,
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationCategory::Order => write!(f, "commande"),
            NotificationCategory::Payment => write!(f, "paiement"),
            NotificationCategory::Service => write!(f, "service"),
            NotificationCategory::Promotion => write!(f, "promotion"),
            NotificationCategory::Other => write!(f, "autre"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NotificationPriority {
    #[serde(rename = "basse")]
    Low,
    #[default]
    #[serde(rename = "normale")]
    Normal,
    #[serde(rename = "haute")]
    High,
    #[serde(rename = "critique")]
    Critical,
}

impl std::fmt::Display for NotificationPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationPriority::Low => write!(f, "basse"),
            NotificationPriority::Normal => write!(f, "normale"),
            NotificationPriority::High => write!(f, "haute"),
            NotificationPriority::Critical => write!(f, "critique"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeliveryChannel {
    #[default]
    #[serde(rename = "in_app")]
    InApp,
    #[serde(rename = "autre")]
    #[serde(other)]
    Other,
}

/// One inbox entry, as the backend serializes it.
///
/// Push payloads only guarantee `id`, `titre`, `message`, `type` and `priorite`;
/// every other field falls back to a default instead of failing the decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "titre")]
    pub title: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub category: NotificationCategory,
    #[serde(rename = "priorite", default)]
    pub priority: NotificationPriority,
    #[serde(rename = "canal", default)]
    pub channel: DeliveryChannel,
    #[serde(rename = "statut", default)]
    pub status: NotificationStatus,
    #[serde(rename = "lien", default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(rename = "donnees", default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(rename = "dateCreation", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "destinataireId", default)]
    pub recipient_id: i64,
    #[serde(rename = "expediteurId", default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(NotificationStatus::Unread.to_string(), "non_lue");
        assert_eq!(NotificationStatus::Read.to_string(), "lue");
        assert_eq!(NotificationStatus::Deleted.to_string(), "supprimee");
    }

    #[test]
    fn test_minimal_push_payload_gets_defaults() {
        let n: Notification = serde_json::from_str(
            r#"{"id": 42, "titre": "Commande prete", "message": "La commande #18 est prete", "type": "commande", "priorite": "haute"}"#,
        )
        .unwrap();

        assert_eq!(n.id, 42);
        assert_eq!(n.category, NotificationCategory::Order);
        assert_eq!(n.priority, NotificationPriority::High);
        assert_eq!(n.channel, DeliveryChannel::InApp);
        assert_eq!(n.status, NotificationStatus::Unread);
        assert!(n.link.is_none());
        assert!(n.payload.is_none());
        assert_eq!(n.recipient_id, 0);
    }

    #[test]
    fn test_unknown_category_maps_to_other() {
        let n: Notification = serde_json::from_str(
            r#"{"id": 1, "titre": "t", "message": "m", "type": "fidelite", "priorite": "basse"}"#,
        )
        .unwrap();

        assert_eq!(n.category, NotificationCategory::Other);
    }

    #[test]
    fn test_full_payload_roundtrip() {
        let json = serde_json::json!({
            "id": 9,
            "titre": "Paiement recu",
            "message": "Paiement de 35 EUR confirme",
            "type": "paiement",
            "priorite": "normale",
            "canal": "in_app",
            "statut": "lue",
            "lien": "/commandes/18",
            "donnees": {"commandeId": 18},
            "dateCreation": "2026-08-20T10:00:00Z",
            "destinataireId": 7,
            "expediteurId": 3
        });

        let n: Notification = serde_json::from_value(json).unwrap();
        assert_eq!(n.status, NotificationStatus::Read);
        assert_eq!(n.link.as_deref(), Some("/commandes/18"));
        assert_eq!(n.sender_id, Some(3));
        assert_eq!(n.recipient_id, 7);

        let back: Notification = serde_json::from_value(serde_json::to_value(&n).unwrap()).unwrap();
        assert_eq!(back.id, n.id);
        assert_eq!(back.status, n.status);
        assert_eq!(back.created_at, n.created_at);
        assert_eq!(back.payload, n.payload);
    }
}
