use serde::{Deserialize, Serialize};

use crate::notification::Notification;

/// Events fanned out to channel subscribers.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// A newly created notification pushed by the backend.
    Notification(Notification),
    /// Transport went up or down. Subscriptions are not durable across a
    /// drop; consumers redo their joins when this fires `true`.
    Connected(bool),
}

/// Server-to-client frames, as emitted on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerFrame {
    Notification(Notification),
    Connected(bool),
}

/// Client-to-server frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientFrame {
    Join { topic: String },
    Leave { topic: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_frame_wire_format() {
        let json = serde_json::to_string(&ClientFrame::Join {
            topic: "user.7".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"action":"join","topic":"user.7"}"#);
    }

    #[test]
    fn test_server_frame_decodes_notification_event() {
        let frame: ServerFrame = serde_json::from_str(
            r#"{"event": "notification", "data": {"id": 1, "titre": "t", "message": "m", "type": "commande", "priorite": "normale"}}"#,
        )
        .unwrap();
        match frame {
            ServerFrame::Notification(n) => assert_eq!(n.id, 1),
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[test]
    fn test_server_frame_decodes_connected_event() {
        let frame: ServerFrame = serde_json::from_str(r#"{"event": "connected", "data": true}"#).unwrap();
        assert!(matches!(frame, ServerFrame::Connected(true)));
    }
}
