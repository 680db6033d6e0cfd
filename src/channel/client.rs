use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc};

use super::types::{ChannelEvent, ClientFrame, ServerFrame};

const EVENT_BUFFER: usize = 256;

/// Handle to the process-wide push channel.
///
/// Owns the record of joined topics and the event fan-out; the actual
/// transport is driven separately through the [`TransportHandle`] returned
/// by [`PushChannel::new`], so tests can stand in for the network.
#[derive(Clone)]
pub struct PushChannel {
    inner: Arc<ChannelInner>,
}

struct ChannelInner {
    connected: AtomicBool,
    // topic -> whether a join frame was sent on the current connection
    topics: DashMap<String, bool>,
    commands: mpsc::UnboundedSender<ClientFrame>,
    events: broadcast::Sender<ChannelEvent>,
}

impl PushChannel {
    pub fn new() -> (Self, TransportHandle) {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let (commands, command_rx) = mpsc::unbounded_channel();
        let inner = Arc::new(ChannelInner {
            connected: AtomicBool::new(false),
            topics: DashMap::new(),
            commands,
            events,
        });
        let handle = TransportHandle {
            pump: EventPump {
                inner: Arc::clone(&inner),
            },
            commands: command_rx,
        };
        (Self { inner }, handle)
    }

    /// Join a topic. Idempotent per connection: joining a topic whose join
    /// frame already went out on the current connection is a no-op, while a
    /// join after a reconnect sends the frame again.
    pub fn join(&self, topic: &str) {
        let mut entry = self.inner.topics.entry(topic.to_string()).or_insert(false);
        if !*entry.value() && self.is_connected() {
            let _ = self.inner.commands.send(ClientFrame::Join {
                topic: topic.to_string(),
            });
            *entry.value_mut() = true;
            tracing::debug!("joined topic {}", topic);
        }
    }

    /// Leave a topic and forget it; it will not be rejoined on reconnect.
    pub fn leave(&self, topic: &str) {
        if let Some((topic, sent)) = self.inner.topics.remove(topic) {
            if sent && self.is_connected() {
                let _ = self.inner.commands.send(ClientFrame::Leave { topic });
            }
        }
    }

    /// Subscribe to channel events. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.inner.events.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    /// Topics currently recorded, joined or pending.
    pub fn topics(&self) -> Vec<String> {
        self.inner.topics.iter().map(|e| e.key().clone()).collect()
    }
}

/// Event injection side of the channel, held by the transport runner.
#[derive(Clone)]
pub struct EventPump {
    inner: Arc<ChannelInner>,
}

impl EventPump {
    /// Record the transport state and fan the change out to subscribers.
    /// A drop resets every topic's joined flag: server-side membership is
    /// gone and the next `join` call must resend the frame.
    pub fn set_connected(&self, up: bool) {
        self.inner.connected.store(up, Ordering::SeqCst);
        if !up {
            for mut entry in self.inner.topics.iter_mut() {
                *entry.value_mut() = false;
            }
        }
        let _ = self.inner.events.send(ChannelEvent::Connected(up));
    }

    pub fn deliver(&self, frame: ServerFrame) {
        match frame {
            ServerFrame::Notification(n) => {
                let _ = self.inner.events.send(ChannelEvent::Notification(n));
            }
            ServerFrame::Connected(up) => self.set_connected(up),
        }
    }
}

/// What the transport runner (or a test) drives the channel with.
pub struct TransportHandle {
    pub(crate) pump: EventPump,
    pub(crate) commands: mpsc::UnboundedReceiver<ClientFrame>,
}

impl TransportHandle {
    pub fn set_connected(&self, up: bool) {
        self.pump.set_connected(up)
    }

    pub fn deliver(&self, frame: ServerFrame) {
        self.pump.deliver(frame)
    }

    /// Next outbound frame, if one is queued.
    pub fn try_next_command(&mut self) -> Option<ClientFrame> {
        self.commands.try_recv().ok()
    }

    pub(crate) fn into_parts(self) -> (EventPump, mpsc::UnboundedReceiver<ClientFrame>) {
        (self.pump, self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::Notification;

    fn notif(id: i64) -> Notification {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "titre": format!("n{}", id),
            "message": "m",
            "type": "commande",
            "priorite": "normale",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_join_is_idempotent_while_connected() {
        let (channel, mut handle) = PushChannel::new();
        handle.set_connected(true);

        channel.join("user.7");
        channel.join("user.7");

        assert_eq!(
            handle.try_next_command(),
            Some(ClientFrame::Join {
                topic: "user.7".to_string()
            })
        );
        assert_eq!(handle.try_next_command(), None);
    }

    #[tokio::test]
    async fn test_join_resends_after_reconnect() {
        let (channel, mut handle) = PushChannel::new();
        handle.set_connected(true);
        channel.join("user.7");
        assert!(handle.try_next_command().is_some());

        handle.set_connected(false);
        handle.set_connected(true);

        // Subscription is not durable across the drop; the redo must go out.
        channel.join("user.7");
        assert_eq!(
            handle.try_next_command(),
            Some(ClientFrame::Join {
                topic: "user.7".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_join_while_disconnected_sends_nothing() {
        let (channel, mut handle) = PushChannel::new();
        channel.join("user.7");
        assert_eq!(handle.try_next_command(), None);
        assert_eq!(channel.topics(), vec!["user.7".to_string()]);
    }

    #[tokio::test]
    async fn test_leave_sends_frame_and_forgets_topic() {
        let (channel, mut handle) = PushChannel::new();
        handle.set_connected(true);
        channel.join("user.7");
        handle.try_next_command();

        channel.leave("user.7");
        assert_eq!(
            handle.try_next_command(),
            Some(ClientFrame::Leave {
                topic: "user.7".to_string()
            })
        );
        assert!(channel.topics().is_empty());

        // Leaving an unknown topic is harmless.
        channel.leave("user.7");
        assert_eq!(handle.try_next_command(), None);
    }

    #[tokio::test]
    async fn test_events_are_delivered_in_order() {
        let (channel, handle) = PushChannel::new();
        let mut events = channel.subscribe();

        handle.set_connected(true);
        handle.deliver(ServerFrame::Notification(notif(1)));
        handle.deliver(ServerFrame::Notification(notif(2)));

        assert!(matches!(events.recv().await, Ok(ChannelEvent::Connected(true))));
        match events.recv().await {
            Ok(ChannelEvent::Notification(n)) => assert_eq!(n.id, 1),
            other => panic!("unexpected event: {:?}", other),
        }
        match events.recv().await {
            Ok(ChannelEvent::Notification(n)) => assert_eq!(n.id, 2),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_disconnect_surfaces_as_state_only() {
        let (channel, handle) = PushChannel::new();
        let mut events = channel.subscribe();

        handle.set_connected(true);
        handle.set_connected(false);

        assert!(matches!(events.recv().await, Ok(ChannelEvent::Connected(true))));
        assert!(matches!(events.recv().await, Ok(ChannelEvent::Connected(false))));
        assert!(!channel.is_connected());
    }
}
