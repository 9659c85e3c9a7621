//! Cross-window broadcast bus
//!
//! All open windows of one application instance publish and subscribe on a
//! shared channel carrying ephemeral, structured messages. Delivery is
//! best-effort: messages are never persisted and never acknowledged, and
//! the protocol is built so redelivery or loss is tolerable. On platforms
//! with no cross-context messaging the bus degrades to [`NoopBus`] and tab
//! moves take effect only in the originating window.

use crate::tab::Tab;
use crate::window::WindowId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default channel capacity. Navigation traffic is tiny; lagged receivers
/// skip ahead rather than erroring.
const BUS_CAPACITY: usize = 256;

/// Ephemeral notification delivered to every window of the instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusMessage {
    /// A tab left `source_window_id` for `target_window_id`.
    #[serde(rename_all = "camelCase")]
    TabMoved {
        source_window_id: WindowId,
        target_window_id: WindowId,
        tab: Tab,
    },
    /// A window deregistered itself. Receivers take no direct action;
    /// registry cleanup stays lazy.
    #[serde(rename_all = "camelCase")]
    WindowClosed { window_id: WindowId },
    /// Liveness/refresh nudge.
    StateSync,
}

/// Publish/subscribe channel connecting all windows of the instance.
pub trait NavBus: Send + Sync {
    /// Best-effort publish; a message sent cannot be recalled.
    fn publish(&self, message: &BusMessage);
    /// New receiver observing messages published from now on.
    fn subscribe(&self) -> BusReceiver;
}

/// Receiving end handed to each window.
pub struct BusReceiver {
    rx: Option<broadcast::Receiver<BusMessage>>,
}

impl BusReceiver {
    fn noop() -> Self {
        Self { rx: None }
    }

    /// Pop the next pending message without blocking.
    pub fn try_recv(&mut self) -> Option<BusMessage> {
        let rx = self.rx.as_mut()?;
        loop {
            match rx.try_recv() {
                Ok(message) => return Some(message),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    log::warn!("Bus receiver lagged, skipped {} messages", skipped);
                }
                Err(_) => return None,
            }
        }
    }
}

/// In-process bus for single-process deployments: every window context in
/// the process shares one broadcast channel.
pub struct InProcessBus {
    tx: broadcast::Sender<BusMessage>,
}

impl InProcessBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }
}

impl Default for InProcessBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NavBus for InProcessBus {
    fn publish(&self, message: &BusMessage) {
        // No receivers is fine; the originating window already applied
        // whatever local state the message describes.
        let _ = self.tx.send(message.clone());
    }

    fn subscribe(&self) -> BusReceiver {
        BusReceiver {
            rx: Some(self.tx.subscribe()),
        }
    }
}

/// Degraded bus for platforms without cross-context messaging.
pub struct NoopBus;

impl NavBus for NoopBus {
    fn publish(&self, message: &BusMessage) {
        log::debug!("Bus unavailable, dropping {:?}", message);
    }

    fn subscribe(&self) -> BusReceiver {
        BusReceiver::noop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::TabType;

    #[test]
    fn publish_reaches_all_subscribers_including_sender_side() {
        let bus = InProcessBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(&BusMessage::StateSync);

        assert_eq!(a.try_recv(), Some(BusMessage::StateSync));
        assert_eq!(b.try_recv(), Some(BusMessage::StateSync));
        assert_eq!(a.try_recv(), None);
    }

    #[test]
    fn subscribe_after_publish_misses_message() {
        let bus = InProcessBus::new();
        bus.publish(&BusMessage::StateSync);
        let mut late = bus.subscribe();
        assert_eq!(late.try_recv(), None);
    }

    #[test]
    fn noop_bus_drops_everything() {
        let bus = NoopBus;
        let mut rx = bus.subscribe();
        bus.publish(&BusMessage::WindowClosed {
            window_id: "w-1".into(),
        });
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn message_wire_shape_matches_protocol_names() {
        let message = BusMessage::TabMoved {
            source_window_id: "a".into(),
            target_window_id: "b".into(),
            tab: Tab::new(TabType::ModelViewer, Some("42".into())),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "TAB_MOVED");
        assert_eq!(json["sourceWindowId"], "a");
        assert_eq!(json["targetWindowId"], "b");
        assert_eq!(json["tab"]["id"], "modelViewer:42");

        let closed = serde_json::to_value(&BusMessage::WindowClosed {
            window_id: "a".into(),
        })
        .unwrap();
        assert_eq!(closed["type"], "WINDOW_CLOSED");

        let sync = serde_json::to_value(&BusMessage::StateSync).unwrap();
        assert_eq!(sync["type"], "STATE_SYNC");
    }
}
