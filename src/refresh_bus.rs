//! Cross-screen refresh commands.
//!
//! The shell (menu bar, keyboard shortcut, pull gesture relay) asks the
//! currently visible screen to refresh itself by publishing a command here.
//! The active screen's view model holds a subscription for as long as it is
//! visible; screens that are not visible simply are not subscribed.

use tokio::sync::broadcast;

/// A request for the subscribed screen to refresh its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshCommand;

/// Broadcast channel carrying refresh commands.
#[derive(Clone)]
pub struct RefreshBus {
    tx: broadcast::Sender<RefreshCommand>,
}

impl RefreshBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(8);
        Self { tx }
    }

    /// Ask the active screen to refresh. A no-op when nothing is subscribed.
    pub fn request_refresh(&self) {
        let _ = self.tx.send(RefreshCommand);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RefreshCommand> {
        self.tx.subscribe()
    }
}

impl Default for RefreshBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_command_reaches_subscriber() {
        let bus = RefreshBus::new();
        let mut rx = bus.subscribe();
        bus.request_refresh();
        assert_eq!(rx.recv().await.unwrap(), RefreshCommand);
    }

    #[test]
    fn test_request_without_subscribers_is_ok() {
        let bus = RefreshBus::new();
        bus.request_refresh();
    }
}
