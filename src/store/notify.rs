//! Table-change notification.
//!
//! SQLite has no built-in live queries, so the write path publishes a
//! change signal per table after every committed write. Observe streams
//! subscribe to their table's channel and re-read on each signal.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Identity of one cache table, one per entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Launches,
    Rockets,
    Capsules,
    Cores,
    Crew,
    Ships,
    Dragons,
    Landpads,
    Launchpads,
    Payloads,
}

impl Table {
    /// Every cache table
    pub const ALL: [Table; 10] = [
        Table::Launches,
        Table::Rockets,
        Table::Capsules,
        Table::Cores,
        Table::Crew,
        Table::Ships,
        Table::Dragons,
        Table::Landpads,
        Table::Launchpads,
        Table::Payloads,
    ];

    /// SQL table name
    pub fn name(self) -> &'static str {
        match self {
            Table::Launches => "launches",
            Table::Rockets => "rockets",
            Table::Capsules => "capsules",
            Table::Cores => "cores",
            Table::Crew => "crew",
            Table::Ships => "ships",
            Table::Dragons => "dragons",
            Table::Landpads => "landpads",
            Table::Launchpads => "launchpads",
            Table::Payloads => "payloads",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-table broadcast of change signals.
///
/// Signals carry no payload; receivers re-read the table on wake-up, so a
/// lagged receiver coalesces missed signals into a single re-read.
#[derive(Clone)]
pub struct Notifier {
    channels: Arc<HashMap<Table, broadcast::Sender<()>>>,
}

impl Notifier {
    pub fn new() -> Self {
        let mut channels = HashMap::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            let (tx, _) = broadcast::channel(16);
            channels.insert(table, tx);
        }
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Subscribe to change signals for one table
    pub fn subscribe(&self, table: Table) -> broadcast::Receiver<()> {
        self.channels[&table].subscribe()
    }

    /// Publish a change signal. Called only after a committed write.
    pub fn notify(&self, table: Table) {
        // Send fails only when nobody is subscribed, which is fine.
        let _ = self.channels[&table].send(());
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notify_reaches_subscriber() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe(Table::Launches);
        notifier.notify(Table::Launches);
        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_tables_are_independent() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe(Table::Rockets);
        notifier.notify(Table::Launches);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_notify_without_subscribers_is_ok() {
        let notifier = Notifier::new();
        notifier.notify(Table::Ships);
    }
}
