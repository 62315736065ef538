use crate::domain::market::{MarketId, MarketItem};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Immutable view of every tracked market at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    /// When the latest refresh cycle started
    pub refreshed_at: Option<DateTime<Local>>,
    pub items: Vec<MarketItem>,
}

impl BoardSnapshot {
    pub fn initial(markets: &[MarketId]) -> Self {
        Self {
            refreshed_at: None,
            items: markets.iter().copied().map(MarketItem::placeholder).collect(),
        }
    }

    pub fn item(&self, id: MarketId) -> Option<&MarketItem> {
        self.items.iter().find(|it| it.id == id)
    }
}

/// Owner of the published board.
///
/// Writers never touch a snapshot in place: each publication clones the current
/// board, swaps in one item and sends the new `Arc`. Readers hold whichever
/// snapshot they borrowed and can never observe a half-applied update.
#[derive(Clone)]
pub struct SnapshotStore {
    tx: Arc<watch::Sender<Arc<BoardSnapshot>>>,
}

impl SnapshotStore {
    pub fn new(markets: &[MarketId]) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(BoardSnapshot::initial(markets)));
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<BoardSnapshot>> {
        self.tx.subscribe()
    }

    /// Latest published snapshot
    pub fn current(&self) -> Arc<BoardSnapshot> {
        self.tx.borrow().clone()
    }

    pub fn mark_refreshed(&self, at: DateTime<Local>) {
        self.tx.send_modify(|current| {
            let mut next = BoardSnapshot::clone(current);
            next.refreshed_at = Some(at);
            *current = Arc::new(next);
        });
    }

    /// Replaces the item for `item.id` wholesale.
    ///
    /// Returns `false` when the market is not on the board.
    pub fn publish(&self, item: MarketItem) -> bool {
        let mut replaced = false;
        self.tx.send_if_modified(|current| {
            let Some(idx) = current.items.iter().position(|it| it.id == item.id) else {
                return false;
            };
            let mut next = BoardSnapshot::clone(current);
            debug!("SnapshotStore: replacing item for {}", item.id);
            next.items[idx] = item.clone();
            *current = Arc::new(next);
            replaced = true;
            true
        });
        replaced
    }
}
