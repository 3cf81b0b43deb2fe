// Per-consumer handoff slot

use tickfan_models::Event;
use tokio::sync::mpsc;

/// Single-slot mailbox owned by one consumer.
///
/// Capacity is one event: a delivery waits until the consumer loop has taken
/// the previous one, which is as close to a rendezvous as tokio channels get.
#[derive(Debug)]
pub struct Inbox {
    tx: mpsc::Sender<Event>,
    rx: Option<mpsc::Receiver<Event>>,
}

impl Inbox {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(1);
        Self { tx, rx: Some(rx) }
    }

    /// Sending side, handed to the publisher at registration.
    pub fn handle(&self) -> InboxHandle {
        InboxHandle { tx: self.tx.clone() }
    }

    /// Receiving side. Only one loop may ever drain an inbox, so this yields
    /// the receiver once.
    pub fn take_receiver(&mut self) -> Option<mpsc::Receiver<Event>> {
        self.rx.take()
    }

    pub fn is_attached(&self) -> bool {
        self.rx.is_none()
    }
}

impl Default for Inbox {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct InboxHandle {
    tx: mpsc::Sender<Event>,
}

impl InboxHandle {
    /// Waits until the slot is free, then hands over `event`.
    ///
    /// Returns the event back if the receiving loop is gone.
    pub async fn deliver(&self, event: Event) -> Result<(), Event> {
        self.tx.send(event).await.map_err(|err| err.0)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
