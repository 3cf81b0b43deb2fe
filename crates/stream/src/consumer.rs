// Consumer capability shared by the publisher and the supervisor

use async_trait::async_trait;
use tickfan_models::{Event, Result};

use crate::inbox::Inbox;

/// A named unit of work fed one event at a time through its own [`Inbox`].
///
/// The publisher only touches the inbox; the supervisor owns the consumer
/// and is the only caller of [`Consumer::process`]. Any state a consumer
/// keeps is therefore private to its loop.
///
/// ### Implementation requirements
/// - Use async waits; a blocking `process` stalls every loop sharing its
///   runtime worker. Move blocking or CPU-heavy work to
///   [`tokio::task::spawn_blocking`].
/// - Report bad input with an error instead of panicking.
#[async_trait]
pub trait Consumer: Send + 'static {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Handles one event. An error is reported by the loop and the loop moves
    /// on to the next event.
    async fn process(&mut self, event: &Event) -> Result<()>;

    fn inbox(&self) -> &Inbox;

    fn inbox_mut(&mut self) -> &mut Inbox;
}
