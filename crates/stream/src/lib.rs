//! Source, fan-out and supervision plumbing for the tick pipeline.
//!
//! ```text
//! EventSource ──► [bounded queue] ──► Publisher ──► inbox 1 ──► loop 1 ──► consumer1.process()
//!                                         │    └──► inbox 2 ──► loop 2 ──► consumer2.process()
//!                                         └───────► inbox N ──► loop N ──► consumerN.process()
//! ```
//!
//! Every stage observes the same [`CancellationToken`](tokio_util::sync::CancellationToken).
//! Derive it once and pass clones around; independently created tokens can
//! leave the publisher waiting on a loop that has already exited.

pub mod consumer;
pub mod inbox;
pub mod publisher;
pub mod source;
pub mod supervisor;

#[cfg(test)]
mod testing;

pub use consumer::*;
pub use inbox::*;
pub use publisher::*;
pub use source::*;
pub use supervisor::{ConsumerGroup, run as supervise};
