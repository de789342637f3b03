//! Queue views derived from the visit collection.

pub mod feed;
pub mod projection;

pub use feed::{QueueBoard, QueueFeed};
pub use projection::{live_feed, QueueProjection};
