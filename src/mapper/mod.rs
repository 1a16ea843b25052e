//! Consistent bulk transforms.
//!
//! - `ValueGroup`: positions sharing a card when the transform began
//! - `ConsistentMapper`: partitions a grid and rewrites one group at a time
//!
//! ## Design Philosophy
//!
//! Each group is rewritten atomically, so a matching pair is never seen
//! with different cards. The transform as a whole is not atomic: a reader
//! may see some groups rewritten and others not.

mod transform;

pub use transform::{ConsistentMapper, ValueGroup};
