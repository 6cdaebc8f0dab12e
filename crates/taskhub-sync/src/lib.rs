//! # taskhub-sync
//!
//! Client-side state for TaskHub views, built on the gateways of
//! `taskhub-client`.
//!
//! - [`Collection`]: a list scoped to one [`ListDescriptor`], with
//!   generation-checked fetches, value-deduplicated descriptor changes and
//!   server-confirmed add/edit/remove
//! - [`ResourceHandle`]: one entity addressed by an optional id
//! - [`SearchDebouncer`]: applies only the last of a burst of descriptors
//! - [`ActivityFeed`]: paged project activity that empties on failure
//! - [`Snapshot`]: what observers see, published over `tokio::sync::watch`
//!
//! [`ListDescriptor`]: taskhub_core::ListDescriptor

#![deny(unsafe_code)]

pub mod activity;
pub mod collection;
pub mod debounce;
pub mod handle;
pub mod snapshot;
mod tasks;

#[cfg(test)]
mod testing;

pub use activity::ActivityFeed;
pub use collection::{Collection, FetchOutcome};
pub use debounce::SearchDebouncer;
pub use handle::{EntityState, ResourceHandle};
pub use snapshot::{Phase, Snapshot, StatusCounts};
