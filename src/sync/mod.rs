//! Optimistic sync layer
//!
//! - **cache**: pure state transitions over the local roadmap aggregate
//!   (cascades, priority renumbering, placeholder swaps)
//! - **service**: drives a `RoadmapBackend` with optimistic local
//!   application, rollback on failed single-call mutations, and full
//!   refetch after failed fan-outs

pub mod cache;
pub mod service;

pub use cache::RoadmapCache;
pub use service::SyncService;
