//! Signpost - roadmap planning gateway
//!
//! Signpost serves a product roadmap (goals, initiatives, deliverables)
//! over a small REST surface, backed by either the Notion
//! workspace-database API or a local JSON store.
//!
//! ## Services
//!
//! - **Gateway**: REST proxy for roadmap CRUD with shared-key auth
//! - **Sync**: optimistic local cache over any backend, with rollback
//!   and refetch recovery
//! - **Timeline**: interval stacking, date-to-percent scale mapping and
//!   row layout for Gantt-style rendering
//! - **Export**: nested roadmap structure and markdown overview

pub mod auth;
pub mod config;
pub mod export;
pub mod model;
pub mod notion;
pub mod routes;
pub mod server;
pub mod store;
pub mod sync;
pub mod timeline;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{Result, SignpostError};
