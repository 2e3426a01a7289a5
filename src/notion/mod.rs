//! Notion workspace-database integration
//!
//! - **client**: thin reqwest client for the Notion REST API
//!   (database query, page create/update/archive)
//! - **props**: property JSON construction and extraction for the three
//!   roadmap databases

pub mod client;
pub mod props;

pub use client::{classify_upstream_error, NotionClient, NotionConfig, NOTION_VERSION};
