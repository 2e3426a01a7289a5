//! Storage backends
//!
//! `RoadmapBackend` is the seam between the REST surface / sync layer
//! and whatever actually holds the data: the Notion workspace-database
//! API or a local JSON store. The remote service is authoritative;
//! deletes affect exactly the addressed entity (cascades are driven by
//! the caller, matching the remote API's per-page archival).

pub mod local;
pub mod notion_backend;

use crate::model::{
    Deliverable, DeliverableDraft, DeliverablePatch, Goal, GoalDraft, GoalPatch, Initiative,
    InitiativeDraft, InitiativePatch,
};
use crate::types::Result;
use async_trait::async_trait;

pub use local::LocalStore;
pub use notion_backend::{NotionBackend, NotionDatabases};

#[async_trait]
pub trait RoadmapBackend: Send + Sync {
    async fn list_goals(&self) -> Result<Vec<Goal>>;
    async fn create_goal(&self, draft: &GoalDraft) -> Result<Goal>;
    async fn update_goal(&self, id: &str, patch: &GoalPatch) -> Result<Goal>;
    async fn delete_goal(&self, id: &str) -> Result<()>;

    async fn list_initiatives(&self) -> Result<Vec<Initiative>>;
    async fn create_initiative(&self, draft: &InitiativeDraft) -> Result<Initiative>;
    async fn update_initiative(&self, id: &str, patch: &InitiativePatch) -> Result<Initiative>;
    async fn delete_initiative(&self, id: &str) -> Result<()>;

    async fn list_deliverables(&self) -> Result<Vec<Deliverable>>;
    async fn create_deliverable(&self, draft: &DeliverableDraft) -> Result<Deliverable>;
    async fn update_deliverable(&self, id: &str, patch: &DeliverablePatch) -> Result<Deliverable>;
    async fn delete_deliverable(&self, id: &str) -> Result<()>;

    /// Fetch all three collections concurrently
    async fn fetch_all(&self) -> Result<(Vec<Goal>, Vec<Initiative>, Vec<Deliverable>)> {
        let (goals, initiatives, deliverables) = futures::try_join!(
            self.list_goals(),
            self.list_initiatives(),
            self.list_deliverables()
        )?;
        Ok((goals, initiatives, deliverables))
    }
}
