//! Notion-backed roadmap storage
//!
//! Implements `RoadmapBackend` over the three workspace databases.
//! Deletes archive the page rather than destroying it, which is how
//! the upstream API models removal.

use crate::model::{
    Deliverable, DeliverableDraft, DeliverablePatch, Goal, GoalDraft, GoalPatch, Initiative,
    InitiativeDraft, InitiativePatch,
};
use crate::notion::props;
use crate::notion::{NotionClient, NotionConfig};
use crate::store::RoadmapBackend;
use crate::types::Result;
use async_trait::async_trait;
use tracing::info;

#[derive(Debug, Clone)]
pub struct NotionDatabases {
    pub goals: String,
    pub initiatives: String,
    pub deliverables: String,
}

pub struct NotionBackend {
    client: NotionClient,
    databases: NotionDatabases,
}

impl NotionBackend {
    pub fn new(config: NotionConfig, databases: NotionDatabases) -> Result<Self> {
        let client = NotionClient::new(config)?;
        Ok(Self { client, databases })
    }
}

#[async_trait]
impl RoadmapBackend for NotionBackend {
    async fn list_goals(&self) -> Result<Vec<Goal>> {
        let pages = self.client.query_database(&self.databases.goals).await?;
        info!("Fetched {} goal page(s)", pages.len());
        Ok(pages.iter().map(props::goal_from_page).collect())
    }

    async fn create_goal(&self, draft: &GoalDraft) -> Result<Goal> {
        let page = self
            .client
            .create_page(&self.databases.goals, props::goal_create_props(draft))
            .await?;
        Ok(props::goal_from_page(&page))
    }

    async fn update_goal(&self, id: &str, patch: &GoalPatch) -> Result<Goal> {
        let page = self
            .client
            .update_page(id, props::goal_patch_props(patch))
            .await?;
        Ok(props::goal_from_page(&page))
    }

    async fn delete_goal(&self, id: &str) -> Result<()> {
        self.client.archive_page(id).await
    }

    async fn list_initiatives(&self) -> Result<Vec<Initiative>> {
        let pages = self
            .client
            .query_database(&self.databases.initiatives)
            .await?;
        info!("Fetched {} initiative page(s)", pages.len());
        Ok(pages.iter().map(props::initiative_from_page).collect())
    }

    async fn create_initiative(&self, draft: &InitiativeDraft) -> Result<Initiative> {
        let page = self
            .client
            .create_page(
                &self.databases.initiatives,
                props::initiative_create_props(draft),
            )
            .await?;
        Ok(props::initiative_from_page(&page))
    }

    async fn update_initiative(&self, id: &str, patch: &InitiativePatch) -> Result<Initiative> {
        let page = self
            .client
            .update_page(id, props::initiative_patch_props(patch))
            .await?;
        Ok(props::initiative_from_page(&page))
    }

    async fn delete_initiative(&self, id: &str) -> Result<()> {
        self.client.archive_page(id).await
    }

    async fn list_deliverables(&self) -> Result<Vec<Deliverable>> {
        let pages = self
            .client
            .query_database(&self.databases.deliverables)
            .await?;
        info!("Fetched {} deliverable page(s)", pages.len());
        Ok(pages.iter().map(props::deliverable_from_page).collect())
    }

    async fn create_deliverable(&self, draft: &DeliverableDraft) -> Result<Deliverable> {
        let page = self
            .client
            .create_page(
                &self.databases.deliverables,
                props::deliverable_create_props(draft),
            )
            .await?;
        Ok(props::deliverable_from_page(&page))
    }

    async fn update_deliverable(&self, id: &str, patch: &DeliverablePatch) -> Result<Deliverable> {
        let page = self
            .client
            .update_page(id, props::deliverable_patch_props(patch))
            .await?;
        Ok(props::deliverable_from_page(&page))
    }

    async fn delete_deliverable(&self, id: &str) -> Result<()> {
        self.client.archive_page(id).await
    }
}
