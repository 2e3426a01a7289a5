//! Optimistic sync service
//!
//! Sits between callers and a `RoadmapBackend`, keeping a local cache
//! that reflects every mutation immediately:
//!
//! - creates insert a `temp-` placeholder, then swap in the
//!   server-assigned entity once the remote call succeeds
//! - updates apply locally first and roll back to the pre-mutation
//!   snapshot if the remote call fails
//! - deletes and priority renumbering fan out several remote calls; a
//!   failure there leaves the remote state partially changed, so
//!   recovery is a full refetch rather than a rollback
//!
//! The remote service is authoritative: after every successful create
//! or update the server's version of the entity replaces the local one.

use crate::model::{
    Deliverable, DeliverableDraft, DeliverablePatch, Goal, GoalDraft, GoalPatch, Initiative,
    InitiativeDraft, InitiativePatch, Roadmap,
};
use crate::store::RoadmapBackend;
use crate::sync::cache::RoadmapCache;
use crate::types::{Result, SignpostError};
use futures::future::try_join_all;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

pub struct SyncService {
    backend: Arc<dyn RoadmapBackend>,
    cache: Mutex<RoadmapCache>,
}

fn temp_id() -> String {
    format!("temp-{}", Uuid::new_v4())
}

impl SyncService {
    pub fn new(backend: Arc<dyn RoadmapBackend>) -> Self {
        Self {
            backend,
            cache: Mutex::new(RoadmapCache::new()),
        }
    }

    /// Current local view of the roadmap
    pub async fn snapshot(&self) -> Roadmap {
        self.cache.lock().await.snapshot()
    }

    /// Discard the local view and reload everything from the backend
    pub async fn refresh(&self) -> Result<Roadmap> {
        let (goals, initiatives, deliverables) = self.backend.fetch_all().await?;
        info!(
            "Refreshed roadmap: {} goals, {} initiatives, {} deliverables",
            goals.len(),
            initiatives.len(),
            deliverables.len()
        );
        let mut cache = self.cache.lock().await;
        cache.load_data(goals, initiatives, deliverables);
        Ok(cache.snapshot())
    }

    /// Best-effort refetch after a fan-out failure left remote state
    /// partially changed. The original error is what the caller sees.
    async fn recover(&self, err: SignpostError) -> SignpostError {
        if let Err(refetch_err) = self.refresh().await {
            warn!("Refetch after failed mutation also failed: {}", refetch_err);
        }
        err
    }

    // =========================================================================
    // Goals
    // =========================================================================

    pub async fn create_goal(&self, draft: GoalDraft) -> Result<Goal> {
        let placeholder = temp_id();
        let before = {
            let mut cache = self.cache.lock().await;
            let before = cache.snapshot();
            cache.add_goal(Goal {
                id: placeholder.clone(),
                name: draft.name.clone(),
                description: draft.description.clone(),
                desired_outcome: draft.desired_outcome.clone(),
                priority: draft.priority,
                order: draft.order,
            });
            before
        };

        match self.backend.create_goal(&draft).await {
            Ok(goal) => {
                self.cache.lock().await.replace_goal(&placeholder, goal.clone());
                Ok(goal)
            }
            Err(err) => {
                self.cache.lock().await.restore(before);
                Err(err)
            }
        }
    }

    pub async fn update_goal(&self, id: &str, patch: GoalPatch) -> Result<Goal> {
        let before = {
            let mut cache = self.cache.lock().await;
            let before = cache.snapshot();
            if !cache.update_goal(id, &patch) {
                return Err(SignpostError::NotFound(format!("Goal {}", id)));
            }
            before
        };

        match self.backend.update_goal(id, &patch).await {
            Ok(goal) => {
                self.cache.lock().await.replace_goal(id, goal.clone());
                Ok(goal)
            }
            Err(err) => {
                self.cache.lock().await.restore(before);
                Err(err)
            }
        }
    }

    /// Delete a goal and its whole subtree, then renumber the surviving
    /// goals so priorities stay dense. Leaf-first remote order keeps a
    /// mid-flight failure from orphaning children.
    pub async fn delete_goal(&self, id: &str) -> Result<()> {
        let (initiative_ids, deliverable_ids, renumber) = {
            let cache = self.cache.lock().await;
            let snapshot = cache.snapshot();
            let Some(deleted) = snapshot.goal(id) else {
                return Err(SignpostError::NotFound(format!("Goal {}", id)));
            };
            let initiative_ids: Vec<String> = snapshot
                .initiatives
                .iter()
                .filter(|i| i.goal_id == id)
                .map(|i| i.id.clone())
                .collect();
            let deliverable_ids: Vec<String> = snapshot
                .deliverables
                .iter()
                .filter(|d| initiative_ids.contains(&d.initiative_id))
                .map(|d| d.id.clone())
                .collect();
            let renumber: Vec<(String, u32)> = snapshot
                .goals
                .iter()
                .filter(|g| g.priority > deleted.priority)
                .map(|g| (g.id.clone(), g.priority - 1))
                .collect();
            (initiative_ids, deliverable_ids, renumber)
        };

        self.cache.lock().await.delete_goal(id);

        let result: Result<()> = async {
            try_join_all(
                deliverable_ids
                    .iter()
                    .map(|d| self.backend.delete_deliverable(d)),
            )
            .await?;
            try_join_all(
                initiative_ids
                    .iter()
                    .map(|i| self.backend.delete_initiative(i)),
            )
            .await?;
            self.backend.delete_goal(id).await?;
            try_join_all(renumber.iter().map(|(goal_id, priority)| async move {
                let patch = GoalPatch {
                    priority: Some(*priority),
                    ..GoalPatch::default()
                };
                self.backend.update_goal(goal_id, &patch).await
            }))
            .await?;
            Ok(())
        }
        .await;

        match result {
            Ok(()) => Ok(()),
            Err(err) => Err(self.recover(err).await),
        }
    }

    /// Move a goal to a new priority slot and push every shifted
    /// sibling upstream
    pub async fn set_goal_priority(&self, id: &str, new_priority: u32) -> Result<Roadmap> {
        let changed = {
            let mut cache = self.cache.lock().await;
            if cache.snapshot().goal(id).is_none() {
                return Err(SignpostError::NotFound(format!("Goal {}", id)));
            }
            cache.set_goal_priority(id, new_priority)
        };
        if changed.is_empty() {
            return Ok(self.snapshot().await);
        }

        let result = try_join_all(changed.iter().map(|goal| async move {
            let patch = GoalPatch {
                priority: Some(goal.priority),
                ..GoalPatch::default()
            };
            self.backend.update_goal(&goal.id, &patch).await
        }))
        .await;

        match result {
            Ok(_) => Ok(self.snapshot().await),
            Err(err) => Err(self.recover(err).await),
        }
    }

    // =========================================================================
    // Initiatives
    // =========================================================================

    pub async fn create_initiative(&self, draft: InitiativeDraft) -> Result<Initiative> {
        let placeholder = temp_id();
        let before = {
            let mut cache = self.cache.lock().await;
            let before = cache.snapshot();
            cache.add_initiative(Initiative {
                id: placeholder.clone(),
                goal_id: draft.goal_id.clone(),
                name: draft.name.clone(),
                ideal_outcome: draft.ideal_outcome.clone(),
                order: draft.order,
            });
            before
        };

        match self.backend.create_initiative(&draft).await {
            Ok(initiative) => {
                self.cache
                    .lock()
                    .await
                    .replace_initiative(&placeholder, initiative.clone());
                Ok(initiative)
            }
            Err(err) => {
                self.cache.lock().await.restore(before);
                Err(err)
            }
        }
    }

    pub async fn update_initiative(&self, id: &str, patch: InitiativePatch) -> Result<Initiative> {
        let before = {
            let mut cache = self.cache.lock().await;
            let before = cache.snapshot();
            if !cache.update_initiative(id, &patch) {
                return Err(SignpostError::NotFound(format!("Initiative {}", id)));
            }
            before
        };

        match self.backend.update_initiative(id, &patch).await {
            Ok(initiative) => {
                self.cache
                    .lock()
                    .await
                    .replace_initiative(id, initiative.clone());
                Ok(initiative)
            }
            Err(err) => {
                self.cache.lock().await.restore(before);
                Err(err)
            }
        }
    }

    /// Delete an initiative and its deliverables, leaf-first
    pub async fn delete_initiative(&self, id: &str) -> Result<()> {
        let deliverable_ids: Vec<String> = {
            let cache = self.cache.lock().await;
            let snapshot = cache.snapshot();
            if snapshot.initiative(id).is_none() {
                return Err(SignpostError::NotFound(format!("Initiative {}", id)));
            }
            snapshot
                .deliverables
                .iter()
                .filter(|d| d.initiative_id == id)
                .map(|d| d.id.clone())
                .collect()
        };

        self.cache.lock().await.delete_initiative(id);

        let result: Result<()> = async {
            try_join_all(
                deliverable_ids
                    .iter()
                    .map(|d| self.backend.delete_deliverable(d)),
            )
            .await?;
            self.backend.delete_initiative(id).await
        }
        .await;

        match result {
            Ok(()) => Ok(()),
            Err(err) => Err(self.recover(err).await),
        }
    }

    /// Reparent an initiative under another goal
    pub async fn move_initiative(&self, id: &str, goal_id: &str) -> Result<Initiative> {
        self.update_initiative(
            id,
            InitiativePatch {
                goal_id: Some(goal_id.to_string()),
                ..InitiativePatch::default()
            },
        )
        .await
    }

    // =========================================================================
    // Deliverables
    // =========================================================================

    pub async fn create_deliverable(&self, draft: DeliverableDraft) -> Result<Deliverable> {
        let placeholder = temp_id();
        let before = {
            let mut cache = self.cache.lock().await;
            let before = cache.snapshot();
            cache.add_deliverable(Deliverable {
                id: placeholder.clone(),
                initiative_id: draft.initiative_id.clone(),
                name: draft.name.clone(),
                description: draft.description.clone(),
                status: draft.status,
                start_date: draft.start_date,
                end_date: draft.end_date,
                order: draft.order,
            });
            before
        };

        match self.backend.create_deliverable(&draft).await {
            Ok(deliverable) => {
                self.cache
                    .lock()
                    .await
                    .replace_deliverable(&placeholder, deliverable.clone());
                Ok(deliverable)
            }
            Err(err) => {
                self.cache.lock().await.restore(before);
                Err(err)
            }
        }
    }

    pub async fn update_deliverable(
        &self,
        id: &str,
        patch: DeliverablePatch,
    ) -> Result<Deliverable> {
        let before = {
            let mut cache = self.cache.lock().await;
            let before = cache.snapshot();
            if !cache.update_deliverable(id, &patch) {
                return Err(SignpostError::NotFound(format!("Deliverable {}", id)));
            }
            before
        };

        match self.backend.update_deliverable(id, &patch).await {
            Ok(deliverable) => {
                self.cache
                    .lock()
                    .await
                    .replace_deliverable(id, deliverable.clone());
                Ok(deliverable)
            }
            Err(err) => {
                self.cache.lock().await.restore(before);
                Err(err)
            }
        }
    }

    pub async fn delete_deliverable(&self, id: &str) -> Result<()> {
        {
            let mut cache = self.cache.lock().await;
            if cache.snapshot().deliverable(id).is_none() {
                return Err(SignpostError::NotFound(format!("Deliverable {}", id)));
            }
            cache.delete_deliverable(id);
        }

        match self.backend.delete_deliverable(id).await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.recover(err).await),
        }
    }

    /// Reparent a deliverable under another initiative
    pub async fn move_deliverable(&self, id: &str, initiative_id: &str) -> Result<Deliverable> {
        self.update_deliverable(
            id,
            DeliverablePatch {
                initiative_id: Some(initiative_id.to_string()),
                ..DeliverablePatch::default()
            },
        )
        .await
    }
}
