//! Local JSON store
//!
//! File-backed fallback when Notion is not configured. The whole
//! roadmap aggregate is persisted as a single JSON blob after every
//! mutation; import/export round-trip this exact shape. A corrupt or
//! missing file starts an empty roadmap instead of failing.

use crate::model::{
    Deliverable, DeliverableDraft, DeliverablePatch, Goal, GoalDraft, GoalPatch, Initiative,
    InitiativeDraft, InitiativePatch, Roadmap,
};
use crate::store::RoadmapBackend;
use crate::types::{Result, SignpostError};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

pub struct LocalStore {
    path: PathBuf,
    state: Mutex<Roadmap>,
}

impl LocalStore {
    /// Open the store at `path`, loading existing data if present
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let roadmap = match std::fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(roadmap) => roadmap,
                Err(e) => {
                    warn!("Local store at {:?} is corrupt, starting empty: {}", path, e);
                    Roadmap::new()
                }
            },
            Err(_) => Roadmap::new(),
        };
        info!(
            "Local store opened: {:?} ({} goals, {} initiatives, {} deliverables)",
            path,
            roadmap.goals.len(),
            roadmap.initiatives.len(),
            roadmap.deliverables.len()
        );
        Self {
            path,
            state: Mutex::new(roadmap),
        }
    }

    fn persist(&self, roadmap: &Roadmap) -> Result<()> {
        let json = serde_json::to_string_pretty(roadmap)?;
        std::fs::write(&self.path, json)
            .map_err(|e| SignpostError::Storage(format!("Failed to write {:?}: {}", self.path, e)))
    }

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Snapshot of the full aggregate (export)
    pub async fn export_roadmap(&self) -> Roadmap {
        self.state.lock().await.clone()
    }

    /// Replace the full aggregate (import)
    pub async fn import_roadmap(&self, roadmap: Roadmap) -> Result<()> {
        let mut state = self.state.lock().await;
        *state = roadmap;
        state.updated_at = Utc::now();
        self.persist(&state)
    }
}

#[async_trait]
impl RoadmapBackend for LocalStore {
    async fn list_goals(&self) -> Result<Vec<Goal>> {
        Ok(self.state.lock().await.goals.clone())
    }

    async fn create_goal(&self, draft: &GoalDraft) -> Result<Goal> {
        let goal = Goal {
            id: Self::new_id(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            desired_outcome: draft.desired_outcome.clone(),
            priority: draft.priority,
            order: draft.order,
        };
        let mut state = self.state.lock().await;
        state.goals.push(goal.clone());
        state.updated_at = Utc::now();
        self.persist(&state)?;
        Ok(goal)
    }

    async fn update_goal(&self, id: &str, patch: &GoalPatch) -> Result<Goal> {
        let mut state = self.state.lock().await;
        let goal = state
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| SignpostError::NotFound(format!("Goal {}", id)))?;
        goal.apply(patch);
        let updated = goal.clone();
        state.updated_at = Utc::now();
        self.persist(&state)?;
        Ok(updated)
    }

    async fn delete_goal(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let before = state.goals.len();
        state.goals.retain(|g| g.id != id);
        if state.goals.len() == before {
            return Err(SignpostError::NotFound(format!("Goal {}", id)));
        }
        state.updated_at = Utc::now();
        self.persist(&state)
    }

    async fn list_initiatives(&self) -> Result<Vec<Initiative>> {
        Ok(self.state.lock().await.initiatives.clone())
    }

    async fn create_initiative(&self, draft: &InitiativeDraft) -> Result<Initiative> {
        let initiative = Initiative {
            id: Self::new_id(),
            goal_id: draft.goal_id.clone(),
            name: draft.name.clone(),
            ideal_outcome: draft.ideal_outcome.clone(),
            order: draft.order,
        };
        let mut state = self.state.lock().await;
        state.initiatives.push(initiative.clone());
        state.updated_at = Utc::now();
        self.persist(&state)?;
        Ok(initiative)
    }

    async fn update_initiative(&self, id: &str, patch: &InitiativePatch) -> Result<Initiative> {
        let mut state = self.state.lock().await;
        let initiative = state
            .initiatives
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| SignpostError::NotFound(format!("Initiative {}", id)))?;
        initiative.apply(patch);
        let updated = initiative.clone();
        state.updated_at = Utc::now();
        self.persist(&state)?;
        Ok(updated)
    }

    async fn delete_initiative(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let before = state.initiatives.len();
        state.initiatives.retain(|i| i.id != id);
        if state.initiatives.len() == before {
            return Err(SignpostError::NotFound(format!("Initiative {}", id)));
        }
        state.updated_at = Utc::now();
        self.persist(&state)
    }

    async fn list_deliverables(&self) -> Result<Vec<Deliverable>> {
        Ok(self.state.lock().await.deliverables.clone())
    }

    async fn create_deliverable(&self, draft: &DeliverableDraft) -> Result<Deliverable> {
        let deliverable = Deliverable {
            id: Self::new_id(),
            initiative_id: draft.initiative_id.clone(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            status: draft.status,
            start_date: draft.start_date,
            end_date: draft.end_date,
            order: draft.order,
        };
        let mut state = self.state.lock().await;
        state.deliverables.push(deliverable.clone());
        state.updated_at = Utc::now();
        self.persist(&state)?;
        Ok(deliverable)
    }

    async fn update_deliverable(&self, id: &str, patch: &DeliverablePatch) -> Result<Deliverable> {
        let mut state = self.state.lock().await;
        let deliverable = state
            .deliverables
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| SignpostError::NotFound(format!("Deliverable {}", id)))?;
        deliverable.apply(patch);
        let updated = deliverable.clone();
        state.updated_at = Utc::now();
        self.persist(&state)?;
        Ok(updated)
    }

    async fn delete_deliverable(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let before = state.deliverables.len();
        state.deliverables.retain(|d| d.id != id);
        if state.deliverables.len() == before {
            return Err(SignpostError::NotFound(format!("Deliverable {}", id)));
        }
        state.updated_at = Utc::now();
        self.persist(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeliverableStatus;
    use tempfile::tempdir;

    fn goal_draft(name: &str, priority: u32) -> GoalDraft {
        GoalDraft {
            name: name.into(),
            description: None,
            desired_outcome: "done".into(),
            priority,
            order: priority - 1,
        }
    }

    #[tokio::test]
    async fn test_create_and_reload_round_trip() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("roadmap.json");

        let store = LocalStore::open(&path);
        let goal = store.create_goal(&goal_draft("Grow", 1)).await.unwrap();
        store
            .create_deliverable(&DeliverableDraft {
                initiative_id: "i1".into(),
                name: "Ship".into(),
                description: None,
                status: DeliverableStatus::Planned,
                start_date: None,
                end_date: None,
                order: 0,
            })
            .await
            .unwrap();

        // Re-open from disk and verify the same data comes back
        let reopened = LocalStore::open(&path);
        let goals = reopened.list_goals().await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].id, goal.id);
        assert_eq!(reopened.list_deliverables().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_merges_partial_fields() {
        let dir = tempdir().expect("tempdir");
        let store = LocalStore::open(dir.path().join("r.json"));
        let goal = store.create_goal(&goal_draft("Grow", 1)).await.unwrap();

        let updated = store
            .update_goal(
                &goal.id,
                &GoalPatch {
                    priority: Some(3),
                    ..GoalPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.priority, 3);
        assert_eq!(updated.name, "Grow");
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let dir = tempdir().expect("tempdir");
        let store = LocalStore::open(dir.path().join("r.json"));
        let err = store.delete_goal("nope").await.unwrap_err();
        assert!(matches!(err, SignpostError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("r.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = LocalStore::open(&path);
        assert!(store.list_goals().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_export_round_trip() {
        let dir = tempdir().expect("tempdir");
        let store = LocalStore::open(dir.path().join("r.json"));
        store.create_goal(&goal_draft("Grow", 1)).await.unwrap();

        let exported = store.export_roadmap().await;
        let other = LocalStore::open(dir.path().join("other.json"));
        other.import_roadmap(exported.clone()).await.unwrap();
        let reimported = other.export_roadmap().await;
        assert_eq!(exported.goals, reimported.goals);
        assert_eq!(exported.id, reimported.id);
    }
}
