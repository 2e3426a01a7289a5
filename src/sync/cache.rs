//! Local roadmap cache
//!
//! Pure state transitions over the roadmap aggregate. Every mutation
//! the sync service performs optimistically goes through here, so the
//! cascade and renumbering rules live in exactly one place:
//!
//! - deleting a goal removes its initiatives and their deliverables,
//!   and closes the priority gap it leaves behind
//! - deleting an initiative removes its deliverables
//! - moving a goal to a new priority shifts every goal between the old
//!   and new slot by one, keeping priorities dense and unique

use crate::model::{
    Deliverable, DeliverablePatch, Goal, GoalPatch, Initiative, InitiativePatch, Roadmap,
    RoadmapSettings,
};
use chrono::Utc;

#[derive(Debug, Clone)]
pub struct RoadmapCache {
    roadmap: Roadmap,
}

impl RoadmapCache {
    pub fn new() -> Self {
        Self {
            roadmap: Roadmap::new(),
        }
    }

    pub fn snapshot(&self) -> Roadmap {
        self.roadmap.clone()
    }

    /// Restore a previously taken snapshot (rollback)
    pub fn restore(&mut self, snapshot: Roadmap) {
        self.roadmap = snapshot;
    }

    fn touch(&mut self) {
        self.roadmap.updated_at = Utc::now();
    }

    /// Replace the three collections with freshly fetched data
    pub fn load_data(
        &mut self,
        goals: Vec<Goal>,
        initiatives: Vec<Initiative>,
        deliverables: Vec<Deliverable>,
    ) {
        self.roadmap.goals = goals;
        self.roadmap.goals.sort_by_key(|g| g.priority);
        self.roadmap.initiatives = initiatives;
        self.roadmap.deliverables = deliverables;
        self.touch();
    }

    // =========================================================================
    // Goals
    // =========================================================================

    pub fn add_goal(&mut self, goal: Goal) {
        self.roadmap.goals.push(goal);
        self.roadmap.goals.sort_by_key(|g| g.priority);
        self.touch();
    }

    pub fn update_goal(&mut self, id: &str, patch: &GoalPatch) -> bool {
        let Some(goal) = self.roadmap.goals.iter_mut().find(|g| g.id == id) else {
            return false;
        };
        goal.apply(patch);
        self.roadmap.goals.sort_by_key(|g| g.priority);
        self.touch();
        true
    }

    /// Swap an optimistic placeholder for the server-assigned entity
    pub fn replace_goal(&mut self, temp_id: &str, goal: Goal) {
        if let Some(g) = self.roadmap.goals.iter_mut().find(|g| g.id == temp_id) {
            *g = goal;
            self.roadmap.goals.sort_by_key(|g| g.priority);
        }
        self.touch();
    }

    /// Remove the goal, cascade to its subtree, and close the priority
    /// gap: every goal below the deleted one moves up by one.
    pub fn delete_goal(&mut self, id: &str) {
        let Some(deleted) = self.roadmap.goals.iter().find(|g| g.id == id) else {
            return;
        };
        let deleted_priority = deleted.priority;
        let initiative_ids: Vec<String> = self
            .roadmap
            .initiatives
            .iter()
            .filter(|i| i.goal_id == id)
            .map(|i| i.id.clone())
            .collect();

        self.roadmap
            .deliverables
            .retain(|d| !initiative_ids.contains(&d.initiative_id));
        self.roadmap.initiatives.retain(|i| i.goal_id != id);
        self.roadmap.goals.retain(|g| g.id != id);
        for goal in &mut self.roadmap.goals {
            if goal.priority > deleted_priority {
                goal.priority -= 1;
            }
        }
        self.touch();
    }

    /// Move a goal to a new priority slot, shifting the goals in
    /// between. Returns the goals whose priority changed (the moved
    /// goal included), for the caller to push upstream.
    pub fn set_goal_priority(&mut self, id: &str, new_priority: u32) -> Vec<Goal> {
        let Some(old_priority) = self.roadmap.goals.iter().find(|g| g.id == id).map(|g| g.priority)
        else {
            return Vec::new();
        };
        if old_priority == new_priority {
            return Vec::new();
        }

        let mut changed = Vec::new();
        for goal in &mut self.roadmap.goals {
            let updated = if goal.id == id {
                goal.priority = new_priority;
                true
            } else if old_priority < new_priority
                && goal.priority > old_priority
                && goal.priority <= new_priority
            {
                goal.priority -= 1;
                true
            } else if old_priority > new_priority
                && goal.priority >= new_priority
                && goal.priority < old_priority
            {
                goal.priority += 1;
                true
            } else {
                false
            };
            if updated {
                changed.push(goal.clone());
            }
        }
        self.roadmap.goals.sort_by_key(|g| g.priority);
        self.touch();
        changed
    }

    // =========================================================================
    // Initiatives
    // =========================================================================

    pub fn add_initiative(&mut self, initiative: Initiative) {
        self.roadmap.initiatives.push(initiative);
        self.touch();
    }

    pub fn update_initiative(&mut self, id: &str, patch: &InitiativePatch) -> bool {
        let Some(initiative) = self.roadmap.initiatives.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        initiative.apply(patch);
        self.touch();
        true
    }

    pub fn replace_initiative(&mut self, temp_id: &str, initiative: Initiative) {
        if let Some(i) = self
            .roadmap
            .initiatives
            .iter_mut()
            .find(|i| i.id == temp_id)
        {
            *i = initiative;
        }
        self.touch();
    }

    /// Remove the initiative and its deliverables
    pub fn delete_initiative(&mut self, id: &str) {
        self.roadmap.deliverables.retain(|d| d.initiative_id != id);
        self.roadmap.initiatives.retain(|i| i.id != id);
        self.touch();
    }

    /// Reparent an initiative under another goal
    pub fn move_initiative(&mut self, id: &str, goal_id: &str) -> bool {
        let Some(initiative) = self.roadmap.initiatives.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        initiative.goal_id = goal_id.to_string();
        self.touch();
        true
    }

    // =========================================================================
    // Deliverables
    // =========================================================================

    pub fn add_deliverable(&mut self, deliverable: Deliverable) {
        self.roadmap.deliverables.push(deliverable);
        self.touch();
    }

    pub fn update_deliverable(&mut self, id: &str, patch: &DeliverablePatch) -> bool {
        let Some(deliverable) = self.roadmap.deliverables.iter_mut().find(|d| d.id == id) else {
            return false;
        };
        deliverable.apply(patch);
        self.touch();
        true
    }

    pub fn replace_deliverable(&mut self, temp_id: &str, deliverable: Deliverable) {
        if let Some(d) = self
            .roadmap
            .deliverables
            .iter_mut()
            .find(|d| d.id == temp_id)
        {
            *d = deliverable;
        }
        self.touch();
    }

    pub fn delete_deliverable(&mut self, id: &str) {
        self.roadmap.deliverables.retain(|d| d.id != id);
        self.touch();
    }

    /// Reparent a deliverable under another initiative
    pub fn move_deliverable(&mut self, id: &str, initiative_id: &str) -> bool {
        let Some(deliverable) = self.roadmap.deliverables.iter_mut().find(|d| d.id == id) else {
            return false;
        };
        deliverable.initiative_id = initiative_id.to_string();
        self.touch();
        true
    }

    // =========================================================================
    // Roadmap-level
    // =========================================================================

    pub fn update_settings(&mut self, settings: RoadmapSettings) {
        self.roadmap.settings = settings;
        self.touch();
    }

    pub fn update_title(&mut self, title: String) {
        self.roadmap.title = title;
        self.touch();
    }
}

impl Default for RoadmapCache {
    fn default() -> Self {
        Self::new()
    }
}
