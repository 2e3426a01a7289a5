//! Field-level request validation
//!
//! Mirrors the API validation schemas: non-empty names and outcome
//! texts, positive priority, status membership, and endDate not before
//! startDate when both are present. Failures surface as 400 responses
//! with a structured `details` array.

use super::{DeliverableDraft, DeliverablePatch, GoalDraft, GoalPatch, InitiativeDraft, InitiativePatch};
use crate::types::{FieldError, Result, SignpostError};
use chrono::NaiveDate;

fn require_non_empty(errors: &mut Vec<FieldError>, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}

fn check_date_range(
    errors: &mut Vec<FieldError>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.push(FieldError::new("endDate", "End date must not precede start date"));
        }
    }
}

fn finish(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SignpostError::Validation(errors))
    }
}

pub fn validate_goal_draft(draft: &GoalDraft) -> Result<()> {
    let mut errors = Vec::new();
    require_non_empty(&mut errors, "name", &draft.name, "Name is required");
    require_non_empty(
        &mut errors,
        "desiredOutcome",
        &draft.desired_outcome,
        "Desired outcome is required",
    );
    if draft.priority == 0 {
        errors.push(FieldError::new("priority", "Priority must be a positive integer"));
    }
    finish(errors)
}

pub fn validate_goal_patch(patch: &GoalPatch) -> Result<()> {
    let mut errors = Vec::new();
    if let Some(name) = &patch.name {
        require_non_empty(&mut errors, "name", name, "Name is required");
    }
    if let Some(outcome) = &patch.desired_outcome {
        require_non_empty(&mut errors, "desiredOutcome", outcome, "Desired outcome is required");
    }
    if patch.priority == Some(0) {
        errors.push(FieldError::new("priority", "Priority must be a positive integer"));
    }
    finish(errors)
}

pub fn validate_initiative_draft(draft: &InitiativeDraft) -> Result<()> {
    let mut errors = Vec::new();
    require_non_empty(&mut errors, "goalId", &draft.goal_id, "Goal ID is required");
    require_non_empty(&mut errors, "name", &draft.name, "Name is required");
    require_non_empty(
        &mut errors,
        "idealOutcome",
        &draft.ideal_outcome,
        "Ideal outcome is required",
    );
    finish(errors)
}

pub fn validate_initiative_patch(patch: &InitiativePatch) -> Result<()> {
    let mut errors = Vec::new();
    if let Some(goal_id) = &patch.goal_id {
        require_non_empty(&mut errors, "goalId", goal_id, "Goal ID is required");
    }
    if let Some(name) = &patch.name {
        require_non_empty(&mut errors, "name", name, "Name is required");
    }
    if let Some(outcome) = &patch.ideal_outcome {
        require_non_empty(&mut errors, "idealOutcome", outcome, "Ideal outcome is required");
    }
    finish(errors)
}

pub fn validate_deliverable_draft(draft: &DeliverableDraft) -> Result<()> {
    let mut errors = Vec::new();
    require_non_empty(&mut errors, "initiativeId", &draft.initiative_id, "Initiative ID is required");
    require_non_empty(&mut errors, "name", &draft.name, "Name is required");
    check_date_range(&mut errors, draft.start_date, draft.end_date);
    finish(errors)
}

pub fn validate_deliverable_patch(patch: &DeliverablePatch) -> Result<()> {
    let mut errors = Vec::new();
    if let Some(initiative_id) = &patch.initiative_id {
        require_non_empty(&mut errors, "initiativeId", initiative_id, "Initiative ID is required");
    }
    if let Some(name) = &patch.name {
        require_non_empty(&mut errors, "name", name, "Name is required");
    }
    // Only check ordering when the patch itself carries both dates;
    // a single-date patch is validated against nothing (input-level
    // check only, per the data model).
    if let (Some(Some(start)), Some(Some(end))) = (patch.start_date, patch.end_date) {
        check_date_range(&mut errors, Some(start), Some(end));
    }
    finish(errors)
}
