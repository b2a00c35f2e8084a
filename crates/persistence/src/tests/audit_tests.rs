// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{AUTHOR, create_test_audit_event, fixed_now, insert_test_idea};
use crate::{Persistence, PersistenceError};
use ideaflow::{EventSink, StageChanged, SubmissionStore};
use ideaflow_audit::AuditEvent;
use ideaflow_domain::{IdeaStage, Stage, WorkflowAction};

#[test]
fn test_recorded_event_round_trips() {
    let persistence = Persistence::new_in_memory().unwrap();
    let id = insert_test_idea(&persistence);
    let event: AuditEvent = create_test_audit_event(Some(id), "UpdateSubmission");

    persistence.record(&event).unwrap();

    let trail = persistence.get_audit_trail(id).unwrap();
    assert_eq!(trail.len(), 1);
    let event_id = trail[0].event_id.unwrap();
    assert_eq!(trail[0], event.clone().recorded(event_id));
    assert_eq!(persistence.get_audit_event(event_id).unwrap(), trail[0]);
}

#[test]
fn test_missing_event_is_reported() {
    let persistence = Persistence::new_in_memory().unwrap();
    assert_eq!(
        persistence.get_audit_event(77),
        Err(PersistenceError::EventNotFound(77))
    );
}

#[test]
fn test_published_stage_change_is_kept_with_its_audit_event() {
    let persistence = Persistence::new_in_memory().unwrap();
    let id = insert_test_idea(&persistence);
    let change = StageChanged {
        submission_id: id,
        challenge_id: None,
        from: Stage::Idea(IdeaStage::Draft),
        to: Stage::Idea(IdeaStage::Submitted),
        action: WorkflowAction::Submit,
        actor_id: AUTHOR,
        occurred_at: fixed_now(),
    };

    persistence
        .publish(&change, &create_test_audit_event(Some(id), "submit"))
        .unwrap();

    let history = persistence.get_stage_history(id).unwrap();
    assert_eq!(history.len(), 1);
    let (stored, audit_event_id) = &history[0];
    assert_eq!(stored, &change);
    assert_eq!(
        persistence.get_audit_event(*audit_event_id).unwrap().action.name,
        "submit"
    );
}

#[test]
fn test_trail_outlives_the_submission() {
    let persistence = Persistence::new_in_memory().unwrap();
    let id = insert_test_idea(&persistence);
    persistence
        .record(&create_test_audit_event(Some(id), "CreateSubmission"))
        .unwrap();
    persistence
        .record(&create_test_audit_event(Some(id), "DeleteSubmission"))
        .unwrap();
    persistence.delete_submission(id, 1).unwrap();

    let names: Vec<String> = persistence
        .get_audit_trail(id)
        .unwrap()
        .into_iter()
        .map(|event| event.action.name)
        .collect();
    assert_eq!(names, vec!["CreateSubmission", "DeleteSubmission"]);
}
