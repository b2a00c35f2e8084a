// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Action, Actor, AuditEvent, Cause, Snapshot};
use ideaflow_domain::{AccountStatus, Role, SubmissionId, UserId};
use time::macros::datetime;

fn sample_event() -> AuditEvent {
    AuditEvent::new(
        Some(SubmissionId::new(11)),
        None,
        Actor::new(String::from("42"), String::from("manager")),
        Cause::new(String::from("req-456"), String::from("Manager review")),
        Action::new(String::from("approve"), Some(String::from("manager_review -> sme_review"))),
        Snapshot::new(String::from("manager_review")),
        Snapshot::new(String::from("sme_review")),
        datetime!(2026-04-01 08:30 UTC),
    )
}

#[test]
fn test_actor_from_workflow_actor() {
    let workflow_actor = ideaflow_domain::Actor::new(
        UserId::new(42),
        [Role::Sme, Role::Manager],
        AccountStatus::Active,
        true,
    );
    let actor: Actor = Actor::from_actor(&workflow_actor);

    assert_eq!(actor.id, "42");
    assert_eq!(actor.actor_type, "manager,sme");
}

#[test]
fn test_action_creation_with_details() {
    let action: Action = Action::new(String::from("archive"), Some(String::from("deadline sweep")));

    assert_eq!(action.name, "archive");
    assert_eq!(action.details, Some(String::from("deadline sweep")));
}

#[test]
fn test_new_event_is_unrecorded() {
    let event: AuditEvent = sample_event();
    assert_eq!(event.event_id, None);
    assert_eq!(event.submission_id, Some(SubmissionId::new(11)));
}

#[test]
fn test_recorded_event_keeps_content() {
    let event: AuditEvent = sample_event();
    let recorded: AuditEvent = event.clone().recorded(7);

    assert_eq!(recorded.event_id, Some(7));
    assert_eq!(recorded.actor, event.actor);
    assert_eq!(recorded.before, event.before);
    assert_eq!(recorded.after, event.after);
    assert_ne!(recorded, event);
}
