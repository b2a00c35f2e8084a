// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    author, challenge_owner, create_active_challenge, create_challenge_submission,
    create_test_persistence, manager, outsider, service,
};
use crate::{ApiError, export_challenge_submissions_csv};

#[test]
fn test_owner_exports_every_submission() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let challenge = create_active_challenge(&workflow);
    let first = create_challenge_submission(&workflow, &challenge, &author(), "Route batching");
    create_challenge_submission(&workflow, &challenge, &outsider(), "Depot consolidation");

    let mut output: Vec<u8> = Vec::new();
    let response = export_challenge_submissions_csv(
        &persistence,
        &challenge_owner(),
        challenge.id.value(),
        &mut output,
    )
    .unwrap();

    assert_eq!(response.rows_written, 2);
    assert_eq!(response.challenge_id, challenge.id.value());

    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("submission_id,title,author_id,team_members,stage"));
    assert!(lines[1].starts_with(&format!("{},Route batching,1,,draft", first.id())));
    assert!(text.contains("Depot consolidation"));
}

#[test]
fn test_export_permission_allows_non_owner() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let challenge = create_active_challenge(&workflow);
    create_challenge_submission(&workflow, &challenge, &author(), "Route batching");

    let mut output: Vec<u8> = Vec::new();
    let response =
        export_challenge_submissions_csv(&persistence, &manager(), challenge.id.value(), &mut output)
            .unwrap();

    assert_eq!(response.rows_written, 1);
}

#[test]
fn test_participant_cannot_export() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let challenge = create_active_challenge(&workflow);
    create_challenge_submission(&workflow, &challenge, &author(), "Route batching");

    let mut output: Vec<u8> = Vec::new();
    let result =
        export_challenge_submissions_csv(&persistence, &author(), challenge.id.value(), &mut output);

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    assert!(output.is_empty());
}

#[test]
fn test_empty_challenge_exports_header_only() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let challenge = create_active_challenge(&workflow);

    let mut output: Vec<u8> = Vec::new();
    let response = export_challenge_submissions_csv(
        &persistence,
        &challenge_owner(),
        challenge.id.value(),
        &mut output,
    )
    .unwrap();

    assert_eq!(response.rows_written, 0);
    let text = String::from_utf8(output).unwrap();
    assert_eq!(text.lines().count(), 1);
}

#[test]
fn test_missing_challenge_is_not_found() {
    let persistence = create_test_persistence();

    let mut output: Vec<u8> = Vec::new();
    let result =
        export_challenge_submissions_csv(&persistence, &challenge_owner(), 404, &mut output);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}
