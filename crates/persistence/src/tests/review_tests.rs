// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{MANAGER, fixed_now, insert_test_idea};
use crate::Persistence;
use ideaflow::{ReviewStore, StoreError, SubmissionStore};
use ideaflow_domain::{Review, ReviewDecision, ReviewId, ReviewStage, Submission, UserId};
use time::Duration;

fn load(persistence: &Persistence, id: ideaflow_domain::SubmissionId) -> Submission {
    persistence
        .load_submission(id)
        .unwrap()
        .into_submission()
        .unwrap()
}

#[test]
fn test_reviews_are_listed_in_recorded_order() {
    let persistence = Persistence::new_in_memory().unwrap();
    let id = insert_test_idea(&persistence);
    let submission = load(&persistence, id);

    let first = Review::new(
        &submission,
        MANAGER,
        ReviewStage::ManagerReview,
        ReviewDecision::Approved,
        Some(82),
        Some(String::from("Clear business case")),
        fixed_now(),
    )
    .unwrap();
    let second = Review::new(
        &submission,
        UserId::new(12),
        ReviewStage::SmeReview,
        ReviewDecision::NeedsChanges,
        None,
        None,
        fixed_now() + Duration::minutes(5),
    )
    .unwrap();

    let first_id: ReviewId = persistence.insert_review(&first).unwrap();
    let second_id: ReviewId = persistence.insert_review(&second).unwrap();

    let reviews = persistence.list_reviews(id).unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].id, Some(first_id));
    assert_eq!(reviews[0].score, Some(82));
    assert_eq!(reviews[0].comment.as_deref(), Some("Clear business case"));
    assert_eq!(reviews[1].id, Some(second_id));
    assert_eq!(reviews[1].stage, ReviewStage::SmeReview);
    assert_eq!(reviews[1].decision, ReviewDecision::NeedsChanges);
    assert_eq!(reviews[1].created_at, fixed_now() + Duration::minutes(5));

    assert_eq!(persistence.load_submission(id).unwrap().review_count, 2);
}

#[test]
fn test_reviews_are_removed_with_their_submission() {
    let persistence = Persistence::new_in_memory().unwrap();
    let id = insert_test_idea(&persistence);
    let submission = load(&persistence, id);
    let review = Review::new(
        &submission,
        MANAGER,
        ReviewStage::ManagerReview,
        ReviewDecision::Pending,
        None,
        None,
        fixed_now(),
    )
    .unwrap();
    persistence.insert_review(&review).unwrap();

    persistence.delete_submission(id, 1).unwrap();
    assert!(persistence.list_reviews(id).unwrap().is_empty());
}

#[test]
fn test_review_for_missing_submission_is_rejected() {
    let persistence = Persistence::new_in_memory().unwrap();
    let id = insert_test_idea(&persistence);
    let submission = load(&persistence, id);
    let review = Review::new(
        &submission,
        MANAGER,
        ReviewStage::ManagerReview,
        ReviewDecision::Approved,
        None,
        None,
        fixed_now(),
    )
    .unwrap();
    persistence.delete_submission(id, 1).unwrap();

    assert!(persistence.insert_review(&review).is_err());
}

#[test]
fn test_withdrawn_review_no_longer_counts() {
    let persistence = Persistence::new_in_memory().unwrap();
    let id = insert_test_idea(&persistence);
    let submission = load(&persistence, id);
    let review = Review::new(
        &submission,
        MANAGER,
        ReviewStage::ManagerReview,
        ReviewDecision::Approved,
        None,
        None,
        fixed_now(),
    )
    .unwrap();
    let review_id = persistence.insert_review(&review).unwrap();

    persistence.delete_review(review_id).unwrap();

    assert!(persistence.list_reviews(id).unwrap().is_empty());
    assert_eq!(persistence.load_submission(id).unwrap().review_count, 0);
    assert_eq!(
        persistence.delete_review(review_id),
        Err(StoreError::NotFound {
            entity: "review",
            id: review_id.value(),
        })
    );
}
