// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Boundary layer between callers and the ideaflow workflow.
//!
//! Requests arrive as plain strings and numbers, are parsed into domain
//! types, and are handed to the workflow. Results come back as
//! serializable response types. Errors are translated into `ApiError`,
//! which never reveals the rule behind an authorization denial.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod capabilities;
mod error;
mod export;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use capabilities::{compute_challenge_capabilities, compute_submission_capabilities};
pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use export::export_challenge_submissions_csv;
pub use handlers::{
    challenge_info, get_challenge, get_submission, run_deadline_sweep, submit_review,
    transition_submission,
};
pub use request_response::{
    Capability, ChallengeCapabilities, ChallengeInfo, ExportResponse, GetSubmissionResponse,
    ListChallengesResponse, ReviewInfo, SubmissionCapabilities, SubmissionInfo,
    SubmitReviewRequest, SubmitReviewResponse, SweepFailure, SweepResponse,
    TransitionSubmissionRequest, TransitionSubmissionResponse, format_timestamp,
};
