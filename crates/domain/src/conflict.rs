// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::submission::Submission;
use crate::types::UserId;

/// Returns true if the user may not act as an independent reviewer.
///
/// A user is conflicted when they are the author, a team member, or the
/// owner of the challenge the submission was made against. Roles play no
/// part here: a developer who wrote the submission is still conflicted.
#[must_use]
pub fn is_conflicted(user_id: UserId, submission: &Submission) -> bool {
    submission.is_owner(user_id) || submission.challenge_owner() == Some(user_id)
}
