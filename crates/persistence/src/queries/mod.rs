// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `submissions` - Submission records, team members, and review counts
//! - `challenges` - Challenges and their submission counts
//! - `reviews` - Review history per submission
//! - `collaborations` - Collaboration records
//! - `audit` - Audit trail and stage history

pub mod audit;
pub mod challenges;
pub mod collaborations;
pub mod reviews;
pub mod submissions;
