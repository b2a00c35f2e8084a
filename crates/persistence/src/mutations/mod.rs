// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `submissions` - Versioned submission writes and team membership
//! - `challenges` - Challenge writes
//! - `reviews` - Review inserts
//! - `collaborations` - Collaboration inserts and status updates
//! - `audit` - Append-only audit events and stage history
//!
//! Every multi-row write runs inside a single transaction.

pub mod audit;
pub mod challenges;
pub mod collaborations;
pub mod reviews;
pub mod submissions;
