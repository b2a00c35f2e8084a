// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! Connection setup, migrations, and the few helpers that have no Diesel
//! DSL equivalent live here. Everything in `queries/` and `mutations/` is
//! plain Diesel DSL.

pub mod sqlite;
