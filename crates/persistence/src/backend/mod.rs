// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Connection setup that Diesel DSL cannot express.
//!
//! Only opening, configuring and migrating connections lives here. Every
//! domain query and mutation is plain Diesel DSL in `queries/` and
//! `mutations/`.

pub mod sqlite;
