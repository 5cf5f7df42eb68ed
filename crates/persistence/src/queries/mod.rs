// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side queries.
//!
//! Functions take a plain connection so they can run inside or outside a
//! unit of work.

pub mod league;
pub mod picks;
pub mod rows;
pub mod users;
