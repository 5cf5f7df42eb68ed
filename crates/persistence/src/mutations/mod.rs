// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side operations.
//!
//! Compound writes are only ever invoked through a unit of work; none of
//! these functions opens its own transaction.

pub mod league;
pub mod picks;
pub mod users;
