// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the installation layer.
//!
//! Bus operations themselves never fail: [`Bus::off`](crate::Bus::off)
//! reports whether the event was known through its return value, and a
//! panicking handler unwinds straight to the emitter.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Installation options could not be parsed.
    #[error("invalid install options: {0}")]
    Options(#[from] serde_json::Error),

    /// No bus is installed under the requested name.
    #[error("no bus installed under {0:?}")]
    NotInstalled(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
