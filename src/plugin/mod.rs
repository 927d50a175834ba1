// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Installation of buses into an application and per-component scopes.
//!
//! # Overview
//!
//! - [`AppContext`] - Holds the buses installed by the application, by name
//! - [`InstallOptions`] - Configures the name a bus is installed under
//! - [`ComponentScope`] - Subscribes on behalf of one component and releases
//!   its subscriptions when disposed or dropped
//!
//! # Lifecycle
//!
//! ```text
//! AppContext::install ──► Arc<Bus>
//!        │
//!        └─ mount ──► ComponentScope (owner = OwnerId::new())
//!                        │ on / on_fn  ──► Bus::on(.., Some(owner))
//!                        │ emit / off  ──► Bus::emit / Bus::off
//!                        └ dispose/drop ─► Bus::off_by_owner(owner)
//! ```

mod context;
mod options;
mod scope;

pub use context::AppContext;
pub use options::{DEFAULT_BUS_NAME, InstallOptions, PACKAGED_BUS_NAME};
pub use scope::ComponentScope;
