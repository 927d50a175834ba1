// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event subscription and dispatch.
//!
//! This module provides the core types of the crate:
//!
//! - [`Bus`] - Holds subscriptions per event and per owner, and dispatches events
//! - [`Handler`] - An identity-compared callback
//! - [`Args`] - The default handler payload, an ordered list of JSON values
//!
//! # Dispatch Order
//!
//! Handlers run synchronously, on the emitting thread, in the order they were
//! subscribed. A handler that panics stops the dispatch and the panic reaches
//! the caller of [`Bus::emit`].

mod event_bus;
mod handler;

pub use event_bus::Bus;
pub use handler::{Args, Handler};
