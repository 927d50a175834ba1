// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `component_bus` - A publish/subscribe event bus for UI components.
//!
//! Components talk to each other through named events instead of direct
//! references, and every subscription a component makes is released when the
//! component is torn down.
//!
//! # Features
//!
//! - **Named events**: subscribe with [`Bus::on`], dispatch with [`Bus::emit`]
//! - **Identity-based removal**: [`Bus::off`] removes a given [`Handler`] or
//!   every handler of an event
//! - **Owner cleanup**: subscriptions tagged with an owner are released in
//!   one call to [`Bus::off_by_owner`]
//! - **Component scopes**: [`ComponentScope`] tags subscriptions for one
//!   component and releases them on disposal or drop
//!
//! Dispatch is synchronous: handlers run on the emitting thread, in the order
//! they were subscribed.
//!
//! # Quick Start
//!
//! ## Using the Bus Directly
//!
//! ```
//! use component_bus::{args, Bus, OwnerId};
//!
//! let bus: Bus = Bus::new();
//! let comp_a = OwnerId::new();
//! let comp_b = OwnerId::new();
//!
//! bus.on_fn("ping", |args| println!("A got {args:?}"), Some(comp_a));
//! bus.on_fn("ping", |args| println!("B got {args:?}"), Some(comp_b));
//!
//! // Both handlers run, A before B
//! bus.emit("ping", args![1, 2]);
//!
//! // Component A is destroyed: only B keeps listening
//! bus.off_by_owner(&comp_a);
//! bus.emit("ping", args![3, 4]);
//! assert_eq!(bus.listener_count("ping"), 1);
//! ```
//!
//! ## Installing into an Application
//!
//! ```
//! use component_bus::{args, AppContext, InstallOptions};
//!
//! let app: AppContext = AppContext::new();
//! app.install(InstallOptions::new().with_name("$bus"));
//!
//! let list = app.mount("$bus")?;
//! list.on_fn("item-selected", |args| println!("selected {args:?}"));
//!
//! let detail = app.mount("$bus")?;
//! detail.emit("item-selected", args![42]);
//!
//! // Disposing the list component unsubscribes it
//! list.dispose();
//! assert!(!detail.bus().has_listeners("item-selected"));
//! # Ok::<(), component_bus::Error>(())
//! ```

pub mod bus;
pub mod error;
pub mod owner;
pub mod plugin;

pub use bus::{Args, Bus, Handler};
pub use error::{Error, Result};
pub use owner::OwnerId;
pub use plugin::{
    AppContext, ComponentScope, DEFAULT_BUS_NAME, InstallOptions, PACKAGED_BUS_NAME,
};

#[doc(hidden)]
pub use serde_json;
