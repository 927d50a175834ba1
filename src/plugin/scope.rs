// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-component subscription scope.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::bus::{Args, Bus, Handler};
use crate::owner::OwnerId;

/// The bus surface exposed to one component instance.
///
/// Every subscription made through the scope is tagged with the scope's
/// owner key. Disposing the scope, explicitly with [`dispose`](Self::dispose)
/// or implicitly by dropping it, unsubscribes all of them from the shared bus.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use component_bus::{args, Bus, ComponentScope};
///
/// let bus: Arc<Bus<component_bus::Args, &'static str>> = Arc::new(Bus::new());
/// let sidebar = ComponentScope::new(Arc::clone(&bus), "sidebar");
///
/// sidebar.on_fn("select", |args| println!("selected {args:?}"));
/// bus.emit("select", args![3]);
///
/// sidebar.dispose();
/// assert!(!bus.has_listeners("select"));
/// ```
pub struct ComponentScope<A = Args, O = OwnerId>
where
    O: Eq + Hash + Clone + fmt::Debug,
{
    bus: Arc<Bus<A, O>>,
    owner: O,
    disposed: AtomicBool,
}

impl<A, O> ComponentScope<A, O>
where
    O: Eq + Hash + Clone + fmt::Debug,
{
    /// Creates a scope subscribing to `bus` on behalf of `owner`.
    ///
    /// The owner key must be unique among live scopes of the same bus.
    #[must_use]
    pub fn new(bus: Arc<Bus<A, O>>, owner: O) -> Self {
        tracing::trace!(owner = ?owner, "Mounted component scope");
        Self {
            bus,
            owner,
            disposed: AtomicBool::new(false),
        }
    }

    /// Returns the shared bus.
    #[must_use]
    pub fn bus(&self) -> &Arc<Bus<A, O>> {
        &self.bus
    }

    /// Returns the owner key of this scope.
    #[must_use]
    pub fn owner(&self) -> &O {
        &self.owner
    }

    /// Subscribes `handler` to `event` on behalf of this component.
    pub fn on(&self, event: impl Into<String>, handler: Handler<A>) {
        self.bus.on(event, handler, Some(self.owner.clone()));
    }

    /// Subscribes a closure to `event` on behalf of this component and
    /// returns its handler.
    pub fn on_fn<F>(&self, event: impl Into<String>, callback: F) -> Handler<A>
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        self.bus.on_fn(event, callback, Some(self.owner.clone()))
    }

    /// Unsubscribes handlers from `event`. See [`Bus::off`].
    pub fn off(&self, event: &str, handler: Option<&Handler<A>>) -> bool {
        self.bus.off(event, handler)
    }

    /// Emits `event` on the shared bus. See [`Bus::emit`].
    pub fn emit(&self, event: &str, args: A) {
        self.bus.emit(event, args);
    }

    /// Releases every subscription made through this scope.
    ///
    /// Safe to call more than once. Subscriptions made after disposal are
    /// released again when the scope is dropped.
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            tracing::debug!(owner = ?self.owner, "Disposing component scope");
        }
        self.bus.off_by_owner(&self.owner);
    }

    /// Returns `true` once [`dispose`](Self::dispose) has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl<A, O> Drop for ComponentScope<A, O>
where
    O: Eq + Hash + Clone + fmt::Debug,
{
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<A, O> fmt::Debug for ComponentScope<A, O>
where
    O: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentScope")
            .field("owner", &self.owner)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}
