// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus with per-owner subscription tracking.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use parking_lot::RwLock;

use super::handler::{Args, Handler};
use crate::owner::OwnerId;

/// Handlers registered for one event, in subscription order.
type HandlerList<A> = Vec<Handler<A>>;

/// The two mappings guarded by the bus lock.
struct Registry<A, O> {
    /// Event name to subscribed handlers.
    handles: HashMap<String, HandlerList<A>>,
    /// Owner to the handlers it subscribed, per event. Reverse index only.
    owner_index: HashMap<O, HashMap<String, HandlerList<A>>>,
}

impl<A, O> Registry<A, O> {
    fn new() -> Self {
        Self {
            handles: HashMap::new(),
            owner_index: HashMap::new(),
        }
    }

    /// Moves every entry identical to `handler` into `removed`, scanning from
    /// the end.
    ///
    /// Returns `false` if the event has no handler list.
    fn remove_handler(
        &mut self,
        event: &str,
        handler: &Handler<A>,
        removed: &mut Vec<Handler<A>>,
    ) -> bool {
        let Some(handlers) = self.handles.get_mut(event) else {
            return false;
        };
        let mut index = handlers.len();
        while index > 0 {
            index -= 1;
            if handlers[index].same(handler) {
                removed.push(handlers.remove(index));
            }
        }
        true
    }
}

/// Publish/subscribe bus mediating events between components.
///
/// The bus keeps handlers per event name, in subscription order, plus a
/// reverse index of the handlers each owner registered so that
/// [`off_by_owner`](Self::off_by_owner) can release all of them at once.
///
/// All operations are synchronous. Handlers run on the emitting thread, and
/// the internal lock is released before each handler is called, so handlers
/// may subscribe, unsubscribe or emit on the same bus.
///
/// # Type Parameters
///
/// - `A` - Payload passed to every handler (defaults to [`Args`])
/// - `O` - Owner key used to group subscriptions (defaults to [`OwnerId`])
///
/// # Examples
///
/// ```
/// use component_bus::{args, Bus, OwnerId};
///
/// let bus: Bus = Bus::new();
/// let component = OwnerId::new();
///
/// bus.on_fn("ping", |args| println!("ping {args:?}"), Some(component));
/// bus.emit("ping", args![1, 2]);
///
/// // Component teardown releases everything it subscribed
/// bus.off_by_owner(&component);
/// assert!(!bus.has_listeners("ping"));
/// ```
pub struct Bus<A = Args, O = OwnerId> {
    registry: RwLock<Registry<A, O>>,
}

impl<A, O> Bus<A, O>
where
    O: Eq + Hash + Clone + fmt::Debug,
{
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry::new()),
        }
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes `handler` to `event`.
    ///
    /// When `owner` is given, the subscription is also recorded under that
    /// owner for [`off_by_owner`](Self::off_by_owner). Subscribing the same
    /// handler twice makes it run twice per emit.
    pub fn on(&self, event: impl Into<String>, handler: Handler<A>, owner: Option<O>) {
        let event = event.into();
        let mut registry = self.registry.write();

        if let Some(owner) = owner {
            tracing::trace!(event = %event, owner = ?owner, "Subscribing owned handler");
            registry
                .owner_index
                .entry(owner)
                .or_default()
                .entry(event.clone())
                .or_default()
                .push(handler.clone());
        } else {
            tracing::trace!(event = %event, "Subscribing handler");
        }

        registry.handles.entry(event).or_default().push(handler);
    }

    /// Subscribes a closure to `event` and returns its handler.
    ///
    /// Keep the returned handler to pass it to [`off`](Self::off) later.
    pub fn on_fn<F>(&self, event: impl Into<String>, callback: F, owner: Option<O>) -> Handler<A>
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        let handler = Handler::new(callback);
        self.on(event, handler.clone(), owner);
        handler
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unsubscribes handlers from `event`.
    ///
    /// With `None`, every handler of the event is dropped. With a handler,
    /// every entry identical to it is removed, not only the first one.
    ///
    /// Returns `false` only if the event has never been subscribed to (or was
    /// cleared), `true` otherwise, even when no entry matched.
    ///
    /// The owner index is left untouched; [`off_by_owner`](Self::off_by_owner)
    /// discards it separately.
    pub fn off(&self, event: &str, handler: Option<&Handler<A>>) -> bool {
        let mut removed = Vec::new();
        let mut registry = self.registry.write();

        let known = match handler {
            None => match registry.handles.remove(event) {
                Some(handlers) => {
                    removed = handlers;
                    true
                }
                None => false,
            },
            Some(handler) => registry.remove_handler(event, handler, &mut removed),
        };

        // Handlers may own scopes that re-enter the bus when dropped
        drop(registry);

        if known {
            tracing::trace!(event = %event, count = removed.len(), "Removed handlers");
        }
        known
    }

    /// Unsubscribes everything registered with `owner`.
    ///
    /// Each handler recorded for the owner is removed from its event the same
    /// way [`off`](Self::off) does, then the owner record is dropped. Calling
    /// this for an unknown owner, or twice for the same owner, does nothing.
    pub fn off_by_owner(&self, owner: &O) {
        let mut removed = Vec::new();
        let mut registry = self.registry.write();

        let Some(events) = registry.owner_index.remove(owner) else {
            drop(registry);
            tracing::trace!(owner = ?owner, "No subscriptions recorded for owner");
            return;
        };

        for (event, handlers) in &events {
            for handler in handlers {
                registry.remove_handler(event, handler, &mut removed);
            }
        }
        drop(registry);

        tracing::debug!(
            owner = ?owner,
            events = events.len(),
            removed = removed.len(),
            "Released owner subscriptions"
        );
    }

    /// Removes every subscription and owner record.
    pub fn clear(&self) {
        let mut registry = self.registry.write();
        let handles = std::mem::take(&mut registry.handles);
        let owner_index = std::mem::take(&mut registry.owner_index);
        drop(registry);

        tracing::debug!(
            events = handles.len(),
            owners = owner_index.len(),
            "Cleared bus"
        );
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Invokes the handlers of `event` in subscription order.
    ///
    /// The number of handlers is captured before the first call, so handlers
    /// subscribed during dispatch only run on the next emit. Handlers are read
    /// by position at each step: removing an entry during dispatch shifts the
    /// later ones down, and dispatch stops early if the list shrinks below the
    /// current position.
    ///
    /// A panicking handler unwinds out of `emit`; the handlers after it are
    /// not called.
    ///
    /// The payload is taken by value so callers can build it inline, as in
    /// `bus.emit("ping", args![1, 2])`; every handler borrows the same value.
    #[allow(clippy::needless_pass_by_value)]
    pub fn emit(&self, event: &str, args: A) {
        let Some(len) = self.registry.read().handles.get(event).map(Vec::len) else {
            return;
        };

        tracing::trace!(event = %event, handlers = len, "Dispatching event");

        for index in 0..len {
            let handler = self
                .registry
                .read()
                .handles
                .get(event)
                .and_then(|handlers| handlers.get(index))
                .cloned();

            let Some(handler) = handler else {
                tracing::trace!(event = %event, index, "Handler list shrank during dispatch");
                break;
            };

            handler.call(&args);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the number of handlers subscribed to `event`.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.registry.read().handles.get(event).map_or(0, Vec::len)
    }

    /// Returns `true` if at least one handler is subscribed to `event`.
    #[must_use]
    pub fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }

    /// Returns the names of events with at least one handler, in no
    /// particular order.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        self.registry
            .read()
            .handles
            .iter()
            .filter(|(_, handlers)| !handlers.is_empty())
            .map(|(event, _)| event.clone())
            .collect()
    }

    /// Returns the number of owners with recorded subscriptions.
    #[must_use]
    pub fn owner_count(&self) -> usize {
        self.registry.read().owner_index.len()
    }

    /// Returns the number of subscriptions recorded for `owner`.
    #[must_use]
    pub fn owned_listener_count(&self, owner: &O) -> usize {
        self.registry
            .read()
            .owner_index
            .get(owner)
            .map_or(0, |events| events.values().map(Vec::len).sum())
    }

    /// Returns `true` if no handler is subscribed to any event.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry
            .read()
            .handles
            .values()
            .all(Vec::is_empty)
    }
}

impl<A, O> Default for Bus<A, O>
where
    O: Eq + Hash + Clone + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, O> fmt::Debug for Bus<A, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.read();
        f.debug_struct("Bus")
            .field("events", &registry.handles.len())
            .field(
                "handlers",
                &registry.handles.values().map(Vec::len).sum::<usize>(),
            )
            .field("owners", &registry.owner_index.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Collects `(label, args)` pairs in call order.
    type CallLog = Arc<parking_lot::Mutex<Vec<(&'static str, Args)>>>;

    fn recorder(log: &CallLog, label: &'static str) -> Handler {
        let log = log.clone();
        Handler::new(move |args: &Args| log.lock().push((label, args.clone())))
    }

    fn counter(count: &Arc<AtomicU32>) -> Handler {
        let count = count.clone();
        Handler::new(move |_: &Args| {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn new_bus_is_empty() {
        let bus: Bus = Bus::new();

        assert!(bus.is_empty());
        assert_eq!(bus.owner_count(), 0);
        assert!(bus.event_names().is_empty());
    }

    #[test]
    fn emit_forwards_args_in_subscription_order() {
        let bus: Bus = Bus::new();
        let log = CallLog::default();

        bus.on("ping", recorder(&log, "first"), None);
        bus.on("ping", recorder(&log, "second"), None);
        bus.emit("ping", args![1, "two"]);

        let calls = log.lock();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ("first", args![1, "two"]));
        assert_eq!(calls[1], ("second", args![1, "two"]));
    }

    #[test]
    fn emit_unknown_event_is_noop() {
        let bus: Bus = Bus::new();
        let count = Arc::new(AtomicU32::new(0));

        bus.on("ping", counter(&count), None);
        bus.emit("pong", args![]);

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn off_without_handler_clears_event() {
        let bus: Bus = Bus::new();
        let count = Arc::new(AtomicU32::new(0));

        bus.on("ping", counter(&count), None);
        bus.on("ping", counter(&count), None);

        assert!(bus.off("ping", None));
        bus.emit("ping", args![]);

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!bus.has_listeners("ping"));
        // Cleared events count as unregistered again
        assert!(!bus.off("ping", None));
    }

    #[test]
    fn off_unknown_event_returns_false() {
        let bus: Bus = Bus::new();
        let handler = Handler::new(|_: &Args| {});

        assert!(!bus.off("ping", None));
        assert!(!bus.off("ping", Some(&handler)));
    }

    #[test]
    fn off_removes_only_matching_handler() {
        let bus: Bus = Bus::new();
        let log = CallLog::default();
        let first = recorder(&log, "first");

        bus.on("ping", first.clone(), None);
        bus.on("ping", recorder(&log, "second"), None);

        assert!(bus.off("ping", Some(&first)));
        bus.emit("ping", args![]);

        let calls = log.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "second");
    }

    #[test]
    fn off_absent_handler_on_known_event_returns_true() {
        let bus: Bus = Bus::new();
        let count = Arc::new(AtomicU32::new(0));
        let stranger = Handler::new(|_: &Args| {});

        bus.on("ping", counter(&count), None);

        assert!(bus.off("ping", Some(&stranger)));
        assert_eq!(bus.listener_count("ping"), 1);
    }

    #[test]
    fn emptied_event_still_counts_as_registered() {
        let bus: Bus = Bus::new();
        let handler = bus.on_fn("ping", |_| {}, None);

        assert!(bus.off("ping", Some(&handler)));
        assert!(!bus.has_listeners("ping"));
        assert!(bus.off("ping", Some(&handler)));
    }

    #[test]
    fn duplicate_subscriptions_run_twice_and_are_removed_together() {
        let bus: Bus = Bus::new();
        let count = Arc::new(AtomicU32::new(0));
        let handler = counter(&count);

        bus.on("ping", handler.clone(), None);
        bus.on("ping", handler.clone(), None);
        bus.emit("ping", args![]);
        assert_eq!(count.load(Ordering::SeqCst), 2);

        assert!(bus.off("ping", Some(&handler)));
        bus.emit("ping", args![]);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(bus.listener_count("ping"), 0);
    }

    #[test]
    fn off_by_owner_releases_only_that_owner() {
        let bus: Bus = Bus::new();
        let log = CallLog::default();
        let comp_a = OwnerId::new();
        let comp_b = OwnerId::new();

        bus.on("ping", recorder(&log, "f"), Some(comp_a));
        bus.on("ping", recorder(&log, "g"), Some(comp_b));
        bus.on("ping", recorder(&log, "free"), None);
        bus.on("other", recorder(&log, "f-other"), Some(comp_a));

        bus.emit("ping", args![1, 2]);
        assert_eq!(
            *log.lock(),
            vec![
                ("f", args![1, 2]),
                ("g", args![1, 2]),
                ("free", args![1, 2]),
            ]
        );
        log.lock().clear();

        bus.off_by_owner(&comp_a);
        bus.emit("ping", args![3, 4]);
        bus.emit("other", args![]);

        assert_eq!(*log.lock(), vec![("g", args![3, 4]), ("free", args![3, 4])]);
        assert_eq!(bus.owner_count(), 1);
        assert_eq!(bus.owned_listener_count(&comp_a), 0);
        assert_eq!(bus.owned_listener_count(&comp_b), 1);
    }

    #[test]
    fn off_by_owner_is_idempotent() {
        let bus: Bus = Bus::new();
        let owner = OwnerId::new();
        let count = Arc::new(AtomicU32::new(0));

        bus.on("ping", counter(&count), Some(owner));
        bus.off_by_owner(&owner);
        bus.off_by_owner(&owner);
        bus.off_by_owner(&OwnerId::new());

        bus.emit("ping", args![]);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(bus.owner_count(), 0);
    }

    #[test]
    fn off_by_owner_removes_handler_shared_with_other_owner() {
        let bus: Bus = Bus::new();
        let comp_a = OwnerId::new();
        let comp_b = OwnerId::new();
        let shared = Handler::new(|_: &Args| {});

        bus.on("ping", shared.clone(), Some(comp_a));
        bus.on("ping", shared.clone(), Some(comp_b));
        bus.on("ping", shared, None);

        bus.off_by_owner(&comp_a);

        // Removal is by identity, so B's and the owner-less copy go too
        assert_eq!(bus.listener_count("ping"), 0);
        // B's record stays until B itself is released
        assert_eq!(bus.owned_listener_count(&comp_b), 1);

        bus.off_by_owner(&comp_b);
        assert_eq!(bus.owner_count(), 0);
    }

    #[test]
    fn off_by_owner_after_event_cleared_is_safe() {
        let bus: Bus = Bus::new();
        let owner = OwnerId::new();

        bus.on_fn("ping", |_| {}, Some(owner));
        assert!(bus.off("ping", None));

        bus.off_by_owner(&owner);
        assert_eq!(bus.owner_count(), 0);
    }

    #[test]
    fn owner_keys_can_be_any_hashable_value() {
        let bus: Bus<u32, &'static str> = Bus::new();
        let total = Arc::new(AtomicU32::new(0));
        let total_clone = total.clone();

        bus.on_fn(
            "add",
            move |value| {
                total_clone.fetch_add(*value, Ordering::SeqCst);
            },
            Some("sidebar"),
        );
        bus.emit("add", 3);
        bus.off_by_owner(&"sidebar");
        bus.emit("add", 4);

        assert_eq!(total.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn handler_subscribed_during_dispatch_waits_for_next_emit() {
        let bus: Arc<Bus> = Arc::new(Bus::new());
        let count = Arc::new(AtomicU32::new(0));
        let late = counter(&count);

        let bus_clone = bus.clone();
        bus.on_fn(
            "ping",
            move |_| bus_clone.on("ping", late.clone(), None),
            None,
        );

        bus.emit("ping", args![]);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(bus.listener_count("ping"), 2);

        bus.emit("ping", args![]);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removing_earlier_handler_during_dispatch_skips_shifted_one() {
        let bus: Arc<Bus> = Arc::new(Bus::new());
        let log = CallLog::default();
        let first = recorder(&log, "first");
        let third = recorder(&log, "third");

        let bus_clone = bus.clone();
        let first_clone = first.clone();
        let second = Handler::new(move |_: &Args| {
            bus_clone.off("ping", Some(&first_clone));
        });

        bus.on("ping", first, None);
        bus.on("ping", second, None);
        bus.on("ping", third, None);
        bus.emit("ping", args![]);

        // "third" slid into the index "second" occupied and was never reached
        assert_eq!(log.lock().len(), 1);
        assert_eq!(log.lock()[0].0, "first");

        bus.emit("ping", args![]);
        assert_eq!(log.lock().len(), 2);
        assert_eq!(log.lock()[1].0, "third");
    }

    #[test]
    fn removing_later_handler_during_dispatch_runs_the_rest() {
        let bus: Arc<Bus> = Arc::new(Bus::new());
        let log = CallLog::default();
        let second = recorder(&log, "second");
        let third = recorder(&log, "third");

        let bus_clone = bus.clone();
        let second_clone = second.clone();
        let first = Handler::new(move |_: &Args| {
            bus_clone.off("ping", Some(&second_clone));
        });

        bus.on("ping", first, None);
        bus.on("ping", second, None);
        bus.on("ping", third, None);
        bus.emit("ping", args![]);

        assert_eq!(log.lock().len(), 1);
        assert_eq!(log.lock()[0].0, "third");
    }

    #[test]
    fn clearing_event_during_dispatch_stops_it() {
        let bus: Arc<Bus> = Arc::new(Bus::new());
        let count = Arc::new(AtomicU32::new(0));

        let bus_clone = bus.clone();
        bus.on_fn(
            "ping",
            move |_| {
                bus_clone.off("ping", None);
            },
            None,
        );
        bus.on("ping", counter(&count), None);

        bus.emit("ping", args![]);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn panicking_handler_aborts_dispatch() {
        let bus: Bus = Bus::new();
        let count = Arc::new(AtomicU32::new(0));

        bus.on_fn("ping", |_| panic!("subscriber failed"), None);
        bus.on("ping", counter(&count), None);

        let result = catch_unwind(AssertUnwindSafe(|| bus.emit("ping", args![])));

        assert!(result.is_err());
        assert_eq!(count.load(Ordering::SeqCst), 0);
        // The bus stays usable after the panic
        assert_eq!(bus.listener_count("ping"), 2);
    }

    #[test]
    fn event_names_lists_non_empty_events() {
        let bus: Bus = Bus::new();
        let handler = bus.on_fn("ping", |_| {}, None);
        bus.on_fn("pong", |_| {}, None);
        bus.off("ping", Some(&handler));

        assert_eq!(bus.event_names(), vec!["pong".to_string()]);
    }

    #[test]
    fn clear_drops_everything() {
        let bus: Bus = Bus::new();
        bus.on_fn("ping", |_| {}, Some(OwnerId::new()));
        bus.on_fn("pong", |_| {}, None);

        bus.clear();

        assert!(bus.is_empty());
        assert_eq!(bus.owner_count(), 0);
    }

    #[test]
    fn debug_reports_counts() {
        let bus: Bus = Bus::new();
        bus.on_fn("ping", |_| {}, Some(OwnerId::new()));

        let debug = format!("{bus:?}");
        assert!(debug.contains("Bus"));
        assert!(debug.contains("handlers: 1"));
        assert!(debug.contains("owners: 1"));
    }
}
