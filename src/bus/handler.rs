// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identity-compared event handlers.

use std::fmt;
use std::sync::Arc;

/// Default payload passed to handlers: an ordered argument list.
///
/// Build one with the [`args!`](crate::args) macro.
pub type Args = Vec<serde_json::Value>;

/// A subscribed callback.
///
/// Handlers are compared by identity, not by behavior: two handlers are equal
/// only when one was cloned from the other. Keep the handler returned by
/// [`Bus::on_fn`](crate::Bus::on_fn) (or the one passed to
/// [`Bus::on`](crate::Bus::on)) to unsubscribe it later.
///
/// # Examples
///
/// ```
/// use component_bus::{Args, Handler};
///
/// let handler: Handler<Args> = Handler::new(|args| println!("{args:?}"));
/// let same = handler.clone();
/// let other: Handler<Args> = Handler::new(|args| println!("{args:?}"));
///
/// assert_eq!(handler, same);
/// assert_ne!(handler, other);
/// ```
pub struct Handler<A = Args>(Arc<dyn Fn(&A) + Send + Sync>);

impl<A> Handler<A> {
    /// Wraps a closure into a new handler with its own identity.
    #[must_use]
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    /// Invokes the handler with the given payload.
    pub fn call(&self, args: &A) {
        (self.0)(args);
    }

    /// Returns `true` if both handlers share the same identity.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<A> Clone for Handler<A> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<A> PartialEq for Handler<A> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<A> Eq for Handler<A> {}

impl<A> fmt::Debug for Handler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Arc::as_ptr(&self.0).cast::<()>())
    }
}

/// Builds an [`Args`] list from JSON-serializable expressions.
///
/// # Examples
///
/// ```
/// use component_bus::args;
///
/// let args = args![1, "two", true];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args[1], "two");
///
/// let none = args![];
/// assert!(none.is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::serde_json::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::serde_json::json!($arg)),+]
    };
}
