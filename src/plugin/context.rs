// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Application context holding installed buses.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::options::{DEFAULT_BUS_NAME, InstallOptions};
use super::scope::ComponentScope;
use crate::bus::{Args, Bus};
use crate::error::{Error, Result};
use crate::owner::OwnerId;

/// Application-level registry of installed buses.
///
/// An application creates one context, installs a bus into it, and hands the
/// context (or the bus) to its components. Each component mounts a
/// [`ComponentScope`], which tags its subscriptions with a fresh [`OwnerId`]
/// and releases them when the component is disposed.
///
/// Installing twice under the same name replaces the previous bus with a new,
/// independent one; subscriptions made on the old bus are not carried over.
///
/// # Examples
///
/// ```
/// use component_bus::{args, AppContext, InstallOptions};
///
/// let app: AppContext = AppContext::new();
/// app.install(InstallOptions::new());
///
/// let header = app.mount_default()?;
/// header.on_fn("login", |args| println!("user logged in: {args:?}"));
///
/// let form = app.mount_default()?;
/// form.emit("login", args!["alice"]);
///
/// // Tearing down the header releases its subscription
/// drop(header);
/// assert!(!form.bus().has_listeners("login"));
/// # Ok::<(), component_bus::Error>(())
/// ```
pub struct AppContext<A = Args> {
    buses: RwLock<HashMap<String, Arc<Bus<A>>>>,
}

impl<A> AppContext<A> {
    /// Creates a context with no bus installed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buses: RwLock::new(HashMap::new()),
        }
    }

    /// Installs a new bus under the name configured in `options`.
    ///
    /// Returns the installed bus.
    pub fn install(&self, options: InstallOptions) -> Arc<Bus<A>> {
        let name = options.resolved_name().to_string();
        let bus = Arc::new(Bus::new());

        let previous = self.buses.write().insert(name.clone(), Arc::clone(&bus));
        if previous.is_some() {
            tracing::warn!(name = %name, "Replacing previously installed bus");
        } else {
            tracing::debug!(name = %name, "Installed bus");
        }

        bus
    }

    /// Parses installation options from JSON and installs a bus.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Options`] if the options cannot be parsed.
    pub fn install_json(&self, options: &str) -> Result<Arc<Bus<A>>> {
        let options = InstallOptions::from_json(options)?;
        Ok(self.install(options))
    }

    /// Returns the bus installed under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInstalled`] if no bus is installed under `name`.
    pub fn bus(&self, name: &str) -> Result<Arc<Bus<A>>> {
        self.buses
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotInstalled(name.to_string()))
    }

    /// Returns the bus installed under [`DEFAULT_BUS_NAME`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInstalled`] if no bus is installed under the
    /// default name.
    pub fn default_bus(&self) -> Result<Arc<Bus<A>>> {
        self.bus(DEFAULT_BUS_NAME)
    }

    /// Returns `true` if a bus is installed under `name`.
    #[must_use]
    pub fn is_installed(&self, name: &str) -> bool {
        self.buses.read().contains_key(name)
    }

    /// Returns the names buses are installed under, in no particular order.
    #[must_use]
    pub fn installed_names(&self) -> Vec<String> {
        self.buses.read().keys().cloned().collect()
    }

    /// Creates a component scope on the bus installed under `name`.
    ///
    /// The scope gets a freshly generated [`OwnerId`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInstalled`] if no bus is installed under `name`.
    pub fn mount(&self, name: &str) -> Result<ComponentScope<A>> {
        let bus = self.bus(name)?;
        Ok(ComponentScope::new(bus, OwnerId::new()))
    }

    /// Creates a component scope on the bus installed under
    /// [`DEFAULT_BUS_NAME`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInstalled`] if no bus is installed under the
    /// default name.
    pub fn mount_default(&self) -> Result<ComponentScope<A>> {
        self.mount(DEFAULT_BUS_NAME)
    }
}

impl<A> Default for AppContext<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for AppContext<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("buses", &self.installed_names())
            .finish()
    }
}
