// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Installation options.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Name a bus is installed under when no name is configured.
pub const DEFAULT_BUS_NAME: &str = "$eventBus";

/// Short name used by packaged builds, for hosts that expect it.
pub const PACKAGED_BUS_NAME: &str = "$bus";

/// Options accepted by [`AppContext::install`](crate::AppContext::install).
///
/// # Examples
///
/// ```
/// use component_bus::{InstallOptions, DEFAULT_BUS_NAME};
///
/// let options = InstallOptions::new();
/// assert_eq!(options.resolved_name(), DEFAULT_BUS_NAME);
///
/// let options = InstallOptions::new().with_name("$bus");
/// assert_eq!(options.resolved_name(), "$bus");
///
/// let options = InstallOptions::from_json(r#"{ "name": "$hub" }"#)?;
/// assert_eq!(options.resolved_name(), "$hub");
/// # Ok::<(), component_bus::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallOptions {
    /// Name the bus is exposed under. Missing or empty means
    /// [`DEFAULT_BUS_NAME`].
    pub name: Option<String>,
}

impl InstallOptions {
    /// Creates options with every setting at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name the bus is exposed under.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parses options from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Options`](crate::Error::Options) if the input is not
    /// a valid options object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the name the bus will be installed under.
    #[must_use]
    pub fn resolved_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_BUS_NAME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn default_name() {
        assert_eq!(InstallOptions::new().resolved_name(), "$eventBus");
    }

    #[test]
    fn empty_name_falls_back_to_default() {
        let options = InstallOptions::new().with_name("");
        assert_eq!(options.resolved_name(), DEFAULT_BUS_NAME);
    }

    #[test]
    fn custom_name() {
        let options = InstallOptions::new().with_name(PACKAGED_BUS_NAME);
        assert_eq!(options.resolved_name(), "$bus");
    }

    #[test]
    fn from_json_empty_object() {
        let options = InstallOptions::from_json("{}").unwrap();
        assert_eq!(options, InstallOptions::default());
    }

    #[test]
    fn from_json_with_name() {
        let options = InstallOptions::from_json(r#"{"name":"$hub"}"#).unwrap();
        assert_eq!(options.name.as_deref(), Some("$hub"));
    }

    #[test]
    fn from_json_rejects_wrong_type() {
        let result = InstallOptions::from_json(r#"{"name":42}"#);
        assert!(matches!(result, Err(Error::Options(_))));
    }
}
