//! # Configuration
//!
//! vecino includes a minimal, framework-agnostic configuration system
//! based on a simple string key/value store, so applications can layer
//! configuration however they like.
//!
//! ## Setting and reading values
//! ```rust
//! use vecino_core::VecinoApp;
//! let app = VecinoApp::<(), ()>::new();
//!
//! app.set("http.host", "127.0.0.1");
//! app.set("http.port", "3031");
//!
//! assert_eq!(app.get("http.port"), Some("3031".to_string()));
//! ```
//!
//! ## Environment overrides
//! The core is intentionally environment-agnostic. Applications may load
//! environment variables using any convention, e.g.:
//!
//! ```rust
//! use vecino_core::VecinoApp;
//! pub fn load_env_config<R, P>(app: &VecinoApp<R, P>, prefix: &str)
//! where
//!     R: Send + 'static,
//!     P: Send + Clone + 'static,
//! {
//!     for (key, value) in std::env::vars() {
//!         if let Some(stripped) = key.strip_prefix(prefix) {
//!             let normalized = stripped
//!                 .to_lowercase()
//!                 .replace("__", "."); // VECINO__HTTP__PORT → http.port
//!
//!             app.set(normalized, value);
//!         }
//!     }
//! }
//! ```
//!
//! Higher-level loaders (TOML, JSON, etc.) are intentionally kept out of
//! the core so each application remains free to choose its own strategy.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct VecinoConfig {
    values: HashMap<String, String>,
}

impl VecinoConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    ///
    /// Returns None if the key is not present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::new(self.values.clone())
    }
}

/// Immutable copy of the config, cheap to hand to hooks.
#[derive(Debug, Clone, Default)]
pub struct ConfigSnapshot {
    map: HashMap<String, String>,
}

impl ConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }
}
