use std::collections::HashMap;
use std::sync::Arc;

use crate::VecinoService;

/// A simple registry that maps service names to VecinoService instances.
///
/// Named services can be called from any transport (HTTP, CLI, jobs, etc.)
/// with an explicit [`crate::ActiveContext`].
pub struct ServiceRegistry<R, P = ()> {
    services: HashMap<String, Arc<dyn VecinoService<R, P>>>,
}

impl<R, P> ServiceRegistry<R, P> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Register a service under a given name.
    pub fn register<S>(&mut self, name: S, service: Arc<dyn VecinoService<R, P>>)
    where
        S: Into<String>,
    {
        self.services.insert(name.into(), service);
    }

    /// Look up a service by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn VecinoService<R, P>>> {
        self.services.get(name)
    }
}

impl<R, P> Default for ServiceRegistry<R, P> {
    fn default() -> Self {
        Self::new()
    }
}
