use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::context::ActiveContext;

/// Standard service methods:
/// find, get, create, update, patch, remove.
///
/// Custom methods are declared via `Custom("methodName")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceMethod {
    Find,
    Get,
    Create,
    Update,
    Patch,
    Remove,
    Custom(&'static str),
}

impl ServiceMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceMethod::Find => "find",
            ServiceMethod::Get => "get",
            ServiceMethod::Create => "create",
            ServiceMethod::Update => "update",
            ServiceMethod::Patch => "patch",
            ServiceMethod::Remove => "remove",
            ServiceMethod::Custom(name) => name,
        }
    }
}

/// Capabilities describe which methods a service wants to expose
/// to the outside world.
///
/// Adapters (like vecino-axum) use this to refuse methods a service never
/// offers — e.g. memberships exclude `Remove` because residency history is
/// deactivated, not deleted.
#[derive(Debug, Clone)]
pub struct ServiceCapabilities {
    pub allowed_methods: Vec<ServiceMethod>,
}

impl ServiceCapabilities {
    /// Full CRUD: find, get, create, update, patch, remove.
    pub fn standard_crud() -> Self {
        use ServiceMethod::*;
        Self {
            allowed_methods: vec![Find, Get, Create, Update, Patch, Remove],
        }
    }

    /// Read-only: find and get.
    pub fn read_only() -> Self {
        use ServiceMethod::*;
        Self {
            allowed_methods: vec![Find, Get],
        }
    }

    /// Helper for building from a list.
    pub fn from_methods(methods: Vec<ServiceMethod>) -> Self {
        Self {
            allowed_methods: methods,
        }
    }

    pub fn allows(&self, method: &ServiceMethod) -> bool {
        self.allowed_methods.contains(method)
    }
}

/// Core vecino service trait:
///
/// - `find`   → list/query many
/// - `get`    → fetch one by id
/// - `create` → create one
/// - `update` → full replace
/// - `patch`  → partial update
/// - `remove` → delete one or many
///
/// All methods have default implementations that return
/// "Method not implemented", so a service can override only
/// what it actually supports. Every method receives the caller's
/// [`ActiveContext`] so records stay scoped to one community.
#[async_trait]
pub trait VecinoService<R, P = ()>: Send + Sync
where
    R: Send + 'static,
    P: Send + 'static,
{
    /// Describe which methods this service wants to expose.
    fn capabilities(&self) -> ServiceCapabilities {
        ServiceCapabilities::standard_crud()
    }

    /// Find many records (optionally filtered by params).
    async fn find(&self, _ctx: &ActiveContext, _params: P) -> Result<Vec<R>> {
        Err(anyhow!("Method not implemented: find"))
    }

    /// Get a single record by id.
    async fn get(&self, _ctx: &ActiveContext, _id: &str, _params: P) -> Result<R> {
        Err(anyhow!("Method not implemented: get"))
    }

    /// Create a new record.
    async fn create(&self, _ctx: &ActiveContext, _data: R, _params: P) -> Result<R> {
        Err(anyhow!("Method not implemented: create"))
    }

    /// Fully replace an existing record. `id` is required.
    async fn update(&self, _ctx: &ActiveContext, _id: &str, _data: R, _params: P) -> Result<R> {
        Err(anyhow!("Method not implemented: update"))
    }

    /// Partially update an existing record.
    ///
    /// `id` can be `None` to indicate "multi" semantics if an
    /// implementation supports it.
    async fn patch(
        &self,
        _ctx: &ActiveContext,
        _id: Option<&str>,
        _data: R,
        _params: P,
    ) -> Result<R> {
        Err(anyhow!("Method not implemented: patch"))
    }

    /// Remove an existing record.
    async fn remove(&self, _ctx: &ActiveContext, _id: Option<&str>, _params: P) -> Result<R> {
        Err(anyhow!("Method not implemented: remove"))
    }
}
