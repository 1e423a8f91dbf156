use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::app::ServiceCaller;
use crate::config::ConfigSnapshot;
use crate::context::ActiveContext;
use crate::service::ServiceMethod;

/// Boxed hook future, borrowing the context for `'a`.
pub type HookFut<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Result of a service call as seen by after hooks and event listeners.
pub enum HookResult<R> {
    One(R),
    Many(Vec<R>),
}

/// Context passed to hooks.
///
/// R = record type
/// P = params type (filters, query options, etc.)
pub struct HookContext<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub active: ActiveContext,
    pub method: ServiceMethod,
    pub params: P,
    pub data: Option<R>,              // input payload (for create/update/patch)
    pub result: Option<HookResult<R>>, // output (for after hooks)
    pub error: Option<anyhow::Error>, // error (for error hooks)
    pub services: ServiceCaller<R, P>,
    pub config: ConfigSnapshot,
}

impl<R, P> HookContext<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new(
        active: ActiveContext,
        method: ServiceMethod,
        params: P,
        services: ServiceCaller<R, P>,
        config: ConfigSnapshot,
    ) -> Self {
        Self {
            active,
            method,
            params,
            data: None,
            result: None,
            error: None,
            services,
            config,
        }
    }
}

/// Runs before the service call; may mutate `ctx.data`/`ctx.params` or
/// abort the call by returning an error.
#[async_trait]
pub trait BeforeHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>) -> Result<()>;
}

/// Runs after a successful service call; may rewrite `ctx.result`.
#[async_trait]
pub trait AfterHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>) -> Result<()>;
}

/// Runs when the pipeline failed; `ctx.error` holds the failure. Clearing
/// `ctx.error` swallows it.
#[async_trait]
pub trait ErrorHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>) -> Result<()>;
}

/// Wraps the whole call; must invoke `next.run(ctx)` to proceed.
#[async_trait]
pub trait AroundHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>, next: Next<R, P>) -> Result<()>;
}

pub(crate) type Terminal<R, P> =
    Box<dyn for<'a> FnOnce(&'a mut HookContext<R, P>) -> HookFut<'a> + Send>;

/// Continuation handed to around hooks: the not-yet-run tail of the
/// around chain, then the before/call/after sequence.
pub struct Next<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    around: VecDeque<Arc<dyn AroundHook<R, P>>>,
    terminal: Terminal<R, P>,
}

impl<R, P> Next<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub(crate) fn new(around: Vec<Arc<dyn AroundHook<R, P>>>, terminal: Terminal<R, P>) -> Self {
        Self {
            around: around.into(),
            terminal,
        }
    }

    /// Run the rest of the pipeline. Each around hook receives the
    /// remainder as its own `Next`.
    pub async fn run(mut self, ctx: &mut HookContext<R, P>) -> Result<()> {
        match self.around.pop_front() {
            Some(hook) => hook.run(ctx, self).await,
            None => (self.terminal)(ctx).await,
        }
    }
}

/// Hook registrations for one scope (the app, or a single service).
///
/// Execution order follows registration order; global hooks run before
/// service hooks, and `*_all` hooks run before method-specific ones.
pub struct ServiceHooks<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub(crate) around_all: Vec<Arc<dyn AroundHook<R, P>>>,
    pub(crate) around_by_method: HashMap<ServiceMethod, Vec<Arc<dyn AroundHook<R, P>>>>,
    pub(crate) before_all: Vec<Arc<dyn BeforeHook<R, P>>>,
    pub(crate) before_by_method: HashMap<ServiceMethod, Vec<Arc<dyn BeforeHook<R, P>>>>,
    pub(crate) after_all: Vec<Arc<dyn AfterHook<R, P>>>,
    pub(crate) after_by_method: HashMap<ServiceMethod, Vec<Arc<dyn AfterHook<R, P>>>>,
    pub(crate) error_all: Vec<Arc<dyn ErrorHook<R, P>>>,
    pub(crate) error_by_method: HashMap<ServiceMethod, Vec<Arc<dyn ErrorHook<R, P>>>>,
}

impl<R, P> ServiceHooks<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            around_all: Vec::new(),
            around_by_method: HashMap::new(),
            before_all: Vec::new(),
            before_by_method: HashMap::new(),
            after_all: Vec::new(),
            after_by_method: HashMap::new(),
            error_all: Vec::new(),
            error_by_method: HashMap::new(),
        }
    }

    pub fn around_all(&mut self, hook: Arc<dyn AroundHook<R, P>>) -> &mut Self {
        self.around_all.push(hook);
        self
    }

    pub fn before_all(&mut self, hook: Arc<dyn BeforeHook<R, P>>) -> &mut Self {
        self.before_all.push(hook);
        self
    }

    pub fn after_all(&mut self, hook: Arc<dyn AfterHook<R, P>>) -> &mut Self {
        self.after_all.push(hook);
        self
    }

    pub fn error_all(&mut self, hook: Arc<dyn ErrorHook<R, P>>) -> &mut Self {
        self.error_all.push(hook);
        self
    }

    pub fn around(&mut self, method: ServiceMethod, hook: Arc<dyn AroundHook<R, P>>) -> &mut Self {
        self.around_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn before(&mut self, method: ServiceMethod, hook: Arc<dyn BeforeHook<R, P>>) -> &mut Self {
        self.before_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn after(&mut self, method: ServiceMethod, hook: Arc<dyn AfterHook<R, P>>) -> &mut Self {
        self.after_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn error(&mut self, method: ServiceMethod, hook: Arc<dyn ErrorHook<R, P>>) -> &mut Self {
        self.error_by_method.entry(method).or_default().push(hook);
        self
    }

    // Convenience registrars for the common method/stage pairs.

    pub fn before_find(&mut self, hook: Arc<dyn BeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethod::Find, hook)
    }

    pub fn before_get(&mut self, hook: Arc<dyn BeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethod::Get, hook)
    }

    pub fn before_create(&mut self, hook: Arc<dyn BeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethod::Create, hook)
    }

    pub fn before_update(&mut self, hook: Arc<dyn BeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethod::Update, hook)
    }

    pub fn before_patch(&mut self, hook: Arc<dyn BeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethod::Patch, hook)
    }

    pub fn before_remove(&mut self, hook: Arc<dyn BeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethod::Remove, hook)
    }

    pub fn after_find(&mut self, hook: Arc<dyn AfterHook<R, P>>) -> &mut Self {
        self.after(ServiceMethod::Find, hook)
    }
}

impl<R, P> Default for ServiceHooks<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Collect `*_all` hooks followed by the method-specific ones.
pub(crate) fn collect_method_hooks<H: ?Sized>(
    all: &[Arc<H>],
    by_method: &HashMap<ServiceMethod, Vec<Arc<H>>>,
    method: &ServiceMethod,
) -> Vec<Arc<H>> {
    let mut out: Vec<Arc<H>> = all.to_vec();
    if let Some(hooks) = by_method.get(method) {
        out.extend(hooks.iter().cloned());
    }
    out
}
