use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::Result;

use crate::events::{method_to_event, EventHub, EventListener};
use crate::hooks::{collect_method_hooks, HookFut};
use crate::{
    ActiveContext, HookContext, HookResult, Next, ServiceHooks, ServiceMethod, ServiceRegistry,
    VecinoConfig, VecinoService,
};

struct VecinoAppInner<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    registry: RwLock<ServiceRegistry<R, P>>,
    global_hooks: RwLock<ServiceHooks<R, P>>,
    service_hooks: RwLock<HashMap<String, ServiceHooks<R, P>>>,
    config: RwLock<VecinoConfig>,
    // Store the concrete Arc<dyn VecinoService<R,P>> as Box<dyn Any>
    // so hooks can reach differently-typed services by name.
    any_services: RwLock<HashMap<String, Box<dyn Any + Send + Sync>>>,
    events: RwLock<EventHub<R, P>>,
}

/// VecinoApp is the central application container.
///
/// Framework-agnostic. Holds:
/// - service registry
/// - app hooks
/// - per-service hooks
/// - config
/// - event hub
pub struct VecinoApp<R, P = ()>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    inner: Arc<VecinoAppInner<R, P>>,
}

type HooksForMethod<R, P> = (
    Vec<Arc<dyn crate::AroundHook<R, P>>>,
    Vec<Arc<dyn crate::BeforeHook<R, P>>>,
    Vec<Arc<dyn crate::AfterHook<R, P>>>,
    Vec<Arc<dyn crate::ErrorHook<R, P>>>,
);

type ServiceCall<R, P> = Arc<
    dyn for<'a> Fn(Arc<dyn VecinoService<R, P>>, &'a mut HookContext<R, P>) -> HookFut<'a>
        + Send
        + Sync,
>;

impl<R, P> Default for VecinoApp<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R, P> Clone for VecinoApp<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R, P> VecinoApp<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(VecinoAppInner {
                registry: RwLock::new(ServiceRegistry::new()),
                global_hooks: RwLock::new(ServiceHooks::new()),
                service_hooks: RwLock::new(HashMap::new()),
                config: RwLock::new(VecinoConfig::new()),
                any_services: RwLock::new(HashMap::new()),
                events: RwLock::new(EventHub::new()),
            }),
        }
    }

    pub fn register_service<S>(&self, name: S, service: Arc<dyn VecinoService<R, P>>)
    where
        S: Into<String>,
    {
        let name = name.into();

        // typed registry
        self.inner
            .registry
            .write()
            .unwrap()
            .register(name.clone(), service.clone());

        // any registry: store the concrete Arc<dyn VecinoService<R,P>>
        self.inner
            .any_services
            .write()
            .unwrap()
            .insert(name, Box::new(service));
    }

    /// Register hooks that run for every service.
    pub fn hooks<F>(&self, f: F)
    where
        F: FnOnce(&mut ServiceHooks<R, P>),
    {
        let mut g = self.inner.global_hooks.write().unwrap();
        f(&mut g);
    }

    pub(crate) fn configure_service_hooks<F>(&self, service_name: &str, f: F)
    where
        F: FnOnce(&mut ServiceHooks<R, P>),
    {
        let mut map = self.inner.service_hooks.write().unwrap();
        let hooks = map.entry(service_name.to_string()).or_default();
        f(hooks);
    }

    /// `app.service("tips")` — a handle that runs the hook pipeline.
    pub fn service(&self, name: &str) -> Result<ServiceHandle<R, P>> {
        let svc = self
            .inner
            .registry
            .read()
            .unwrap()
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("VecinoService not found: {name}"))?
            .clone();

        Ok(ServiceHandle {
            app: self.clone(),
            name: name.to_string(),
            service: svc,
        })
    }

    /// `app.set(key, value)`
    pub fn set<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.inner.config.write().unwrap().set(key, value);
    }

    /// `app.get(key)`
    pub fn get(&self, key: &str) -> Option<String> {
        let cfg = self.inner.config.read().unwrap();
        cfg.get(key).map(|v| v.to_string())
    }

    pub fn config_snapshot(&self) -> crate::ConfigSnapshot {
        let cfg = self.inner.config.read().unwrap();
        cfg.snapshot()
    }

    /// `app.on("memberships", ServiceEvent::Created, Arc::new(|result, ctx| { /* ... */ }));`
    pub fn on(
        &self,
        path: impl Into<String>,
        event: crate::ServiceEvent,
        listener: EventListener<R, P>,
    ) {
        self.inner
            .events
            .write()
            .unwrap()
            .on_exact(path, event, listener);
    }

    /// Sugar: `app.on_str("memberships.*", listener)`
    pub fn on_str(&self, pattern: &str, listener: EventListener<R, P>) -> Result<()> {
        let pat = crate::events::parse_event_pattern(pattern)?;
        self.inner.events.write().unwrap().on_pattern(pat, listener);
        Ok(())
    }
}

pub struct ServiceHandle<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    app: VecinoApp<R, P>,
    name: String,
    service: Arc<dyn VecinoService<R, P>>,
}

impl<R, P> ServiceHandle<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    /// `app.service("tips")?.hooks(|h| { ... })`
    pub fn hooks<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut ServiceHooks<R, P>),
    {
        self.app.configure_service_hooks(&self.name, f);
        self
    }

    pub fn inner(&self) -> &Arc<dyn VecinoService<R, P>> {
        &self.service
    }

    /// Collect hooks in execution order: global first, then service.
    fn collect_hooks_for_method(&self, method: &ServiceMethod) -> HooksForMethod<R, P> {
        let g = self.app.inner.global_hooks.read().unwrap();
        let map = self.app.inner.service_hooks.read().unwrap();
        let s = map.get(&self.name);

        // GLOBAL
        let mut around = collect_method_hooks(&g.around_all, &g.around_by_method, method);
        let mut before = collect_method_hooks(&g.before_all, &g.before_by_method, method);
        let mut after = collect_method_hooks(&g.after_all, &g.after_by_method, method);
        let mut error = collect_method_hooks(&g.error_all, &g.error_by_method, method);

        // SERVICE (append after global)
        if let Some(h) = s {
            around.extend(collect_method_hooks(
                &h.around_all,
                &h.around_by_method,
                method,
            ));
            before.extend(collect_method_hooks(
                &h.before_all,
                &h.before_by_method,
                method,
            ));
            after.extend(collect_method_hooks(
                &h.after_all,
                &h.after_by_method,
                method,
            ));
            error.extend(collect_method_hooks(
                &h.error_all,
                &h.error_by_method,
                method,
            ));
        }

        (around, before, after, error)
    }

    /// Core pipeline:
    /// around → before → service_call → after → error
    async fn run_pipeline(
        &self,
        method: ServiceMethod,
        mut ctx: HookContext<R, P>,
        service_call: ServiceCall<R, P>,
    ) -> Result<HookContext<R, P>> {
        let (around, before, after, error) = self.collect_hooks_for_method(&method);

        let svc = self.service.clone();

        // Inner: BEFORE -> service_call -> AFTER. The around chain wraps
        // this, first hook outermost.
        let terminal: crate::hooks::Terminal<R, P> =
            Box::new(move |ctx: &mut HookContext<R, P>| {
                Box::pin(async move {
                    for h in &before {
                        h.run(ctx).await?;
                    }

                    // sets ctx.result
                    (service_call)(svc, ctx).await?;

                    for h in after.iter().rev() {
                        h.run(ctx).await?;
                    }

                    Ok(())
                })
            });

        // Execute (around/before/service/after)
        let res = Next::new(around, terminal).run(&mut ctx).await;

        // If error, run error hooks
        if let Err(e) = res {
            ctx.error = Some(e);

            for h in &error {
                let _ = h.run(&mut ctx).await;
            }

            // If still error, return it
            if let Some(err) = ctx.error.take() {
                return Err(err);
            }
        }

        // SUCCESS PATH: AFTER hooks are complete here.
        // Emit the standard event only now.
        if ctx.error.is_none() {
            if let Some(event) = method_to_event(&method) {
                if let Some(result) = ctx.result.as_ref() {
                    let listeners = {
                        let hub = self.app.inner.events.read().unwrap();
                        hub.snapshot_emit(&self.name, event)
                    };

                    for f in &listeners {
                        let _ = f(result, &ctx).await;
                    }
                }
            }
        }

        Ok(ctx)
    }

    // ──────────────────────────────────────────────────────────────
    // Methods wired through the pipeline
    // ──────────────────────────────────────────────────────────────

    pub async fn find(&self, active: ActiveContext, params: P) -> Result<Vec<R>> {
        let method = ServiceMethod::Find;

        let services = ServiceCaller::new(self.app.clone());
        let config = self.app.config_snapshot();
        let ctx = HookContext::new(active, method.clone(), params, services, config);

        let ctx = self
            .run_pipeline(
                method,
                ctx,
                Arc::new(|svc, ctx| {
                    Box::pin(async move {
                        let records = svc.find(&ctx.active, ctx.params.clone()).await?;
                        ctx.result = Some(HookResult::Many(records));
                        Ok(())
                    })
                }),
            )
            .await?;

        match ctx.result {
            Some(HookResult::Many(v)) => Ok(v),
            Some(HookResult::One(_)) => Err(anyhow::anyhow!(
                "find() produced HookResult::One unexpectedly"
            )),
            None => Ok(vec![]),
        }
    }

    pub async fn get(&self, active: ActiveContext, id: &str, params: P) -> Result<R> {
        let method = ServiceMethod::Get;

        let services = ServiceCaller::new(self.app.clone());
        let config = self.app.config_snapshot();
        let ctx = HookContext::new(active, method.clone(), params, services, config);

        let id = id.to_string();

        let ctx = self
            .run_pipeline(
                method,
                ctx,
                Arc::new(move |svc, ctx| {
                    let id = id.clone();
                    Box::pin(async move {
                        let record = svc.get(&ctx.active, &id, ctx.params.clone()).await?;
                        ctx.result = Some(HookResult::One(record));
                        Ok(())
                    })
                }),
            )
            .await?;

        match ctx.result {
            Some(HookResult::One(v)) => Ok(v),
            Some(HookResult::Many(_)) => Err(anyhow::anyhow!(
                "get() produced HookResult::Many unexpectedly"
            )),
            None => Err(anyhow::anyhow!("get() produced no result")),
        }
    }

    pub async fn create(&self, active: ActiveContext, data: R, params: P) -> Result<R> {
        let method = ServiceMethod::Create;

        let services = ServiceCaller::new(self.app.clone());
        let config = self.app.config_snapshot();
        let mut ctx = HookContext::new(active, method.clone(), params, services, config);
        ctx.data = Some(data);

        let ctx = self
            .run_pipeline(
                method,
                ctx,
                Arc::new(|svc, ctx| {
                    Box::pin(async move {
                        let data = ctx
                            .data
                            .take()
                            .ok_or_else(|| anyhow::anyhow!("create() requires ctx.data"))?;

                        let created = svc.create(&ctx.active, data, ctx.params.clone()).await?;
                        ctx.result = Some(HookResult::One(created));
                        Ok(())
                    })
                }),
            )
            .await?;

        match ctx.result {
            Some(HookResult::One(v)) => Ok(v),
            Some(HookResult::Many(_)) => Err(anyhow::anyhow!(
                "create() produced HookResult::Many unexpectedly"
            )),
            None => Err(anyhow::anyhow!("create() produced no result")),
        }
    }

    pub async fn update(&self, active: ActiveContext, id: &str, data: R, params: P) -> Result<R> {
        let method = ServiceMethod::Update;

        let services = ServiceCaller::new(self.app.clone());
        let config = self.app.config_snapshot();
        let mut ctx = HookContext::new(active, method.clone(), params, services, config);
        ctx.data = Some(data);

        let id = id.to_string();

        let ctx = self
            .run_pipeline(
                method,
                ctx,
                Arc::new(move |svc, ctx| {
                    let id = id.clone();
                    Box::pin(async move {
                        let data = ctx
                            .data
                            .take()
                            .ok_or_else(|| anyhow::anyhow!("update() requires ctx.data"))?;

                        let updated = svc
                            .update(&ctx.active, &id, data, ctx.params.clone())
                            .await?;

                        ctx.result = Some(HookResult::One(updated));
                        Ok(())
                    })
                }),
            )
            .await?;

        match ctx.result {
            Some(HookResult::One(v)) => Ok(v),
            Some(HookResult::Many(_)) => Err(anyhow::anyhow!(
                "update() produced HookResult::Many unexpectedly"
            )),
            None => Err(anyhow::anyhow!("update() produced no result")),
        }
    }

    pub async fn patch(
        &self,
        active: ActiveContext,
        id: Option<&str>,
        data: R,
        params: P,
    ) -> Result<R> {
        let method = ServiceMethod::Patch;

        let services = ServiceCaller::new(self.app.clone());
        let config = self.app.config_snapshot();
        let mut ctx = HookContext::new(active, method.clone(), params, services, config);
        ctx.data = Some(data);

        let id: Option<String> = id.map(|s| s.to_string());

        let ctx = self
            .run_pipeline(
                method,
                ctx,
                Arc::new(move |svc, ctx| {
                    let id = id.clone();
                    Box::pin(async move {
                        let data = ctx
                            .data
                            .take()
                            .ok_or_else(|| anyhow::anyhow!("patch() requires ctx.data"))?;

                        let patched = svc
                            .patch(&ctx.active, id.as_deref(), data, ctx.params.clone())
                            .await?;

                        ctx.result = Some(HookResult::One(patched));
                        Ok(())
                    })
                }),
            )
            .await?;

        match ctx.result {
            Some(HookResult::One(v)) => Ok(v),
            Some(HookResult::Many(_)) => Err(anyhow::anyhow!(
                "patch() produced HookResult::Many unexpectedly"
            )),
            None => Err(anyhow::anyhow!("patch() produced no result")),
        }
    }

    pub async fn remove(&self, active: ActiveContext, id: Option<&str>, params: P) -> Result<R> {
        let method = ServiceMethod::Remove;

        let services = ServiceCaller::new(self.app.clone());
        let config = self.app.config_snapshot();
        let ctx = HookContext::new(active, method.clone(), params, services, config);

        let id: Option<String> = id.map(|s| s.to_string());

        let ctx = self
            .run_pipeline(
                method,
                ctx,
                Arc::new(move |svc, ctx| {
                    let id = id.clone();
                    Box::pin(async move {
                        let removed = svc
                            .remove(&ctx.active, id.as_deref(), ctx.params.clone())
                            .await?;

                        ctx.result = Some(HookResult::One(removed));
                        Ok(())
                    })
                }),
            )
            .await?;

        match ctx.result {
            Some(HookResult::One(v)) => Ok(v),
            Some(HookResult::Many(_)) => Err(anyhow::anyhow!(
                "remove() produced HookResult::Many unexpectedly"
            )),
            None => Err(anyhow::anyhow!("remove() produced no result")),
        }
    }
}

/// Cross-service caller available to hooks via `ctx.services`.
pub struct ServiceCaller<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    app: VecinoApp<R, P>,
}

impl<R, P> Clone for ServiceCaller<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            app: self.app.clone(),
        }
    }
}

impl<R, P> ServiceCaller<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new(app: VecinoApp<R, P>) -> Self {
        Self { app }
    }

    pub fn service<R2, P2>(&self, name: &str) -> Result<Arc<dyn VecinoService<R2, P2>>>
    where
        R2: Send + 'static,
        P2: Send + 'static,
    {
        let map = self.app.inner.any_services.read().unwrap();

        let any = map
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("VecinoService not found: {name}"))?;

        let stored = any
            .as_ref()
            .downcast_ref::<Arc<dyn VecinoService<R2, P2>>>()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "VecinoService type mismatch for '{name}'. \
                     You requested a different <R,P> than what was registered."
                )
            })?;

        Ok(stored.clone())
    }
}
