use std::sync::Arc;

use anyhow::Result;

use crate::hooks::HookFut;
use crate::{HookContext, HookResult, ServiceMethod};

/// Standard service event names, emitted after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceEvent {
    Created,
    Updated,
    Patched,
    Removed,
}

/// Listener signature (async). Receives the call result and the full
/// hook context of the call that produced it.
pub type EventListener<R, P> = Arc<
    dyn for<'a> Fn(&'a HookResult<R>, &'a HookContext<R, P>) -> HookFut<'a> + Send + Sync,
>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServicePat {
    Any,
    Exact(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventPat {
    Any,
    Exact(ServiceEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventPattern {
    pub service: ServicePat,
    pub event: EventPat,
}

impl EventPattern {
    pub fn exact(service: impl Into<String>, event: ServiceEvent) -> Self {
        Self {
            service: ServicePat::Exact(service.into()),
            event: EventPat::Exact(event),
        }
    }

    pub fn matches(&self, path: &str, event: ServiceEvent) -> bool {
        let service_ok = match &self.service {
            ServicePat::Any => true,
            ServicePat::Exact(s) => s == path,
        };
        let event_ok = match self.event {
            EventPat::Any => true,
            EventPat::Exact(e) => e == event,
        };
        service_ok && event_ok
    }
}

struct ListenerEntry<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pattern: EventPattern,
    listener: EventListener<R, P>,
}

/// Minimal runtime-agnostic event hub.
///
/// IMPORTANT DESIGN:
/// - Callers must not need `&mut EventHub` just to emit, because the app
///   holds this behind an `RwLock`.
/// - No lock may be held across `.await`.
///
/// So emission is split into:
/// 1) snapshot matching listeners (read-only, no await)
/// 2) await listeners with no lock held
pub struct EventHub<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    listeners: Vec<ListenerEntry<R, P>>,
}

impl<R, P> Default for EventHub<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R, P> EventHub<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Exact: `hub.on_exact("memberships", Created, ...)`
    pub fn on_exact(
        &mut self,
        path: impl Into<String>,
        event: ServiceEvent,
        listener: EventListener<R, P>,
    ) {
        self.on_pattern(EventPattern::exact(path, event), listener)
    }

    pub fn on_pattern(&mut self, pattern: EventPattern, listener: EventListener<R, P>) {
        self.listeners.push(ListenerEntry { pattern, listener });
    }

    /// Snapshot the listeners matching (path, event).
    ///
    /// NOTE: no `.await` here, so it is safe under a read-lock.
    pub fn snapshot_emit(&self, path: &str, event: ServiceEvent) -> Vec<EventListener<R, P>> {
        self.listeners
            .iter()
            .filter(|entry| entry.pattern.matches(path, event))
            .map(|entry| entry.listener.clone())
            .collect()
    }
}

/// Only write methods emit standard events.
pub fn method_to_event(method: &ServiceMethod) -> Option<ServiceEvent> {
    match method {
        ServiceMethod::Create => Some(ServiceEvent::Created),
        ServiceMethod::Update => Some(ServiceEvent::Updated),
        ServiceMethod::Patch => Some(ServiceEvent::Patched),
        ServiceMethod::Remove => Some(ServiceEvent::Removed),
        _ => None,
    }
}

/// Parse sugar strings like "memberships.created", "memberships.*", "*.*"
pub fn parse_event_pattern(input: &str) -> Result<EventPattern> {
    let s = input.trim();

    let (svc, ev) = if let Some((a, b)) = s.split_once(' ') {
        (a.trim(), b.trim())
    } else if let Some((a, b)) = s.split_once('.') {
        (a.trim(), b.trim())
    } else {
        return Err(anyhow::anyhow!(
            "Invalid event pattern '{s}'. Expected 'service event' or 'service.event'."
        ));
    };

    let service = if svc == "*" {
        ServicePat::Any
    } else {
        ServicePat::Exact(svc.to_string())
    };

    let event = if ev == "*" {
        EventPat::Any
    } else {
        EventPat::Exact(parse_event_kind(ev)?)
    };

    Ok(EventPattern { service, event })
}

pub fn parse_event_kind(s: &str) -> Result<ServiceEvent> {
    let norm = s.trim().to_lowercase();
    match norm.as_str() {
        "created" => Ok(ServiceEvent::Created),
        "updated" => Ok(ServiceEvent::Updated),
        "patched" => Ok(ServiceEvent::Patched),
        "removed" => Ok(ServiceEvent::Removed),
        other => Err(anyhow::anyhow!("Unknown service event '{other}'")),
    }
}
