//! vecino-core: framework-agnostic service kernel for vecino.

pub mod app;
pub mod config;
pub mod context;
pub mod errors;
pub mod events;
pub mod hooks;
pub mod registry;
pub mod schema;
pub mod service;

mod adapters;

pub use app::{ServiceCaller, ServiceHandle, VecinoApp};
pub use config::{ConfigSnapshot, VecinoConfig};
pub use context::{ActiveContext, CommunityId, FeatureFlags, Membership, MembershipId, Role};
pub use errors::{ErrorKind, VecinoError, VecinoResult};
pub use events::{
    method_to_event, parse_event_pattern, EventHub, EventListener, EventPattern, ServiceEvent,
};
pub use hooks::{
    AfterHook, AroundHook, BeforeHook, ErrorHook, HookContext, HookFut, HookResult, Next,
    ServiceHooks,
};
pub use registry::ServiceRegistry;
pub use schema::{HookMeta, ResolveData, Rules, SchemaHooksExt, ValidateData, WriteMethods};
pub use service::{ServiceCapabilities, ServiceMethod, VecinoService};
