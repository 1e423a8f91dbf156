use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use vecino_core::hooks::{AfterHook, AroundHook, BeforeHook, ErrorHook, HookContext, Next};
use vecino_core::{bail_vecino, VecinoApp};

use crate::services::{Params, ServerState};

pub struct LogAround;

#[async_trait]
impl AroundHook<Value, Params> for LogAround {
    async fn run(
        &self,
        ctx: &mut HookContext<Value, Params>,
        next: Next<Value, Params>,
    ) -> Result<()> {
        let method = ctx.params.method.clone();
        let path = ctx.params.path.clone();
        let provider = ctx.params.provider.clone();

        tracing::info!(%method, %path, %provider, "-> service call");

        next.run(ctx).await?;

        Ok(())
    }
}

pub struct LogAfter;

#[async_trait]
impl AfterHook<Value, Params> for LogAfter {
    async fn run(&self, ctx: &mut HookContext<Value, Params>) -> Result<()> {
        tracing::info!(
            service_method = ctx.method.as_str(),
            community = ctx.active.community_id.as_str(),
            "<- ok"
        );
        Ok(())
    }
}

pub struct LogError;

#[async_trait]
impl ErrorHook<Value, Params> for LogError {
    async fn run(&self, ctx: &mut HookContext<Value, Params>) -> Result<()> {
        if let Some(err) = &ctx.error {
            tracing::warn!(
                service_method = ctx.method.as_str(),
                community = ctx.active.community_id.as_str(),
                error = %err,
                "<- error"
            );
        }
        Ok(())
    }
}

/// Enrich the header-built context with what the store knows: community
/// flags, the caller's membership role, and the global super-admin bit.
///
/// Fail-closed on every branch: unknown community means empty flags,
/// no membership means the lowest role, and super-admin is only ever read
/// from the user record — never from the request.
pub struct ResolveActiveContext {
    pub state: Arc<ServerState>,
}

#[async_trait]
impl BeforeHook<Value, Params> for ResolveActiveContext {
    async fn run(&self, ctx: &mut HookContext<Value, Params>) -> Result<()> {
        ctx.active.flags = self.state.flags_for(&ctx.active.community_id).await;

        if let Some(user_id) = ctx.active.user_id.clone() {
            ctx.active.super_admin = self.state.is_super_admin(&user_id).await;
            if let Some(membership) = self
                .state
                .membership_for(&user_id, &ctx.active.community_id)
                .await
            {
                ctx.active.role = membership.role;
                ctx.active.membership_id = Some(membership.id);
            }
        }

        Ok(())
    }
}

/// Mutation gate: only a community admin of the active community passes.
///
/// The super-admin flag does not substitute — platform oversight and
/// per-community management stay separate.
pub struct RequireCommunityAdmin;

#[async_trait]
impl BeforeHook<Value, Params> for RequireCommunityAdmin {
    async fn run(&self, ctx: &mut HookContext<Value, Params>) -> Result<()> {
        if ctx.active.is_community_admin() {
            return Ok(());
        }
        if ctx.active.user_id.is_none() {
            bail_vecino!(not_authenticated, "Sign in to manage this community");
        }
        bail_vecino!(forbidden, "Community admin role required");
    }
}

pub fn global_hooks(app: &VecinoApp<Value, Params>, state: Arc<ServerState>) {
    app.hooks(|h| {
        h.around_all(Arc::new(LogAround));
        h.before_all(Arc::new(ResolveActiveContext { state }));
        h.after_all(Arc::new(LogAfter));
        h.error_all(Arc::new(LogError));
    });
}
