use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use vecino_core::{VecinoApp, VecinoService};

pub mod adapters;
pub mod invites;
pub mod memberships;
pub mod navigation;
pub mod tip_categories;
pub mod tips;
pub mod types;

pub use types::{CommunityFlagTable, Params, RecordMap, ServerState, TenantRecords};

pub struct Services {
    pub tip_categories: Arc<dyn VecinoService<Value, Params>>,
    pub tips: Arc<dyn VecinoService<Value, Params>>,
    pub memberships: Arc<dyn VecinoService<Value, Params>>,
    pub invites: Arc<dyn VecinoService<Value, Params>>,
    pub navigation: Arc<dyn VecinoService<Value, Params>>,
}

pub fn configure(app: &VecinoApp<Value, Params>, state: Arc<ServerState>) -> Result<Services> {
    let tip_categories: Arc<dyn VecinoService<Value, Params>> = Arc::new(
        tip_categories::TipCategoriesService::new(Arc::clone(&state)),
    );
    let tips: Arc<dyn VecinoService<Value, Params>> =
        Arc::new(tips::TipsService::new(Arc::clone(&state)));
    let memberships: Arc<dyn VecinoService<Value, Params>> =
        Arc::new(memberships::MembershipsService::new(Arc::clone(&state)));
    let invites: Arc<dyn VecinoService<Value, Params>> =
        Arc::new(invites::invites_store(Arc::clone(&state)));
    let navigation: Arc<dyn VecinoService<Value, Params>> =
        Arc::new(navigation::NavigationService);

    app.register_service("tip-categories", Arc::clone(&tip_categories));
    app.register_service("tips", Arc::clone(&tips));
    app.register_service("memberships", Arc::clone(&memberships));
    app.register_service("invites", Arc::clone(&invites));
    app.register_service("navigation", Arc::clone(&navigation));

    tip_categories::tip_categories_shared::register_hooks(app, Arc::clone(&state))?;
    tips::tips_shared::register_hooks(app)?;
    memberships::memberships_shared::register_hooks(app)?;
    invites::invites_shared::register_hooks(app)?;

    Ok(Services {
        tip_categories,
        tips,
        memberships,
        invites,
        navigation,
    })
}
