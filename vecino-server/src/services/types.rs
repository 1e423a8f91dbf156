use std::collections::HashMap;

use serde_json::{json, Value};
use tokio::sync::RwLock;
use vecino_core::{CommunityId, FeatureFlags, Membership};
use vecino_nav::FlagSource;

pub type Params = vecino_axum::params::RestParams;

pub type RecordMap = HashMap<String, Value>;
pub type TenantRecords = RwLock<HashMap<String, RecordMap>>;

/// The hosted data store: per-community record collections plus the
/// community and user directories.
#[derive(Default)]
pub struct ServerState {
    pub communities: RwLock<RecordMap>,
    pub users: RwLock<RecordMap>,
    pub tip_categories_by_community: TenantRecords,
    pub tips_by_community: TenantRecords,
    pub memberships_by_community: TenantRecords,
    pub invites_by_community: TenantRecords,
}

impl ServerState {
    /// Demo fixtures: two communities, an admin, residents, a platform
    /// super-admin, and an open invite.
    pub fn seeded() -> Self {
        let mut communities = RecordMap::new();
        communities.insert(
            "laurel-court".to_string(),
            json!({
                "id": "laurel-court",
                "name": "Laurel Court",
                "features": { "issues": true, "events": true, "tips": true, "bookings": false },
            }),
        );
        communities.insert(
            "cedar-yard".to_string(),
            json!({
                "id": "cedar-yard",
                "name": "Cedar Yard",
                "features": { "tips": true },
            }),
        );

        let mut users = RecordMap::new();
        users.insert("ana".to_string(), json!({ "id": "ana", "superAdmin": false }));
        users.insert("ben".to_string(), json!({ "id": "ben", "superAdmin": false }));
        users.insert(
            "sofia".to_string(),
            json!({ "id": "sofia", "superAdmin": true }),
        );

        let mut memberships: HashMap<String, RecordMap> = HashMap::new();
        let laurel = memberships.entry("laurel-court".to_string()).or_default();
        laurel.insert(
            "membership:ana-laurel".to_string(),
            json!({
                "id": "membership:ana-laurel",
                "communityId": "laurel-court",
                "userId": "ana",
                "role": "community_admin",
                "isDefault": true,
                "active": true,
            }),
        );
        laurel.insert(
            "membership:ben-laurel".to_string(),
            json!({
                "id": "membership:ben-laurel",
                "communityId": "laurel-court",
                "userId": "ben",
                "role": "resident",
                "isDefault": false,
                "active": true,
            }),
        );
        laurel.insert(
            "membership:sofia-laurel".to_string(),
            json!({
                "id": "membership:sofia-laurel",
                "communityId": "laurel-court",
                "userId": "sofia",
                "role": "resident",
                "isDefault": false,
                "active": true,
            }),
        );
        let cedar = memberships.entry("cedar-yard".to_string()).or_default();
        cedar.insert(
            "membership:ana-cedar".to_string(),
            json!({
                "id": "membership:ana-cedar",
                "communityId": "cedar-yard",
                "userId": "ana",
                "role": "community_admin",
                "isDefault": false,
                "active": true,
            }),
        );
        // Ben used to live in Cedar Yard; the record is kept for history.
        cedar.insert(
            "membership:ben-cedar".to_string(),
            json!({
                "id": "membership:ben-cedar",
                "communityId": "cedar-yard",
                "userId": "ben",
                "role": "resident",
                "isDefault": false,
                "active": false,
            }),
        );

        let mut invites: HashMap<String, RecordMap> = HashMap::new();
        invites.entry("cedar-yard".to_string()).or_default().insert(
            "invite:cedar-1".to_string(),
            json!({
                "id": "invite:cedar-1",
                "communityId": "cedar-yard",
                "token": "cedar-welcome",
                "role": "resident",
                "status": "open",
                "createdBy": "ana",
            }),
        );

        Self {
            communities: RwLock::new(communities),
            users: RwLock::new(users),
            tip_categories_by_community: RwLock::new(HashMap::new()),
            tips_by_community: RwLock::new(HashMap::new()),
            memberships_by_community: RwLock::new(memberships),
            invites_by_community: RwLock::new(invites),
        }
    }

    /// Feature flags for a community. Unknown communities read as an empty
    /// set, so everything feature-gated stays off.
    pub async fn flags_for(&self, community: &CommunityId) -> FeatureFlags {
        let communities = self.communities.read().await;
        communities
            .get(community.as_str())
            .and_then(|c| c.get("features"))
            .and_then(|f| serde_json::from_value(f.clone()).ok())
            .unwrap_or_default()
    }

    pub async fn is_super_admin(&self, user_id: &str) -> bool {
        let users = self.users.read().await;
        users
            .get(user_id)
            .and_then(|u| u.get("superAdmin"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The user's active membership in one community, if any.
    pub async fn membership_for(
        &self,
        user_id: &str,
        community: &CommunityId,
    ) -> Option<Membership> {
        let map = self.memberships_by_community.read().await;
        map.get(community.as_str())?
            .values()
            .filter_map(|v| serde_json::from_value::<Membership>(v.clone()).ok())
            .find(|m| m.user_id == user_id && m.active)
    }

    /// Every membership record for a user, across communities, including
    /// deactivated ones (residency history is never deleted).
    pub async fn memberships_for_user(&self, user_id: &str) -> Vec<Membership> {
        let map = self.memberships_by_community.read().await;
        let mut out: Vec<Membership> = map
            .values()
            .flat_map(|records| records.values())
            .filter_map(|v| serde_json::from_value::<Membership>(v.clone()).ok())
            .filter(|m| m.user_id == user_id)
            .collect();
        out.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        out
    }

    /// Snapshot of every community's flags, for the synchronous switcher.
    pub async fn flag_table(&self) -> CommunityFlagTable {
        let communities = self.communities.read().await;
        let flags = communities
            .iter()
            .map(|(id, record)| {
                let set: FeatureFlags = record
                    .get("features")
                    .and_then(|f| serde_json::from_value(f.clone()).ok())
                    .unwrap_or_default();
                (id.clone(), set)
            })
            .collect();
        CommunityFlagTable { flags }
    }

    /// Clear the default flag on the user's other memberships. Best
    /// effort: anomalies are logged, nothing is rolled back.
    pub async fn clear_other_defaults(&self, user_id: &str, keep_id: &str) {
        let mut map = self.memberships_by_community.write().await;
        for records in map.values_mut() {
            for record in records.values_mut() {
                let same_user =
                    record.get("userId").and_then(Value::as_str) == Some(user_id);
                let is_keep = record.get("id").and_then(Value::as_str) == Some(keep_id);
                let was_default = record
                    .get("isDefault")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                if same_user && !is_keep && was_default {
                    if let Some(obj) = record.as_object_mut() {
                        obj.insert("isDefault".to_string(), Value::Bool(false));
                        tracing::debug!(
                            user = user_id,
                            membership = ?obj.get("id"),
                            "cleared previous default membership"
                        );
                    }
                }
            }
        }
    }

    pub async fn count_tips_in_category(&self, community: &str, category_id: &str) -> usize {
        let tips = self.tips_by_community.read().await;
        tips.get(community)
            .map(|records| {
                records
                    .values()
                    .filter(|v| v.get("categoryId").and_then(Value::as_str) == Some(category_id))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Delete every tip in a category and report how many went.
    pub async fn remove_tips_in_category(&self, community: &str, category_id: &str) -> usize {
        let mut tips = self.tips_by_community.write().await;
        let Some(records) = tips.get_mut(community) else {
            return 0;
        };
        let before = records.len();
        records.retain(|_, v| v.get("categoryId").and_then(Value::as_str) != Some(category_id));
        before - records.len()
    }
}

/// Immutable per-community flag snapshot handed to the switcher.
pub struct CommunityFlagTable {
    flags: HashMap<String, FeatureFlags>,
}

impl FlagSource for CommunityFlagTable {
    fn flags_for(&self, community: &CommunityId) -> FeatureFlags {
        self.flags
            .get(community.as_str())
            .cloned()
            .unwrap_or_default()
    }
}
