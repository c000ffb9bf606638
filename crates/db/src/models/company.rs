use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// The tenant. Every other domain entity is scoped to exactly one
/// company via its `company_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub owner_profile_id: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Company {
    pub const COLLECTION: &'static str = "companies";
}
