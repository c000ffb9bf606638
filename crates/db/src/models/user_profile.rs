use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Local profile for an externally-authenticated user.
///
/// Created at most once per distinct `subject_id` (the identity
/// provider's stable user id); creation happens lazily on the first
/// verified request, guarded by a unique index on `subject_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub subject_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub terms_accepted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl UserProfile {
    pub const COLLECTION: &'static str = "user_profiles";
}
