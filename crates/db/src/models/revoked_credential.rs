use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// A revoked bearer credential, keyed by its `jti` claim.
///
/// A TTL index on `expires_at` drops the row once the credential it
/// blocks would have expired anyway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokedCredential {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub jti: String,
    pub expires_at: DateTime,
    pub revoked_at: DateTime,
}

impl RevokedCredential {
    pub const COLLECTION: &'static str = "revoked_credentials";
}
