use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Metadata for a file stored in an external binary object store.
/// Upload streaming happens outside this service; only the returned
/// URL and metadata are persisted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub company_id: ObjectId,
    pub project_id: Option<ObjectId>,
    pub name: String,
    pub url: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<u64>,
    pub uploaded_by: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Asset {
    pub const COLLECTION: &'static str = "assets";
}
