use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub company_id: ObjectId,
    pub task_id: ObjectId,
    pub author_member_id: ObjectId,
    pub content: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Comment {
    pub const COLLECTION: &'static str = "comments";
}
