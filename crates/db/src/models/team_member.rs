use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Membership binding a user profile to a company with an access level.
///
/// `user_id` is None for invite rows whose email has not yet matched a
/// profile; it is linked on invite when a profile with that email
/// already exists. A unique sparse index enforces at most one
/// membership per linked user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ObjectId>,
    pub company_id: ObjectId,
    pub email: String,
    pub role: String,
    pub access: Access,
    #[serde(default)]
    pub status: MemberStatus,
    /// Legacy avatar carried on the membership row; display code prefers
    /// the profile's photo_url when one exists.
    pub avatar: Option<String>,
    pub last_login: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "superAdmin")]
    SuperAdmin,
    #[serde(rename = "team_member")]
    TeamMember,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Admin => "admin",
            Access::SuperAdmin => "superAdmin",
            Access::TeamMember => "team_member",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    #[default]
    Active,
    Invited,
    Suspended,
}

impl TeamMember {
    pub const COLLECTION: &'static str = "team_members";
}
