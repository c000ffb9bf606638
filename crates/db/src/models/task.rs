use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub company_id: ObjectId,
    pub project_id: ObjectId,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub progress: u32,
    pub due_date: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Many-to-many join row between a task and a team member.
///
/// Rows are created/deleted in bulk (replace-all semantics on update)
/// and never updated in place. Insertion order is the assignment order;
/// reads sort by `_id` to preserve it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskAssignment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub task_id: ObjectId,
    pub team_member_id: ObjectId,
    pub company_id: ObjectId,
    pub project_id: ObjectId,
    pub assigned_at: DateTime,
}

impl Task {
    pub const COLLECTION: &'static str = "tasks";
}

impl TaskAssignment {
    pub const COLLECTION: &'static str = "task_assignments";
}
