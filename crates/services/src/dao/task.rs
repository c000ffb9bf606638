use std::collections::HashMap;

use bson::{DateTime, doc, oid::ObjectId};
use crewdeck_db::models::{
    Task, TaskAssignment, TaskPriority, TaskStatus, TeamMember, UserProfile,
};
use mongodb::Database;
use serde::Serialize;

use super::base::{BaseDao, DaoError, DaoResult};

/// Hydrated assignee display record, derived by following
/// TaskAssignment -> TeamMember -> UserProfile.
#[derive(Debug, Clone, Serialize)]
pub struct TaskAssignee {
    pub id: ObjectId,
    pub email: String,
    pub role: String,
    pub status: crewdeck_db::models::MemberStatus,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

/// Read-only projection of a task plus its ordered assignees. Never
/// stored; reconstructed on every read.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedTask {
    #[serde(flatten)]
    pub task: Task,
    pub assignees: Vec<TaskAssignee>,
}

pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub progress: u32,
    pub due_date: Option<DateTime>,
}

#[derive(Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub progress: Option<u32>,
    pub due_date: Option<DateTime>,
    /// None leaves the assignment set untouched; Some (even empty)
    /// replaces it wholesale.
    pub team_member_ids: Option<Vec<ObjectId>>,
}

pub struct TaskDao {
    pub base: BaseDao<Task>,
    pub assignments: BaseDao<TaskAssignment>,
    members: BaseDao<TeamMember>,
    profiles: BaseDao<UserProfile>,
}

impl TaskDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Task::COLLECTION),
            assignments: BaseDao::new(db, TaskAssignment::COLLECTION),
            members: BaseDao::new(db, TeamMember::COLLECTION),
            profiles: BaseDao::new(db, UserProfile::COLLECTION),
        }
    }

    /// Create a task, optionally bulk-assigning team members.
    ///
    /// There is no cross-collection transaction here, so a failed
    /// assignment insert compensates by deleting the just-created task
    /// (and any assignment rows that did land). The caller observes a
    /// clean failure instead of a task that silently lost its
    /// assignees.
    pub async fn create_with_assignees(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        input: NewTask,
        team_member_ids: Vec<ObjectId>,
    ) -> DaoResult<Task> {
        let now = DateTime::now();
        let task = Task {
            id: None,
            company_id,
            project_id,
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            progress: input.progress,
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        };

        if !team_member_ids.is_empty() {
            self.assert_members_in_company(company_id, &team_member_ids)
                .await?;
        }

        let task_id = self.base.insert_one(&task).await?;

        if !team_member_ids.is_empty() {
            if let Err(e) = self
                .insert_assignments(company_id, project_id, task_id, &team_member_ids)
                .await
            {
                if let Err(rollback_err) = self
                    .assignments
                    .hard_delete(doc! { "task_id": task_id })
                    .await
                {
                    tracing::warn!(error = %rollback_err, %task_id, "assignment rollback failed");
                }
                if let Err(rollback_err) = self.base.hard_delete(doc! { "_id": task_id }).await {
                    tracing::warn!(error = %rollback_err, %task_id, "task rollback failed");
                }
                return Err(e);
            }
        }

        self.base.find_by_id(task_id).await
    }

    /// Every submitted assignee must be a membership of the caller's
    /// own tenant; a foreign or unknown id rejects the whole write.
    async fn assert_members_in_company(
        &self,
        company_id: ObjectId,
        team_member_ids: &[ObjectId],
    ) -> DaoResult<()> {
        let mut unique_ids: Vec<ObjectId> = Vec::new();
        for id in team_member_ids {
            if !unique_ids.contains(id) {
                unique_ids.push(*id);
            }
        }
        let known = self
            .members
            .count(doc! { "_id": { "$in": &unique_ids }, "company_id": company_id })
            .await?;
        if known as usize != unique_ids.len() {
            return Err(DaoError::Validation("unknown team member".to_string()));
        }
        Ok(())
    }

    async fn insert_assignments(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
        task_id: ObjectId,
        team_member_ids: &[ObjectId],
    ) -> DaoResult<()> {
        let assigned_at = DateTime::now();
        let rows: Vec<TaskAssignment> = team_member_ids
            .iter()
            .map(|member_id| TaskAssignment {
                id: None,
                task_id,
                team_member_id: *member_id,
                company_id,
                project_id,
                assigned_at,
            })
            .collect();
        self.assignments.insert_many(&rows).await
    }

    /// Replace the entire assignment set for a task: delete-all then
    /// insert-new, never a diff/merge. The pair is not atomic; a
    /// concurrent read between the two steps sees zero assignees. That
    /// window is accepted here rather than hidden (standalone Mongo
    /// deployments offer no multi-document transaction).
    pub async fn replace_assignees(
        &self,
        company_id: ObjectId,
        task_id: ObjectId,
        team_member_ids: &[ObjectId],
    ) -> DaoResult<()> {
        let task = self.base.find_by_id_in_company(company_id, task_id).await?;

        // Validate before the destructive step so a rejected set never
        // wipes the existing assignments.
        if !team_member_ids.is_empty() {
            self.assert_members_in_company(company_id, team_member_ids)
                .await?;
        }

        self.assignments
            .hard_delete(doc! { "task_id": task_id })
            .await?;

        if !team_member_ids.is_empty() {
            self.insert_assignments(company_id, task.project_id, task_id, team_member_ids)
                .await?;
        }
        Ok(())
    }

    pub async fn update(
        &self,
        company_id: ObjectId,
        task_id: ObjectId,
        changes: TaskChanges,
    ) -> DaoResult<()> {
        let mut update = bson::Document::new();
        if let Some(title) = changes.title {
            update.insert("title", title);
        }
        if let Some(description) = changes.description {
            update.insert("description", description);
        }
        if let Some(status) = changes.status {
            update.insert("status", bson::to_bson(&status)?);
        }
        if let Some(priority) = changes.priority {
            update.insert("priority", bson::to_bson(&priority)?);
        }
        if let Some(progress) = changes.progress {
            update.insert("progress", progress);
        }
        if let Some(due_date) = changes.due_date {
            update.insert("due_date", due_date);
        }

        if !update.is_empty() {
            let matched = self
                .base
                .update_one(
                    doc! { "_id": task_id, "company_id": company_id },
                    doc! { "$set": update },
                )
                .await?;
            if !matched {
                return Err(DaoError::NotFound);
            }
        }

        if let Some(ids) = changes.team_member_ids {
            self.replace_assignees(company_id, task_id, &ids).await?;
        }
        Ok(())
    }

    /// Delete a task and cascade its assignment rows.
    pub async fn delete(&self, company_id: ObjectId, task_id: ObjectId) -> DaoResult<()> {
        let deleted = self
            .base
            .hard_delete(doc! { "_id": task_id, "company_id": company_id })
            .await?;
        if deleted == 0 {
            return Err(DaoError::NotFound);
        }
        self.assignments
            .hard_delete(doc! { "task_id": task_id })
            .await?;
        Ok(())
    }

    pub async fn find_enriched(
        &self,
        company_id: ObjectId,
        project_id: ObjectId,
    ) -> DaoResult<Vec<EnrichedTask>> {
        let tasks = self
            .base
            .find_many(
                doc! { "company_id": company_id, "project_id": project_id },
                Some(doc! { "created_at": 1 }),
            )
            .await?;
        self.enrich(company_id, tasks).await
    }

    pub async fn find_enriched_by_id(
        &self,
        company_id: ObjectId,
        task_id: ObjectId,
    ) -> DaoResult<EnrichedTask> {
        let task = self.base.find_by_id_in_company(company_id, task_id).await?;
        let mut enriched = self.enrich(company_id, vec![task]).await?;
        enriched.pop().ok_or(DaoError::NotFound)
    }

    /// Hydrate assignees for a batch of tasks.
    ///
    /// Two batched `$in` round trips at most (memberships, then their
    /// linked profiles), never a lookup per assignment. Zero
    /// assignments short-circuits before either lookup. Assignment
    /// insertion order is preserved per task. The membership lookup is
    /// tenant-scoped; a dangling assignment pointing at a deleted or
    /// foreign membership is silently dropped.
    async fn enrich(&self, company_id: ObjectId, tasks: Vec<Task>) -> DaoResult<Vec<EnrichedTask>> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let task_ids: Vec<ObjectId> = tasks.iter().filter_map(|t| t.id).collect();
        let assignments = self
            .assignments
            .find_many(
                doc! { "task_id": { "$in": &task_ids } },
                Some(doc! { "_id": 1 }),
            )
            .await?;

        if assignments.is_empty() {
            return Ok(tasks
                .into_iter()
                .map(|task| EnrichedTask {
                    task,
                    assignees: Vec::new(),
                })
                .collect());
        }

        let mut member_ids: Vec<ObjectId> = Vec::new();
        for assignment in &assignments {
            if !member_ids.contains(&assignment.team_member_id) {
                member_ids.push(assignment.team_member_id);
            }
        }

        let members = self
            .members
            .find_many(
                doc! { "_id": { "$in": &member_ids }, "company_id": company_id },
                None,
            )
            .await?;

        let user_ids: Vec<ObjectId> = members.iter().filter_map(|m| m.user_id).collect();
        let profiles = if user_ids.is_empty() {
            Vec::new()
        } else {
            self.profiles
                .find_many(doc! { "_id": { "$in": &user_ids } }, None)
                .await?
        };

        let profile_by_id: HashMap<ObjectId, &UserProfile> = profiles
            .iter()
            .filter_map(|p| p.id.map(|id| (id, p)))
            .collect();

        let assignee_by_member: HashMap<ObjectId, TaskAssignee> = members
            .iter()
            .filter_map(|member| {
                let id = member.id?;
                let profile = member.user_id.and_then(|uid| profile_by_id.get(&uid).copied());
                Some((id, build_assignee(member, profile)))
            })
            .collect();

        let mut ids_by_task: HashMap<ObjectId, Vec<ObjectId>> = HashMap::new();
        for assignment in &assignments {
            ids_by_task
                .entry(assignment.task_id)
                .or_default()
                .push(assignment.team_member_id);
        }

        Ok(tasks
            .into_iter()
            .map(|task| {
                let assignees = task
                    .id
                    .and_then(|id| ids_by_task.get(&id))
                    .map(|ids| {
                        ids.iter()
                            .filter_map(|mid| assignee_by_member.get(mid).cloned())
                            .collect()
                    })
                    .unwrap_or_default();
                EnrichedTask { task, assignees }
            })
            .collect())
    }
}

/// Derive the display record for one membership. Explicit profile
/// first/last names win; otherwise the profile display name is split on
/// its first space. Avatar prefers the profile photo over the
/// membership's legacy avatar field.
fn build_assignee(member: &TeamMember, profile: Option<&UserProfile>) -> TaskAssignee {
    let (first_name, last_name) = match profile {
        Some(p) if p.first_name.is_some() || p.last_name.is_some() => {
            (p.first_name.clone(), p.last_name.clone())
        }
        Some(p) => match &p.display_name {
            Some(name) => split_display_name(name),
            None => (None, None),
        },
        None => (None, None),
    };

    let avatar = profile
        .and_then(|p| p.photo_url.clone())
        .or_else(|| member.avatar.clone());

    TaskAssignee {
        id: member.id.unwrap_or_default(),
        email: member.email.clone(),
        role: member.role.clone(),
        status: member.status,
        first_name,
        last_name,
        avatar,
    }
}

/// "Ada Lovelace Jones" -> ("Ada", "Lovelace Jones"); a single-token
/// name has no last part.
fn split_display_name(name: &str) -> (Option<String>, Option<String>) {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return (None, None);
    }
    match trimmed.split_once(' ') {
        Some((first, rest)) => (Some(first.to_string()), Some(rest.to_string())),
        None => (Some(trimmed.to_string()), None),
    }
}
