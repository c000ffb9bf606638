use serde_json::Value;

use crate::fixtures::TestApp;

#[tokio::test]
async fn project_listings_are_scoped_to_the_caller_tenant() {
    let app = TestApp::spawn().await;
    let alpha = app.seed_company("iso-alpha").await;
    let beta = app.seed_company("iso-beta").await;

    app.seed_project(&alpha.owner.user.token, "Alpha Only").await;

    let resp = app
        .auth_get("/api/project", &beta.owner.user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let projects: Vec<Value> = resp.json().await.unwrap();
    assert!(projects.is_empty());
}

#[tokio::test]
async fn foreign_tenant_project_reads_as_not_found() {
    let app = TestApp::spawn().await;
    let alpha = app.seed_company("nf-alpha").await;
    let beta = app.seed_company("nf-beta").await;

    let project_id = app.seed_project(&alpha.owner.user.token, "Secret").await;

    let resp = app
        .auth_get(
            &format!("/api/project/{}", project_id),
            &beta.owner.user.token,
        )
        .send()
        .await
        .unwrap();
    // Existence is not leaked across tenants.
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn foreign_tenant_task_writes_are_not_found() {
    let app = TestApp::spawn().await;
    let alpha = app.seed_company("tw-alpha").await;
    let beta = app.seed_company("tw-beta").await;

    let project_id = app.seed_project(&alpha.owner.user.token, "Home").await;
    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &alpha.owner.user.token,
        )
        .json(&serde_json::json!({ "title": "Home task" }))
        .send()
        .await
        .unwrap();
    let task: Value = resp.json().await.unwrap();
    let task_id = task["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_patch(&format!("/api/task/{}", task_id), &beta.owner.user.token)
        .json(&serde_json::json!({ "title": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let resp = app
        .auth_delete(&format!("/api/task/{}", task_id), &beta.owner.user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let resp = app
        .auth_post("/api/task-assignees/bulk", &beta.owner.user.token)
        .json(&serde_json::json!({
            "task_id": task_id,
            "team_member_ids": [beta.member.member_id],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn tasks_cannot_land_in_foreign_projects() {
    let app = TestApp::spawn().await;
    let alpha = app.seed_company("fp-alpha").await;
    let beta = app.seed_company("fp-beta").await;

    let project_id = app.seed_project(&alpha.owner.user.token, "Theirs").await;

    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &beta.owner.user.token,
        )
        .json(&serde_json::json!({ "title": "Trespasser" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn foreign_member_ids_are_rejected_at_assignment_time() {
    let app = TestApp::spawn().await;
    let alpha = app.seed_company("fm-alpha").await;
    let beta = app.seed_company("fm-beta").await;
    let project_id = app.seed_project(&alpha.owner.user.token, "Walled").await;

    // Create with a member from another tenant.
    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &alpha.owner.user.token,
        )
        .json(&serde_json::json!({
            "title": "Smuggled assignee",
            "team_member_ids": [beta.member.member_id],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let tasks = app
        .db
        .collection::<bson::Document>("tasks")
        .count_documents(bson::doc! {})
        .await
        .unwrap();
    assert_eq!(tasks, 0);

    // Replace on an existing task: the rejected set must not wipe the
    // current assignments either.
    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &alpha.owner.user.token,
        )
        .json(&serde_json::json!({
            "title": "Guarded",
            "team_member_ids": [alpha.member.member_id],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let task: Value = resp.json().await.unwrap();
    let task_id = task["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_post("/api/task-assignees/bulk", &alpha.owner.user.token)
        .json(&serde_json::json!({
            "task_id": task_id,
            "team_member_ids": [beta.member.member_id],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let resp = app
        .auth_get(&format!("/api/task/{}", task_id), &alpha.owner.user.token)
        .send()
        .await
        .unwrap();
    let task: Value = resp.json().await.unwrap();
    let assignees = task["assignees"].as_array().unwrap();
    assert_eq!(assignees.len(), 1);
    assert_eq!(assignees[0]["id"], alpha.member.member_id.as_str());
}

#[tokio::test]
async fn foreign_assignment_rows_never_hydrate() {
    let app = TestApp::spawn().await;
    let alpha = app.seed_company("fh-alpha").await;
    let beta = app.seed_company("fh-beta").await;
    let project_id = app.seed_project(&alpha.owner.user.token, "Tainted").await;

    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &alpha.owner.user.token,
        )
        .json(&serde_json::json!({
            "title": "Historic",
            "team_member_ids": [alpha.member.member_id],
        }))
        .send()
        .await
        .unwrap();
    let task: Value = resp.json().await.unwrap();
    let task_id = task["id"].as_str().unwrap().to_string();

    // A bad historical row pointing at another tenant's membership must
    // never surface: the tenant-scoped hydration drops it like any
    // other dangling id.
    let tid = bson::oid::ObjectId::parse_str(&task_id).unwrap();
    let foreign_mid = bson::oid::ObjectId::parse_str(&beta.member.member_id).unwrap();
    let pid = bson::oid::ObjectId::parse_str(&project_id).unwrap();
    let alpha_company = bson::oid::ObjectId::parse_str(&alpha.company_id).unwrap();
    app.db
        .collection::<bson::Document>("task_assignments")
        .insert_one(bson::doc! {
            "task_id": tid,
            "team_member_id": foreign_mid,
            "company_id": alpha_company,
            "project_id": pid,
            "assigned_at": bson::DateTime::now(),
        })
        .await
        .unwrap();

    let resp = app
        .auth_get(&format!("/api/task/{}", task_id), &alpha.owner.user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let task: Value = resp.json().await.unwrap();
    let assignees = task["assignees"].as_array().unwrap();
    assert_eq!(assignees.len(), 1);
    assert_eq!(assignees[0]["id"], alpha.member.member_id.as_str());
    assert_ne!(assignees[0]["email"], beta.member.user.email.as_str());
}

#[tokio::test]
async fn member_rosters_do_not_cross_tenants() {
    let app = TestApp::spawn().await;
    let alpha = app.seed_company("ros-alpha").await;
    let beta = app.seed_company("ros-beta").await;

    let resp = app
        .auth_get("/api/team-members", &alpha.owner.user.token)
        .send()
        .await
        .unwrap();
    let members: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(members.len(), 3);
    assert!(
        members
            .iter()
            .all(|m| m["email"].as_str().unwrap().contains("ros-alpha"))
    );

    let resp = app
        .auth_delete(
            &format!("/api/team-members/{}", alpha.member.member_id),
            &beta.owner.user.token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}
