use serde_json::Value;

use crate::fixtures::TestApp;

#[tokio::test]
async fn created_task_returns_assignees_in_assignment_order() {
    let app = TestApp::spawn().await;
    let company = app.seed_company("torder").await;
    let project_id = app.seed_project(&company.owner.user.token, "Campaign").await;

    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &company.owner.user.token,
        )
        .json(&serde_json::json!({
            "title": "Draft the brief",
            "priority": "high",
            "team_member_ids": [company.member.member_id, company.admin.member_id],
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    let task: Value = resp.json().await.unwrap();

    let assignees = task["assignees"].as_array().unwrap();
    assert_eq!(assignees.len(), 2);
    // Assignment order, not roster order.
    assert_eq!(assignees[0]["id"], company.member.member_id.as_str());
    assert_eq!(assignees[1]["id"], company.admin.member_id.as_str());

    // Hydrated from the linked profiles.
    assert_eq!(assignees[0]["email"], company.member.user.email.as_str());
    assert_eq!(assignees[0]["first_name"], "Mel");
    assert_eq!(assignees[0]["last_name"], "Member");
    assert_eq!(assignees[0]["role"], "Designer");
    assert_eq!(assignees[0]["status"], "active");
    assert_eq!(assignees[1]["first_name"], "Ada");
}

#[tokio::test]
async fn task_without_assignees_returns_empty_list() {
    let app = TestApp::spawn().await;
    let company = app.seed_company("tempty").await;
    let project_id = app.seed_project(&company.owner.user.token, "Solo").await;

    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &company.owner.user.token,
        )
        .json(&serde_json::json!({ "title": "Unassigned" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    let task: Value = resp.json().await.unwrap();
    assert_eq!(task["assignees"].as_array().unwrap().len(), 0);
    assert_eq!(task["status"], "todo");
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["progress"], 0);
}

#[tokio::test]
async fn display_name_splits_on_first_space_when_names_missing() {
    let app = TestApp::spawn().await;
    let company = app.seed_company("tsplit").await;
    let project_id = app.seed_project(&company.owner.user.token, "Names").await;

    // These users authenticate (which syncs a skeleton profile with
    // only the claims display name) but never complete provisioning.
    let multi_token = app.issue_token(
        "sub-tsplit-multi",
        Some("lovelace@crewdeck.test"),
        Some("Ada Lovelace Jones"),
        None,
    );
    let resp = app.auth_get("/api/user", &multi_token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let single_token = app.issue_token(
        "sub-tsplit-single",
        Some("madonna@crewdeck.test"),
        Some("Madonna"),
        None,
    );
    let resp = app.auth_get("/api/user", &single_token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let multi_member = app
        .invite_member(
            &company.owner.user.token,
            "lovelace@crewdeck.test",
            "Strategist",
            "team_member",
        )
        .await;
    let single_member = app
        .invite_member(
            &company.owner.user.token,
            "madonna@crewdeck.test",
            "Artist",
            "team_member",
        )
        .await;

    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &company.owner.user.token,
        )
        .json(&serde_json::json!({
            "title": "Name split",
            "team_member_ids": [multi_member, single_member],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let task: Value = resp.json().await.unwrap();
    let assignees = task["assignees"].as_array().unwrap();

    // Everything after the first space is the last name.
    assert_eq!(assignees[0]["first_name"], "Ada");
    assert_eq!(assignees[0]["last_name"], "Lovelace Jones");

    // Single token: first name only.
    assert_eq!(assignees[1]["first_name"], "Madonna");
    assert!(assignees[1]["last_name"].is_null());
}

#[tokio::test]
async fn unlinked_invited_member_shows_membership_fields_only() {
    let app = TestApp::spawn().await;
    let company = app.seed_company("tghost").await;
    let project_id = app.seed_project(&company.owner.user.token, "Ghosts").await;

    // Invited by email, no profile behind it yet.
    let ghost_member = app
        .invite_member(
            &company.owner.user.token,
            "ghost@crewdeck.test",
            "Copywriter",
            "team_member",
        )
        .await;

    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &company.owner.user.token,
        )
        .json(&serde_json::json!({
            "title": "Haunted",
            "team_member_ids": [ghost_member],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let task: Value = resp.json().await.unwrap();
    let assignees = task["assignees"].as_array().unwrap();

    assert_eq!(assignees.len(), 1);
    assert_eq!(assignees[0]["email"], "ghost@crewdeck.test");
    assert_eq!(assignees[0]["status"], "invited");
    assert!(assignees[0]["first_name"].is_null());
    assert!(assignees[0]["last_name"].is_null());
}

#[tokio::test]
async fn omitted_assignee_list_leaves_assignments_untouched() {
    let app = TestApp::spawn().await;
    let company = app.seed_company("tomit").await;
    let project_id = app.seed_project(&company.owner.user.token, "Patch").await;

    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &company.owner.user.token,
        )
        .json(&serde_json::json!({
            "title": "Keep my crew",
            "team_member_ids": [company.member.member_id],
        }))
        .send()
        .await
        .unwrap();
    let task: Value = resp.json().await.unwrap();
    let task_id = task["id"].as_str().unwrap().to_string();

    // Title-only patch: no team_member_ids key at all.
    let resp = app
        .auth_patch(&format!("/api/task/{}", task_id), &company.owner.user.token)
        .json(&serde_json::json!({ "title": "Renamed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["assignees"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_assignee_list_clears_assignments() {
    let app = TestApp::spawn().await;
    let company = app.seed_company("tclear").await;
    let project_id = app.seed_project(&company.owner.user.token, "Clear").await;

    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &company.owner.user.token,
        )
        .json(&serde_json::json!({
            "title": "Soon alone",
            "team_member_ids": [company.member.member_id, company.admin.member_id],
        }))
        .send()
        .await
        .unwrap();
    let task: Value = resp.json().await.unwrap();
    let task_id = task["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_patch(&format!("/api/task/{}", task_id), &company.owner.user.token)
        .json(&serde_json::json!({ "team_member_ids": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["assignees"].as_array().unwrap().len(), 0);

    let count = app
        .db
        .collection::<bson::Document>("task_assignments")
        .count_documents(bson::doc! {})
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn bulk_endpoint_replaces_the_assignment_set() {
    let app = TestApp::spawn().await;
    let company = app.seed_company("tbulk").await;
    let project_id = app.seed_project(&company.owner.user.token, "Bulk").await;

    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &company.owner.user.token,
        )
        .json(&serde_json::json!({
            "title": "Reshuffle",
            "team_member_ids": [company.member.member_id],
        }))
        .send()
        .await
        .unwrap();
    let task: Value = resp.json().await.unwrap();
    let task_id = task["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_post("/api/task-assignees/bulk", &company.owner.user.token)
        .json(&serde_json::json!({
            "task_id": task_id,
            "team_member_ids": [company.admin.member_id, company.owner.member_id],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let updated: Value = resp.json().await.unwrap();
    let assignees = updated["assignees"].as_array().unwrap();
    assert_eq!(assignees.len(), 2);
    assert_eq!(assignees[0]["id"], company.admin.member_id.as_str());
    assert_eq!(assignees[1]["id"], company.owner.member_id.as_str());
}

#[tokio::test]
async fn deleting_a_task_cascades_its_assignments() {
    let app = TestApp::spawn().await;
    let company = app.seed_company("tcascade").await;
    let project_id = app.seed_project(&company.owner.user.token, "Cascade").await;

    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &company.owner.user.token,
        )
        .json(&serde_json::json!({
            "title": "Doomed",
            "team_member_ids": [company.member.member_id],
        }))
        .send()
        .await
        .unwrap();
    let task: Value = resp.json().await.unwrap();
    let task_id = task["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_delete(&format!("/api/task/{}", task_id), &company.owner.user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let count = app
        .db
        .collection::<bson::Document>("task_assignments")
        .count_documents(bson::doc! {})
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn failed_assignment_insert_rolls_back_the_task() {
    let app = TestApp::spawn().await;
    let company = app.seed_company("trollback").await;
    let project_id = app.seed_project(&company.owner.user.token, "Rollback").await;

    // Duplicate member ids violate the unique (task_id, team_member_id)
    // index mid-insert.
    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &company.owner.user.token,
        )
        .json(&serde_json::json!({
            "title": "Never lands",
            "team_member_ids": [company.member.member_id, company.member.member_id],
        }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_server_error() || resp.status().as_u16() == 409);

    // Neither the task nor any half-written assignment survives.
    let tasks = app
        .db
        .collection::<bson::Document>("tasks")
        .count_documents(bson::doc! {})
        .await
        .unwrap();
    assert_eq!(tasks, 0);
    let assignments = app
        .db
        .collection::<bson::Document>("task_assignments")
        .count_documents(bson::doc! {})
        .await
        .unwrap();
    assert_eq!(assignments, 0);
}

#[tokio::test]
async fn removed_membership_drops_silently_from_assignees() {
    let app = TestApp::spawn().await;
    let company = app.seed_company("tdangle").await;
    let project_id = app.seed_project(&company.owner.user.token, "Dangle").await;

    let ghost_member = app
        .invite_member(
            &company.owner.user.token,
            "shortlived@crewdeck.test",
            "Temp",
            "team_member",
        )
        .await;

    let resp = app
        .auth_post(
            &format!("/api/projects/{}/tasks", project_id),
            &company.owner.user.token,
        )
        .json(&serde_json::json!({
            "title": "Orphaned",
            "team_member_ids": [ghost_member, company.member.member_id],
        }))
        .send()
        .await
        .unwrap();
    let task: Value = resp.json().await.unwrap();
    let task_id = task["id"].as_str().unwrap().to_string();

    // Remove the membership out from under the assignment.
    let resp = app
        .auth_delete(
            &format!("/api/team-members/{}", ghost_member),
            &company.owner.user.token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let resp = app
        .auth_get(&format!("/api/task/{}", task_id), &company.owner.user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let task: Value = resp.json().await.unwrap();
    let assignees = task["assignees"].as_array().unwrap();
    assert_eq!(assignees.len(), 1);
    assert_eq!(assignees[0]["id"], company.member.member_id.as_str());
}

#[tokio::test]
async fn enrichment_batches_lookups_for_a_project_listing() {
    let app = TestApp::spawn().await;
    let company = app.seed_company("tlist").await;
    let project_id = app.seed_project(&company.owner.user.token, "Listing").await;

    for title in ["One", "Two", "Three"] {
        let resp = app
            .auth_post(
                &format!("/api/projects/{}/tasks", project_id),
                &company.owner.user.token,
            )
            .json(&serde_json::json!({
                "title": title,
                "team_member_ids": [company.member.member_id],
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201);
    }

    let resp = app
        .auth_get(
            &format!("/api/projects/{}/tasks", project_id),
            &company.owner.user.token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let tasks: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(tasks.len(), 3);
    for task in &tasks {
        let assignees = task["assignees"].as_array().unwrap();
        assert_eq!(assignees.len(), 1);
        assert_eq!(assignees[0]["first_name"], "Mel");
    }
}
