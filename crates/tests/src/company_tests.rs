use serde_json::Value;

use crate::fixtures::TestApp;

#[tokio::test]
async fn company_creation_bootstraps_super_admin_membership() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("boot", "Bea Boot").await;

    let resp = app
        .auth_post("/api/company", &owner.token)
        .json(&serde_json::json!({ "name": "Boot Agency" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let company: Value = resp.json().await.unwrap();
    assert_eq!(company["owner_profile_id"], owner.profile_id.as_str());

    let resp = app
        .auth_get("/api/team-members", &owner.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let members: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["email"], owner.email.as_str());
    assert_eq!(members[0]["access"], "superAdmin");
    assert_eq!(members[0]["status"], "active");
}

#[tokio::test]
async fn a_user_cannot_own_two_tenants() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("double", "Dee Double").await;

    let resp = app
        .auth_post("/api/company", &owner.token)
        .json(&serde_json::json!({ "name": "First Agency" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_post("/api/company", &owner.token)
        .json(&serde_json::json!({ "name": "Second Agency" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
}

#[tokio::test]
async fn provisioning_twice_conflicts() {
    let app = TestApp::spawn().await;
    let user = app.seed_user("again", "Andy Again").await;

    let resp = app
        .auth_post("/api/user", &user.token)
        .json(&serde_json::json!({
            "first_name": "Andy",
            "last_name": "Again",
            "terms_accepted": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "user already provisioned");
}

#[tokio::test]
async fn provisioning_requires_terms_acceptance() {
    let app = TestApp::spawn().await;
    let token = app.issue_token("sub-terms", Some("terms@crewdeck.test"), None, None);

    let resp = app
        .auth_post("/api/user", &token)
        .json(&serde_json::json!({
            "first_name": "Tess",
            "last_name": "Terms",
            "terms_accepted": false,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "validation");
    assert_eq!(json["issues"][0]["field"], "terms_accepted");
}

#[tokio::test]
async fn invited_email_links_on_later_signup() {
    let app = TestApp::spawn().await;
    let company = app.seed_company("late").await;

    // Invite an address nobody has signed up with yet.
    let member_id = app
        .invite_member(
            &company.owner.user.token,
            "late-joiner@crewdeck.test",
            "Editor",
            "team_member",
        )
        .await;

    let resp = app
        .auth_get("/api/team-members", &company.owner.user.token)
        .send()
        .await
        .unwrap();
    let members: Vec<Value> = resp.json().await.unwrap();
    let invited = members
        .iter()
        .find(|m| m["id"] == member_id.as_str())
        .unwrap();
    assert_eq!(invited["status"], "invited");
    assert!(invited["user_id"].is_null());

    // The invitee signs up afterwards; their membership links up.
    let joiner = app.seed_user("late-joiner", "Lana Late").await;

    let resp = app
        .auth_get("/api/team-members", &company.owner.user.token)
        .send()
        .await
        .unwrap();
    let members: Vec<Value> = resp.json().await.unwrap();
    let linked = members
        .iter()
        .find(|m| m["id"] == member_id.as_str())
        .unwrap();
    assert_eq!(linked["status"], "active");
    assert_eq!(linked["user_id"], joiner.profile_id.as_str());

    // And the linked membership grants tenant access right away.
    let resp = app
        .auth_get("/api/project", &joiner.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn deleted_account_can_return_to_its_tenant() {
    let app = TestApp::spawn().await;
    let company = app.seed_company("ret").await;

    let resp = app
        .auth_delete("/api/user", &company.member.user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    // The roster entry survives as a pending invite instead of
    // pointing at a dead profile.
    let resp = app
        .auth_get("/api/team-members", &company.owner.user.token)
        .send()
        .await
        .unwrap();
    let members: Vec<Value> = resp.json().await.unwrap();
    let detached = members
        .iter()
        .find(|m| m["id"] == company.member.member_id.as_str())
        .unwrap();
    assert_eq!(detached["status"], "invited");
    assert!(detached["user_id"].is_null());

    // Same subject comes back with a fresh credential, provisions
    // again, and is linked to their old membership.
    let returned = app.seed_user("ret-member", "Mel Member").await;
    assert_eq!(returned.email, company.member.user.email);

    let resp = app
        .auth_get("/api/project", &returned.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get("/api/team-members", &company.owner.user.token)
        .send()
        .await
        .unwrap();
    let members: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(members.len(), 3);
    let relinked = members
        .iter()
        .find(|m| m["id"] == company.member.member_id.as_str())
        .unwrap();
    assert_eq!(relinked["status"], "active");
    assert_eq!(relinked["user_id"], returned.profile_id.as_str());
}

#[tokio::test]
async fn provisioning_is_throttled_per_client() {
    let app = TestApp::spawn_with_settings(|settings| {
        settings.rate_limit.per_second = 1;
        settings.rate_limit.burst = 2;
    })
    .await;

    let mut statuses = Vec::new();
    for i in 0..4 {
        let token = app.issue_token(
            &format!("sub-burst-{}", i),
            Some(&format!("burst{}@crewdeck.test", i)),
            None,
            None,
        );
        let resp = app
            .auth_post("/api/user", &token)
            .json(&serde_json::json!({
                "first_name": "Burst",
                "last_name": "Client",
                "terms_accepted": true,
            }))
            .send()
            .await
            .unwrap();
        statuses.push(resp.status().as_u16());
    }

    // The burst allowance admits the first requests, then the
    // throttle kicks in.
    assert!(statuses.iter().any(|s| *s == 429), "got {:?}", statuses);
}
