/// End-to-end tests through the axum router
///
/// Each test builds a fresh router over the in-memory store.

mod common;

use axum::http::StatusCode;
use common::{
    TestContext, GOOGLE_EMAIL, GOOGLE_TOKEN, JWT_SECRET, UNVERIFIED_GOOGLE_EMAIL,
    UNVERIFIED_GOOGLE_TOKEN,
};
use construct_shared::auth::jwt::{create_token, Claims};
use construct_shared::models::UserRole;
use construct_shared::services::CommentScopePolicy;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let (status, body) = ctx.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_signup_and_foreign_client_is_not_found() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post(
            "/signup",
            None,
            json!({
                "email": "a@x.com",
                "password": "secret1",
                "name": "Ada",
                "company_name": "Acme",
                "tax_id": "123",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "admin");
    let acme_id = body["company_id"].as_str().unwrap().to_string();
    let ada = body["token"].as_str().unwrap().to_string();

    let (status, client) = ctx
        .post("/clients", Some(&ada), json!({ "name": "Bob Co" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(client["company_id"], acme_id.as_str());
    let client_id = client["id"].as_str().unwrap();

    let other = ctx.signup("Otto", "otto@y.com", "Other", "456").await;
    let (foreign_status, foreign_body) = ctx
        .get(&format!("/clients/{}", client_id), Some(&other))
        .await;
    let (missing_status, missing_body) = ctx
        .get(&format!("/clients/{}", Uuid::new_v4()), Some(&other))
        .await;

    assert_eq!(foreign_status, StatusCode::NOT_FOUND);
    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(foreign_body, missing_body);

    let (status, list) = ctx.get("/clients", Some(&other)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let ctx = TestContext::new();
    ctx.signup("Ada", "a@x.com", "Acme", "123").await;

    let (status, body) = ctx
        .post(
            "/signup",
            None,
            json!({
                "email": "a@x.com",
                "password": "secret1",
                "name": "Someone",
                "company_name": "Else",
                "tax_id": "999",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    assert_eq!(ctx.store.company_count().await, 1);
}

#[tokio::test]
async fn test_signup_validation_details() {
    let ctx = TestContext::new();
    let (status, body) = ctx
        .post(
            "/signup",
            None,
            json!({
                "email": "nope",
                "password": "x",
                "name": "Ada",
                "company_name": "Acme",
                "tax_id": "123",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let ctx = TestContext::new();
    ctx.signup("Ada", "a@x.com", "Acme", "123").await;

    let (wrong_status, wrong_body) = ctx
        .post("/login", None, json!({ "email": "a@x.com", "password": "bad" }))
        .await;
    let (unknown_status, unknown_body) = ctx
        .post("/login", None, json!({ "email": "z@x.com", "password": "secret1" }))
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);

    let (status, body) = ctx
        .post("/login", None, json!({ "email": "a@x.com", "password": "secret1" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_bearer_token_required_and_checked() {
    let ctx = TestContext::new();

    let (status, _) = ctx.get("/projects", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx.get("/projects", Some("not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let claims = Claims::new(Uuid::new_v4(), Some(Uuid::new_v4()), Some(UserRole::Admin));
    let forged = create_token(&claims, "some-other-secret-that-is-32-bytes-long").unwrap();
    let (status, _) = ctx.get("/projects", Some(&forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let genuine = create_token(&claims, JWT_SECRET).unwrap();
    let (status, _) = ctx.get("/projects", Some(&genuine)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_verify_endpoint_echoes_identity() {
    let ctx = TestContext::new();
    let token = ctx.signup("Ada", "a@x.com", "Acme", "123").await;

    let (status, body) = ctx.post("/auth/verify", None, json!({ "token": token })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    assert!(body["company_id"].is_string());

    let (status, _) = ctx
        .post("/auth/verify", None, json!({ "token": "garbage" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_member_cannot_use_admin_routes() {
    let ctx = TestContext::new();
    let admin = ctx.signup("Ada", "a@x.com", "Acme", "123").await;

    let (status, member) = ctx
        .post(
            "/company/members",
            Some(&admin),
            json!({
                "email": "m@x.com",
                "name": "Mia",
                "password": "secret2",
                "role": "member",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(member["role"], "member");
    assert!(member.get("password_hash").is_none());

    let (_, login) = ctx
        .post("/login", None, json!({ "email": "m@x.com", "password": "secret2" }))
        .await;
    let member_token = login["token"].as_str().unwrap();

    let (status, body) = ctx.get("/company", Some(member_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = ctx.get("/company/members", Some(member_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Members still work inside the company
    let (status, _) = ctx.get("/clients", Some(member_token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, members) = ctx.get("/company/members", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_member_role_rejected() {
    let ctx = TestContext::new();
    let admin = ctx.signup("Ada", "a@x.com", "Acme", "123").await;

    let (status, body) = ctx
        .post(
            "/company/members",
            Some(&admin),
            json!({
                "email": "m@x.com",
                "name": "Mia",
                "password": "secret2",
                "role": "owner",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "role");
}

#[tokio::test]
async fn test_company_update() {
    let ctx = TestContext::new();
    let admin = ctx.signup("Ada", "a@x.com", "Acme", "123").await;

    let (status, body) = ctx
        .put(
            "/company",
            Some(&admin),
            Some(json!({
                "name": "Acme Builders",
                "email": "office@acme.com",
                "phone": "555-0100",
                "address": "1 Yard Rd",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Acme Builders");
    assert_eq!(body["tax_id"], "123");
}

#[tokio::test]
async fn test_federated_user_without_company() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post("/auth/google", None, json!({ "id_token": GOOGLE_TOKEN }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["company_id"].is_null());
    assert!(body["role"].is_null());
    let token = body["token"].as_str().unwrap().to_string();

    let (status, _) = ctx.get("/projects", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, profile) = ctx.get("/user/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], GOOGLE_EMAIL);

    // Same account through the signup alias
    let (status, again) = ctx
        .post("/signup/google", None, json!({ "id_token": GOOGLE_TOKEN }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["user_id"], body["user_id"]);

    let (status, _) = ctx
        .post("/auth/google", None, json!({ "id_token": "forged" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_federated_login_requires_verified_email() {
    let ctx = TestContext::new();
    ctx.signup("Ada", UNVERIFIED_GOOGLE_EMAIL, "Acme", "123").await;

    let (status, body) = ctx
        .post(
            "/auth/google",
            None,
            json!({ "id_token": UNVERIFIED_GOOGLE_TOKEN }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_public_project_flip() {
    let ctx = TestContext::new();
    let token = ctx.signup("Ada", "a@x.com", "Acme", "123").await;
    let client_id = ctx.create_client(&token, "Bob Co").await;
    let project_id = ctx.create_project(&token, "Kitchen", &client_id).await;

    let uri = format!("/public/projects/{}", project_id);
    let (status, _) = ctx.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, updated) = ctx
        .put(
            &format!("/projects/{}", project_id),
            Some(&token),
            Some(json!({ "name": "Kitchen", "client_id": client_id, "is_public": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_public"], true);
    assert_eq!(updated["status"], "active");

    let (status, body) = ctx.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], project_id.as_str());
    assert_eq!(body["client"]["name"], "Bob Co");
}

#[tokio::test]
async fn test_task_toggle_cascades_over_http() {
    let ctx = TestContext::new();
    let token = ctx.signup("Ada", "a@x.com", "Acme", "123").await;
    let client_id = ctx.create_client(&token, "Bob Co").await;
    let project_id = ctx.create_project(&token, "Kitchen", &client_id).await;

    let (status, task) = ctx
        .post(
            &format!("/projects/{}/tasks", project_id),
            Some(&token),
            json!({ "name": "Cabinets" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "Pending");
    let task_id = task["id"].as_str().unwrap().to_string();

    for name in ["Order", "Install"] {
        let (status, _) = ctx
            .post(
                &format!("/tasks/{}/subtasks", task_id),
                Some(&token),
                json!({ "name": name }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, toggled) = ctx
        .put(&format!("/tasks/{}", task_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["status"], "Completed");

    let (_, details) = ctx.get(&format!("/tasks/{}", task_id), Some(&token)).await;
    for subtask in details["subtasks"].as_array().unwrap() {
        assert_eq!(subtask["status"], "Completed");
    }

    let (_, toggled) = ctx
        .put(&format!("/tasks/{}", task_id), Some(&token), None)
        .await;
    assert_eq!(toggled["status"], "Pending");

    let (status, tasks) = ctx
        .get(&format!("/projects/{}/tasks", project_id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks.as_array().unwrap().len(), 1);

    let (status, _) = ctx.delete(&format!("/tasks/{}", task_id), Some(&token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = ctx.get(&format!("/tasks/{}", task_id), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_password_change() {
    let ctx = TestContext::new();
    let token = ctx.signup("Ada", "a@x.com", "Acme", "123").await;

    let (status, body) = ctx
        .put(
            "/user/password",
            Some(&token),
            Some(json!({ "old_password": "wrong", "new_password": "secret9" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_old_password");

    let (status, _) = ctx
        .put(
            "/user/password",
            Some(&token),
            Some(json!({ "old_password": "secret1", "new_password": "secret9" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx
        .post("/login", None, json!({ "email": "a@x.com", "password": "secret9" }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_username_and_public_profile() {
    let ctx = TestContext::new();
    let token = ctx.signup("Ada Lovelace", "a@x.com", "Acme", "123").await;

    let (status, body) = ctx.get("/user/username", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ada-lovelace");

    let (status, _) = ctx.get("/username?username=ada-lovelace", Some(&token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = ctx.get("/username?username=Not%20Valid", Some(&token)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = ctx
        .post("/username", Some(&token), json!({ "username": "ada" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    ctx.put("/user/bio", Some(&token), Some(json!({ "bio": "Analyst" })))
        .await;

    let (status, profile) = ctx.get("/public/profile/ada", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], "Ada Lovelace");
    assert_eq!(profile["bio"], "Analyst");

    let (status, _) = ctx.get("/public/profile/ada-lovelace", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_link_clicks() {
    let ctx = TestContext::new();
    let token = ctx.signup("Ada", "a@x.com", "Acme", "123").await;

    let (status, link) = ctx
        .post(
            "/links",
            Some(&token),
            json!({ "url": "https://acme.example.com", "description": "site" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let link_id = link["id"].as_str().unwrap();

    for _ in 0..2 {
        let (status, _) = ctx
            .post(&format!("/public/links/{}/click", link_id), None, json!({}))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, links) = ctx.get("/links", Some(&token)).await;
    assert_eq!(links[0]["count"], 2);

    let (status, _) = ctx
        .post(&format!("/public/links/{}/click", Uuid::new_v4()), None, json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .post("/links", Some(&token), json!({ "url": "not a url" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_comment_policy_over_http() {
    for (policy, expected) in [
        (CommentScopePolicy::Unscoped, StatusCode::CREATED),
        (CommentScopePolicy::TenantScoped, StatusCode::NOT_FOUND),
    ] {
        let ctx = TestContext::with_policy(policy);
        let ada = ctx.signup("Ada", "a@x.com", "Acme", "123").await;
        let otto = ctx.signup("Otto", "o@y.com", "Other", "456").await;
        let client_id = ctx.create_client(&ada, "Bob Co").await;

        let (status, _) = ctx
            .post(
                &format!("/clients/{}/comments", client_id),
                Some(&otto),
                json!({ "content": "hello" }),
            )
            .await;
        assert_eq!(status, expected, "policy {:?}", policy);
    }
}
