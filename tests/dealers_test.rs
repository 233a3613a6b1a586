mod common;

use axum::http::{Method, StatusCode};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use common::TestApp;
use dealerdesk_api::entities::{product_supply, user};

#[tokio::test]
async fn creating_a_dealer_provisions_a_login_account() {
    let app = TestApp::new().await;
    let branch = app.seed_branch(&app.admin_token, "West").await;

    let (status, body) = app
        .post(
            "/api/v1/dealers",
            &app.admin_token,
            json!({
                "name": "Devi Wheels",
                "mobile_number": "9111111111",
                "company_name": "Devi Wheels Pvt Ltd",
                "address_line1": "4 Station Road",
                "branch_id": branch
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["branch_name"], "West");
    assert!(body["data"]["user_id"].is_i64());

    // The account logs in with the mobile number as both username and
    // password, and is flagged for a forced password change.
    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "9111111111", "password": "9111111111" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["user"]["must_change_password"], true);
}

#[tokio::test]
async fn duplicate_mobile_number_conflicts() {
    let app = TestApp::new().await;
    let branch = app.seed_branch(&app.admin_token, "West").await;
    app.seed_dealer(&app.admin_token, "First", "9222222222", branch)
        .await;

    let (status, body) = app
        .post(
            "/api/v1/dealers",
            &app.admin_token,
            json!({
                "name": "Second",
                "mobile_number": "9222222222",
                "address_line1": "9 Hill Street",
                "branch_id": branch
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INTEGRITY_ERROR");

    // Nothing half-created: exactly one login account for that number.
    let accounts = user::Entity::find()
        .filter(user::Column::Username.eq("9222222222"))
        .count(app.state.db.as_ref())
        .await
        .unwrap();
    assert_eq!(accounts, 1);
}

#[tokio::test]
async fn dealer_with_unknown_branch_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/dealers",
            &app.admin_token,
            json!({
                "name": "Ghost",
                "mobile_number": "9333333333",
                "address_line1": "1 Nowhere Lane",
                "branch_id": 4242
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
}

#[tokio::test]
async fn update_moves_dealer_between_branches() {
    let app = TestApp::new().await;
    let old_branch = app.seed_branch(&app.admin_token, "Old").await;
    let new_branch = app.seed_branch(&app.admin_token, "New").await;
    let dealer = app
        .seed_dealer(&app.admin_token, "Mover", "9444444444", old_branch)
        .await;

    let (status, body) = app
        .put(
            &format!("/api/v1/dealers/{dealer}"),
            &app.admin_token,
            json!({
                "name": "Mover",
                "mobile_number": "9444444444",
                "address_line1": "4 Shift Street",
                "branch_id": new_branch
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["branch_id"].as_i64(), Some(new_branch));
    assert_eq!(body["data"]["branch_name"], "New");
}

#[tokio::test]
async fn search_and_branch_filters_compose() {
    let app = TestApp::new().await;
    let branch_a = app.seed_branch(&app.admin_token, "A").await;
    let branch_b = app.seed_branch(&app.admin_token, "B").await;
    app.seed_dealer(&app.admin_token, "Kiran Motors", "9551111111", branch_a)
        .await;
    app.seed_dealer(&app.admin_token, "Kiran Spares", "9552222222", branch_b)
        .await;
    app.seed_dealer(&app.admin_token, "Latha Autos", "9553333333", branch_a)
        .await;

    let (status, body) = app
        .get(
            &format!("/api/v1/dealers?search=kiran&branch_id={branch_a}"),
            &app.admin_token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Kiran Motors");

    // Search also matches mobile numbers.
    let (_, body) = app
        .get("/api/v1/dealers?search=9553", &app.admin_token)
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn search_wildcards_match_literally() {
    let app = TestApp::new().await;
    let branch = app.seed_branch(&app.admin_token, "A").await;
    app.seed_dealer(&app.admin_token, "K_ran Motors", "9554444444", branch)
        .await;
    app.seed_dealer(&app.admin_token, "Karan Motors", "9555555555", branch)
        .await;
    app.seed_dealer(&app.admin_token, "100% Wheels", "9556666666", branch)
        .await;

    // An underscore in the term is not a single-character wildcard.
    let (status, body) = app
        .get("/api/v1/dealers?search=k_ran", &app.admin_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1, "{body}");
    assert_eq!(items[0]["name"], "K_ran Motors");

    // A percent sign does not match everything.
    let (status, body) = app
        .get("/api/v1/dealers?search=100%25", &app.admin_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1, "{body}");
    assert_eq!(items[0]["name"], "100% Wheels");
}

#[tokio::test]
async fn deleting_a_dealer_removes_supplies_and_login() {
    let app = TestApp::new().await;
    let branch = app.seed_branch(&app.admin_token, "Doomed").await;
    let dealer = app
        .seed_dealer(&app.admin_token, "Closing Down", "9666666666", branch)
        .await;
    app.seed_supply(&app.admin_token, dealer, "Electric Vehicle", "SN-DEL-1", 1)
        .await;
    app.seed_supply(&app.admin_token, dealer, "Battery Pack", "SN-DEL-2", 2)
        .await;

    let (status, _) = app
        .delete(&format!("/api/v1/dealers/{dealer}"), &app.admin_token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let remaining = product_supply::Entity::find()
        .filter(product_supply::Column::DealerId.eq(dealer))
        .count(app.state.db.as_ref())
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    let account = user::Entity::find()
        .filter(user::Column::Username.eq("9666666666"))
        .one(app.state.db.as_ref())
        .await
        .unwrap();
    assert!(account.is_none());

    let (status, _) = app
        .get(&format!("/api/v1/dealers/{dealer}"), &app.admin_token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
