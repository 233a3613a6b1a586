mod common;

use axum::http::StatusCode;

use common::TestApp;

#[tokio::test]
async fn staff_see_only_rows_they_created() {
    let app = TestApp::new().await;

    let admin_branch = app.seed_branch(&app.admin_token, "North").await;
    let staff_branch = app.seed_branch(&app.staff_token, "South").await;

    let (status, body) = app.get("/api/v1/branches", &app.staff_token).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64(), Some(staff_branch));

    // Superusers see everything.
    let (status, body) = app.get("/api/v1/branches", &app.admin_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Cross-principal reads come back as not-found, not forbidden.
    let (status, body) = app
        .get(&format!("/api/v1/branches/{admin_branch}"), &app.staff_token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn dealer_user_is_scoped_to_its_linked_profile() {
    let app = TestApp::new().await;

    let branch = app.seed_branch(&app.admin_token, "Central").await;
    let dealer_one = app
        .seed_dealer(&app.admin_token, "Asha Motors", "9000000001", branch)
        .await;
    let dealer_two = app
        .seed_dealer(&app.admin_token, "Binu Traders", "9000000002", branch)
        .await;

    app.seed_supply(&app.admin_token, dealer_one, "Electric Vehicle", "SN-A1", 1)
        .await;
    app.seed_supply(&app.admin_token, dealer_two, "Battery Pack", "SN-B1", 2)
        .await;

    // Provisioned dealer login: username and password are the mobile number.
    let token = app.login("9000000001", "9000000001").await;

    let (status, body) = app.get("/api/v1/supplies", &token).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["serial_number"], "SN-A1");

    // The dealer listing shows nothing, but the linked profile itself is
    // readable through the detail route.
    let (_, body) = app.get("/api/v1/dealers", &token).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = app
        .get(&format!("/api/v1/dealers/{dealer_one}/detail"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Asha Motors");
    assert_eq!(body["data"]["counts"]["vehicle_count"], 1);

    let (status, _) = app
        .get(&format!("/api/v1/dealers/{dealer_two}"), &token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn disabled_auth_runs_every_request_unscoped() {
    let app = TestApp::new_with_auth_disabled().await;

    let staff_branch = app.seed_branch(&app.staff_token, "Solo").await;

    // No token at all, yet the row created by the staff principal is visible.
    let (status, body) = app
        .request(axum::http::Method::GET, "/api/v1/branches", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64(), Some(staff_branch));
}

#[tokio::test]
async fn staff_supplies_are_scoped_by_creator() {
    let app = TestApp::new().await;

    let branch = app.seed_branch(&app.admin_token, "East").await;
    let dealer = app
        .seed_dealer(&app.admin_token, "Cyril Autos", "9000000003", branch)
        .await;

    app.seed_supply(&app.admin_token, dealer, "Fast Charger", "SN-C1", 1)
        .await;

    // The staff principal created nothing, so the list is empty even though
    // rows exist.
    let (status, body) = app.get("/api/v1/supplies", &app.staff_token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["count"], 0);
}
