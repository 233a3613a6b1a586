mod common;

use axum::http::StatusCode;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use common::TestApp;
use dealerdesk_api::entities::product_supply;

async fn supply_count(app: &TestApp) -> u64 {
    product_supply::Entity::find()
        .count(app.state.db.as_ref())
        .await
        .unwrap()
}

#[tokio::test]
async fn supply_view_carries_dealer_and_branch_context() {
    let app = TestApp::new().await;
    let branch = app.seed_branch(&app.admin_token, "Hub").await;
    let dealer = app
        .seed_dealer(&app.admin_token, "Rani EV", "9700000001", branch)
        .await;

    let (status, body) = app
        .post(
            "/api/v1/supplies",
            &app.admin_token,
            json!({
                "dealer_id": dealer,
                "branch_id": branch,
                "product_name": "Electric Vehicle X2",
                "invoice_number": "INV-1001",
                "serial_number": "SN-1001",
                "purchase_date": "2026-08-01",
                "count": 2,
                "vehicle_model": "X2",
                "battery_number": "BAT-88"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["dealer_name"], "Rani EV");
    assert_eq!(body["data"]["branch_name"], "Hub");
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(body["data"]["vehicle_model"], "X2");
}

#[tokio::test]
async fn branch_mismatch_names_the_actual_branch() {
    let app = TestApp::new().await;
    let home = app.seed_branch(&app.admin_token, "Home").await;
    let other = app.seed_branch(&app.admin_token, "Other").await;
    let dealer = app
        .seed_dealer(&app.admin_token, "Pinned", "9700000002", home)
        .await;

    let (status, body) = app
        .post(
            "/api/v1/supplies",
            &app.admin_token,
            json!({
                "dealer_id": dealer,
                "branch_id": other,
                "product_name": "Battery Pack",
                "invoice_number": "INV-2001",
                "serial_number": "SN-2001"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("Home"), "unexpected message: {message}");
    assert_eq!(supply_count(&app).await, 0);
}

#[tokio::test]
async fn serial_numbers_are_globally_unique() {
    let app = TestApp::new().await;
    let branch = app.seed_branch(&app.admin_token, "Hub").await;
    let dealer_one = app
        .seed_dealer(&app.admin_token, "One", "9700000003", branch)
        .await;
    let dealer_two = app
        .seed_dealer(&app.admin_token, "Two", "9700000004", branch)
        .await;

    app.seed_supply(&app.admin_token, dealer_one, "Charger", "SN-SAME", 1)
        .await;

    let (status, body) = app
        .post(
            "/api/v1/supplies",
            &app.admin_token,
            json!({
                "dealer_id": dealer_two,
                "product_name": "Charger",
                "invoice_number": "INV-3001",
                "serial_number": "SN-SAME"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INTEGRITY_ERROR");
    assert_eq!(supply_count(&app).await, 1);
}

#[tokio::test]
async fn batch_create_is_all_or_nothing() {
    let app = TestApp::new().await;
    let branch = app.seed_branch(&app.admin_token, "Hub").await;
    let dealer = app
        .seed_dealer(&app.admin_token, "Bulk", "9700000005", branch)
        .await;

    let item = |serial: &str| {
        json!({
            "dealer_id": dealer,
            "product_name": "Battery Pack",
            "invoice_number": "INV-4001",
            "serial_number": serial
        })
    };

    // Duplicate serial inside the batch: nothing is persisted.
    let (status, body) = app
        .post(
            "/api/v1/supplies/batch",
            &app.admin_token,
            json!({ "supplies": [item("SN-B1"), item("SN-B2"), item("SN-B1")] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(supply_count(&app).await, 0);

    // Clean batch goes through atomically.
    let (status, body) = app
        .post(
            "/api/v1/supplies/batch",
            &app.admin_token,
            json!({ "supplies": [item("SN-B1"), item("SN-B2"), item("SN-B3")] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["ids"].as_array().unwrap().len(), 3);
    assert_eq!(supply_count(&app).await, 3);

    // A serial already in the store poisons the whole next batch.
    let (status, _) = app
        .post(
            "/api/v1/supplies/batch",
            &app.admin_token,
            json!({ "supplies": [item("SN-B4"), item("SN-B2")] }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(supply_count(&app).await, 3);

    let (status, _) = app
        .post(
            "/api/v1/supplies/batch",
            &app.admin_token,
            json!({ "supplies": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_keeps_own_serial_but_cannot_take_anothers() {
    let app = TestApp::new().await;
    let branch = app.seed_branch(&app.admin_token, "Hub").await;
    let dealer = app
        .seed_dealer(&app.admin_token, "Edit", "9700000006", branch)
        .await;
    let first = app
        .seed_supply(&app.admin_token, dealer, "Charger", "SN-U1", 1)
        .await;
    app.seed_supply(&app.admin_token, dealer, "Charger", "SN-U2", 1)
        .await;

    let update = |serial: &str| {
        json!({
            "dealer_id": dealer,
            "product_name": "Charger Pro",
            "invoice_number": "INV-5001",
            "serial_number": serial,
            "count": 4
        })
    };

    let (status, body) = app
        .put(
            &format!("/api/v1/supplies/{first}"),
            &app.admin_token,
            update("SN-U1"),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["product_name"], "Charger Pro");
    assert_eq!(body["data"]["count"], 4);

    let (status, _) = app
        .put(
            &format!("/api/v1/supplies/{first}"),
            &app.admin_token,
            update("SN-U2"),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn dealer_user_cannot_write_into_another_dealers_inventory() {
    let app = TestApp::new().await;
    let branch = app.seed_branch(&app.admin_token, "Hub").await;
    let mine = app
        .seed_dealer(&app.admin_token, "Mine", "9700000010", branch)
        .await;
    let other = app
        .seed_dealer(&app.admin_token, "Other", "9700000011", branch)
        .await;
    let token = app.login("9700000010", "9700000010").await;

    let item = |dealer_id: i64, serial: &str| {
        json!({
            "dealer_id": dealer_id,
            "product_name": "Battery Pack",
            "invoice_number": "INV-6001",
            "serial_number": serial
        })
    };

    // Create against a foreign dealer: nothing persists anywhere.
    let (status, body) = app
        .post("/api/v1/supplies", &token, item(other, "SN-X1"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
    assert_eq!(supply_count(&app).await, 0);

    // Same rule inside a batch.
    let (status, _) = app
        .post(
            "/api/v1/supplies/batch",
            &token,
            json!({ "supplies": [item(mine, "SN-X2"), item(other, "SN-X3")] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(supply_count(&app).await, 0);

    // An update may not move a supply into a foreign dealer either.
    let (status, body) = app
        .post("/api/v1/supplies", &token, item(mine, "SN-X4"))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let supply = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .put(
            &format!("/api/v1/supplies/{supply}"),
            &token,
            item(other, "SN-X4"),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let row = product_supply::Entity::find_by_id(supply)
        .one(app.state.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.dealer_id, mine);
}

#[tokio::test]
async fn dealer_history_is_restricted_to_that_dealer() {
    let app = TestApp::new().await;
    let branch = app.seed_branch(&app.admin_token, "Hub").await;
    let dealer_one = app
        .seed_dealer(&app.admin_token, "Hist One", "9700000007", branch)
        .await;
    let dealer_two = app
        .seed_dealer(&app.admin_token, "Hist Two", "9700000008", branch)
        .await;
    app.seed_supply(&app.admin_token, dealer_one, "Vehicle", "SN-H1", 1)
        .await;
    app.seed_supply(&app.admin_token, dealer_two, "Vehicle", "SN-H2", 1)
        .await;

    let (status, body) = app
        .get(
            &format!("/api/v1/dealers/{dealer_one}/supplies"),
            &app.admin_token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["serial_number"], "SN-H1");

    let (status, _) = app
        .get("/api/v1/dealers/424242/supplies", &app.admin_token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_supply_removes_it() {
    let app = TestApp::new().await;
    let branch = app.seed_branch(&app.admin_token, "Hub").await;
    let dealer = app
        .seed_dealer(&app.admin_token, "Gone", "9700000009", branch)
        .await;
    let supply = app
        .seed_supply(&app.admin_token, dealer, "Vehicle", "SN-G1", 1)
        .await;

    let (status, _) = app
        .delete(&format!("/api/v1/supplies/{supply}"), &app.admin_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(supply_count(&app).await, 0);

    let (status, _) = app
        .delete(&format!("/api/v1/supplies/{supply}"), &app.admin_token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
