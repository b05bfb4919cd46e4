//! HTTP-level integration tests for the assign / return workflow and the
//! dashboard widgets that read from it.

mod common;

use assetdesk_core::audit::{AuditAction, AuditEntityType};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    audit_entries, body_json, delete_auth, get_auth, login_as, post_auth, post_json_auth,
    put_json_auth,
};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create(pool: &PgPool, token: &str, uri: &str, body: Value) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, uri, body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED, "POST {uri}");
    body_json(response).await["data"].clone()
}

async fn new_asset(pool: &PgPool, token: &str, tag: &str) -> i64 {
    let body = json!({ "asset_tag": tag, "name": format!("Laptop {tag}"), "category": "hardware" });
    create(pool, token, "/api/assets", body).await["id"]
        .as_i64()
        .unwrap()
}

async fn new_employee(pool: &PgPool, token: &str, code: &str) -> i64 {
    let body = json!({
        "employee_code": code,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": format!("{}@corp.test", code.to_lowercase()),
    });
    create(pool, token, "/api/employees", body).await["id"]
        .as_i64()
        .unwrap()
}

async fn assign(pool: &PgPool, token: &str, asset_id: i64, employee_id: i64) -> Value {
    let body = json!({ "asset_id": asset_id, "employee_id": employee_id });
    create(pool, token, "/api/assignments", body).await
}

async fn asset_status(pool: &PgPool, token: &str, asset_id: i64) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/assets/{asset_id}"), token).await;
    body_json(response).await["data"]["status"].clone()
}

// ---------------------------------------------------------------------------
// Assign
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assign_marks_asset_assigned(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    let asset_id = new_asset(&pool, &token, "A-1").await;
    let employee_id = new_employee(&pool, &token, "E-1").await;

    let assignment = assign(&pool, &token, asset_id, employee_id).await;
    assert_eq!(assignment["status"], "active");
    assert_eq!(assignment["asset_tag"], "A-1");
    assert_eq!(assignment["employee_name"], "Ada Lovelace");
    assert!(assignment["returned_date"].is_null());

    assert_eq!(asset_status(&pool, &token, asset_id).await, "assigned");

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/assets/{asset_id}"), &token).await;
    let detail = body_json(response).await["data"].clone();
    assert_eq!(detail["assigned_to"]["employee_id"], employee_id);
    assert_eq!(detail["assigned_to"]["name"], "Ada Lovelace");

    let entries = audit_entries(&pool).await;
    assert_eq!(entries[0].action, AuditAction::AssetAssigned);
    assert_eq!(entries[0].entity_type, AuditEntityType::Assignment);
    assert_eq!(entries[0].entity_name.as_deref(), Some("A-1 / Ada Lovelace"));
    assert!(entries[0].changes.0.before.is_none());
    assert_eq!(entries[0].changes.0.after.as_ref().unwrap()["asset_id"], asset_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_assignment_conflicts(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    let asset_id = new_asset(&pool, &token, "A-2").await;
    let first = new_employee(&pool, &token, "E-2").await;
    let second = new_employee(&pool, &token, "E-3").await;
    assign(&pool, &token, asset_id, first).await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "asset_id": asset_id, "employee_id": second });
    let response = post_json_auth(app, "/api/assignments", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let active: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM assignments WHERE status = 'active'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(active, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_asset_in_maintenance_cannot_be_assigned(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    let asset_id = new_asset(&pool, &token, "A-3").await;
    let employee_id = new_employee(&pool, &token, "E-4").await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/assets/{asset_id}");
    let response = put_json_auth(app, &uri, json!({ "status": "in_maintenance" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let body = json!({ "asset_id": asset_id, "employee_id": employee_id });
    let response = post_json_auth(app, "/api/assignments", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inactive_employee_cannot_receive(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    let asset_id = new_asset(&pool, &token, "A-4").await;
    let employee_id = new_employee(&pool, &token, "E-5").await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/employees/{employee_id}");
    let response = put_json_auth(app, &uri, json!({ "is_active": false }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let body = json!({ "asset_id": asset_id, "employee_id": employee_id });
    let response = post_json_auth(app, "/api/assignments", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(asset_status(&pool, &token, asset_id).await, "available");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assign_unknown_asset_or_employee_returns_404(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    let asset_id = new_asset(&pool, &token, "A-5").await;
    let employee_id = new_employee(&pool, &token, "E-6").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "asset_id": asset_id, "employee_id": 9999 });
    let response = post_json_auth(app, "/api/assignments", body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let body = json!({ "asset_id": 9999, "employee_id": employee_id });
    let response = post_json_auth(app, "/api/assignments", body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_employee_cannot_assign(pool: PgPool) {
    let manager = login_as(&pool, "manager").await;
    let employee = login_as(&pool, "employee").await;
    let asset_id = new_asset(&pool, &manager, "A-6").await;
    let employee_id = new_employee(&pool, &manager, "E-7").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "asset_id": asset_id, "employee_id": employee_id });
    let response = post_json_auth(app, "/api/assignments", body, &employee).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Return
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_return_frees_asset(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    let asset_id = new_asset(&pool, &token, "R-1").await;
    let employee_id = new_employee(&pool, &token, "E-8").await;
    let assignment = assign(&pool, &token, asset_id, employee_id).await;
    let id = assignment["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/assignments/{id}/return");
    let body = json!({ "return_condition": "good", "notes": "charger missing" });
    let response = post_json_auth(app, &uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let returned = body_json(response).await["data"].clone();
    assert_eq!(returned["status"], "returned");
    assert_eq!(returned["return_condition"], "good");
    assert!(returned["returned_date"].is_string());
    assert_eq!(asset_status(&pool, &token, asset_id).await, "available");

    let entries = audit_entries(&pool).await;
    assert_eq!(entries[0].action, AuditAction::AssetReturned);
    assert_eq!(entries[0].entity_id, Some(id));
    assert_eq!(entries[0].changes.0.before.as_ref().unwrap()["status"], "active");
    assert_eq!(entries[0].changes.0.after.as_ref().unwrap()["status"], "returned");

    // Returning twice is refused.
    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The asset can be handed out again.
    assign(&pool, &token, asset_id, employee_id).await;

    let app = common::build_test_app(pool);
    let uri = format!("/api/assignments/asset/{asset_id}/history");
    let response = get_auth(app, &uri, &token).await;
    let history = body_json(response).await["data"].clone();
    assert_eq!(history.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_return_without_body(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    let asset_id = new_asset(&pool, &token, "R-2").await;
    let employee_id = new_employee(&pool, &token, "E-9").await;
    let assignment = assign(&pool, &token, asset_id, employee_id).await;

    let app = common::build_test_app(pool);
    let uri = format!("/api/assignments/{}/return", assignment["id"]);
    let response = post_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_return_unknown_assignment_returns_404(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    let app = common::build_test_app(pool);

    let response = post_auth(app, "/api/assignments/31337/return", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Deletes blocked by assignments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assigned_asset_cannot_be_deleted(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;
    let asset_id = new_asset(&pool, &admin, "D-1").await;
    let employee_id = new_employee(&pool, &admin, "E-10").await;
    assign(&pool, &admin, asset_id, employee_id).await;
    let before = audit_entries(&pool).await.len();

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/assets/{asset_id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(audit_entries(&pool).await.len(), before);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_employee_with_history_cannot_be_deleted(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;
    let asset_id = new_asset(&pool, &admin, "D-2").await;
    let employee_id = new_employee(&pool, &admin, "E-11").await;
    let assignment = assign(&pool, &admin, asset_id, employee_id).await;
    let uri = format!("/api/employees/{employee_id}");

    // While holding an asset.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // After returning it, the history row still references the employee.
    let app = common::build_test_app(pool.clone());
    let return_uri = format!("/api/assignments/{}/return", assignment["id"]);
    assert_eq!(post_auth(app, &return_uri, &admin).await.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Listing and dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_employee_view(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    let first = new_asset(&pool, &token, "L-1").await;
    let second = new_asset(&pool, &token, "L-2").await;
    let employee_id = new_employee(&pool, &token, "E-12").await;
    let returned = assign(&pool, &token, first, employee_id).await;
    assign(&pool, &token, second, employee_id).await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/assignments/{}/return", returned["id"]);
    assert_eq!(post_auth(app, &uri, &token).await.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/assignments?status=active", &token).await;
    let active = body_json(response).await["data"].clone();
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["asset_tag"], "L-2");

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/assignments/employee/{employee_id}");
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/assignments/employee/5555", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_stats_and_recent(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    let assigned = new_asset(&pool, &token, "S-1").await;
    new_asset(&pool, &token, "S-2").await;
    let employee_id = new_employee(&pool, &token, "E-13").await;
    assign(&pool, &token, assigned, employee_id).await;

    let viewer = login_as(&pool, "employee").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/dashboard/stats", &viewer).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await["data"].clone();
    assert_eq!(stats["total_assets"], 2);
    assert_eq!(stats["total_employees"], 1);
    assert_eq!(stats["active_assignments"], 1);
    let by_status = stats["by_status"].as_array().unwrap();
    assert!(by_status
        .iter()
        .any(|g| g["key"] == "assigned" && g["count"] == 1));
    assert!(by_status
        .iter()
        .any(|g| g["key"] == "available" && g["count"] == 1));

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/dashboard/recent-assignments", &viewer).await;
    let recent = body_json(response).await["data"].clone();
    assert_eq!(recent.as_array().unwrap().len(), 1);
    assert_eq!(recent[0]["asset_tag"], "S-1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_depreciation_summary(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    let old = (Utc::now().date_naive() - Duration::days(1100)).to_string();
    let recent = (Utc::now().date_naive() - Duration::days(10)).to_string();

    create(
        &pool,
        &token,
        "/api/assets",
        json!({ "asset_tag": "V-1", "name": "Old", "category": "hardware",
                "purchase_price": "1000.00", "purchase_date": old }),
    )
    .await;
    create(
        &pool,
        &token,
        "/api/assets",
        json!({ "asset_tag": "V-2", "name": "New", "category": "hardware",
                "purchase_price": "500.00", "purchase_date": recent }),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/dashboard/depreciation", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let summary = body_json(response).await["data"].clone();
    assert_eq!(summary["total_purchase_value"], "1500");
    assert_eq!(summary["total_current_value"], "900");
    assert_eq!(summary["total_depreciation"], "600");
    assert_eq!(summary["depreciation_percentage"], "40");
}
