//! HTTP-level integration tests for the `/api/employees` resource.

mod common;

use assetdesk_core::audit::{AuditAction, AuditEntityType};
use axum::http::StatusCode;
use common::{
    audit_entries, body_json, delete_auth, get_auth, login_as, post_json_auth, put_json_auth,
};
use serde_json::{json, Value};
use sqlx::PgPool;

fn grace(code: &str) -> Value {
    json!({
        "employee_code": code,
        "first_name": "Grace",
        "last_name": "Hopper",
        "email": "grace@corp.test",
        "department": "Engineering",
        "employment_type": "full_time",
    })
}

async fn create_employee(pool: &PgPool, token: &str, body: Value) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/employees", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_employee(pool: PgPool) {
    let token = login_as(&pool, "manager").await;

    let employee = create_employee(&pool, &token, grace(" emp-001 ")).await;
    assert_eq!(employee["employee_code"], "EMP-001");
    assert_eq!(employee["is_active"], true);
    assert_eq!(employee["employment_type"], "full_time");

    let entries = audit_entries(&pool).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, AuditAction::EmployeeCreated);
    assert_eq!(entries[0].entity_type, AuditEntityType::Employee);
    assert_eq!(entries[0].entity_name.as_deref(), Some("Grace Hopper"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_employee_validation(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    let app = common::build_test_app(pool.clone());

    let mut body = grace("EMP-002");
    body["email"] = json!("not-an-email");
    let response = post_json_auth(app, "/api/employees", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(audit_entries(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_employee_code_conflicts(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    create_employee(&pool, &token, grace("EMP-003")).await;

    let app = common::build_test_app(pool);
    let mut body = grace("emp-003");
    body["email"] = json!("other@corp.test");
    let response = post_json_auth(app, "/api/employees", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_employee_role_is_read_only(pool: PgPool) {
    let manager = login_as(&pool, "manager").await;
    let viewer = login_as(&pool, "employee").await;
    create_employee(&pool, &manager, grace("EMP-004")).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/employees", &viewer).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool);
    let mut body = grace("EMP-005");
    body["email"] = json!("second@corp.test");
    let response = post_json_auth(app, "/api/employees", body, &viewer).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_employees_filters(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    create_employee(&pool, &token, grace("EMP-010")).await;
    create_employee(
        &pool,
        &token,
        json!({
            "employee_code": "EMP-011",
            "first_name": "Alan",
            "last_name": "Turing",
            "email": "alan@corp.test",
            "department": "Research",
        }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/employees?department=Research", &token).await;
    let items = body_json(response).await["data"].clone();
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["first_name"], "Alan");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/employees?search=hopper", &token).await;
    let items = body_json(response).await["data"].clone();
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["employee_code"], "EMP-010");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_employee_records_before_and_after(pool: PgPool) {
    let token = login_as(&pool, "manager").await;
    let employee = create_employee(&pool, &token, grace("EMP-020")).await;
    let id = employee["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = json!({ "designation": "Rear Admiral" });
    let response = put_json_auth(app, &format!("/api/employees/{id}"), body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["designation"], "Rear Admiral");
    assert_eq!(updated["first_name"], "Grace");

    let entries = audit_entries(&pool).await;
    assert_eq!(entries[0].action, AuditAction::EmployeeUpdated);
    assert!(entries[0].changes.0.before.as_ref().unwrap()["designation"].is_null());
    assert_eq!(
        entries[0].changes.0.after.as_ref().unwrap()["designation"],
        "Rear Admiral"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_employee(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;
    let manager = login_as(&pool, "manager").await;
    let employee = create_employee(&pool, &admin, grace("EMP-030")).await;
    let uri = format!("/api/employees/{}", employee["id"]);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &manager).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let entries = audit_entries(&pool).await;
    assert_eq!(entries[0].action, AuditAction::EmployeeDeleted);
    assert_eq!(
        entries[0].changes.0.before.as_ref().unwrap()["employee_code"],
        "EMP-030"
    );
    assert!(entries[0].changes.0.after.is_none());

    let app = common::build_test_app(pool);
    let response = get_auth(app, &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
