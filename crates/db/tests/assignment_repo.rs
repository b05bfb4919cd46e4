//! Integration tests for the assign / return workflow.

use assetdesk_core::asset::{AssetCategory, AssetStatus};
use assetdesk_core::assignment::AssignmentStatus;
use assetdesk_db::models::asset::{AssetFilter, NewAsset};
use assetdesk_db::models::assignment::{AssignmentFilter, CreateAssignment, ReturnAssignment};
use assetdesk_db::models::employee::CreateEmployee;
use assetdesk_db::repositories::{AssetRepo, AssignmentRepo, EmployeeRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_asset(pool: &PgPool, tag: &str) -> i64 {
    let input = NewAsset {
        asset_tag: tag.to_string(),
        name: format!("Asset {tag}"),
        category: AssetCategory::Hardware,
        serial_number: None,
        manufacturer: None,
        model: None,
        purchase_price: None,
        purchase_date: None,
        warranty_expiry: None,
        vendor: None,
        location: None,
        status: AssetStatus::Available,
        qr_code: None,
        created_by: None,
    };
    AssetRepo::create(pool, &input).await.unwrap().id
}

async fn seed_employee(pool: &PgPool, code: &str) -> i64 {
    let input = CreateEmployee {
        employee_code: code.to_string(),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: format!("{}@example.com", code.to_lowercase()),
        phone: None,
        department: Some("Engineering".to_string()),
        designation: None,
        employment_type: None,
        joining_date: None,
    };
    EmployeeRepo::create(pool, &input).await.unwrap().id
}

fn assign(asset_id: i64, employee_id: i64) -> CreateAssignment {
    CreateAssignment {
        asset_id,
        employee_id,
        expected_return_date: None,
        notes: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assign_flips_asset_status(pool: PgPool) {
    let asset_id = seed_asset(&pool, "LAP-1").await;
    let employee_id = seed_employee(&pool, "EMP-1").await;

    let assignment = AssignmentRepo::assign(&pool, &assign(asset_id, employee_id), None)
        .await
        .unwrap()
        .expect("asset was available");
    assert_eq!(assignment.status, AssignmentStatus::Active);

    let asset = AssetRepo::find_by_id(&pool, asset_id).await.unwrap().unwrap();
    assert_eq!(asset.status, AssetStatus::Assigned);

    let row = AssetRepo::find_row_by_id(&pool, asset_id).await.unwrap().unwrap();
    let assignee = row.assignee().unwrap();
    assert_eq!(assignee.employee_id, employee_id);
    assert_eq!(assignee.name, "Grace Hopper");

    let filter = AssetFilter {
        assigned_to: Some(employee_id),
        ..AssetFilter::default()
    };
    assert_eq!(AssetRepo::list(&pool, &filter).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_assignment_is_refused(pool: PgPool) {
    let asset_id = seed_asset(&pool, "LAP-2").await;
    let first = seed_employee(&pool, "EMP-1").await;
    let second = seed_employee(&pool, "EMP-2").await;

    AssignmentRepo::assign(&pool, &assign(asset_id, first), None)
        .await
        .unwrap()
        .unwrap();
    let again = AssignmentRepo::assign(&pool, &assign(asset_id, second), None)
        .await
        .unwrap();
    assert!(again.is_none());

    let history = AssignmentRepo::history_for_asset(&pool, asset_id).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_index_forbids_two_active_rows(pool: PgPool) {
    let asset_id = seed_asset(&pool, "LAP-3").await;
    let employee_id = seed_employee(&pool, "EMP-1").await;

    let insert = "INSERT INTO assignments (asset_id, employee_id) VALUES ($1, $2)";
    sqlx::query(insert).bind(asset_id).bind(employee_id).execute(&pool).await.unwrap();
    let err = sqlx::query(insert)
        .bind(asset_id)
        .bind(employee_id)
        .execute(&pool)
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db) => {
            assert_eq!(db.constraint(), Some("uq_assignments_active_asset"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_return_makes_asset_available(pool: PgPool) {
    let asset_id = seed_asset(&pool, "LAP-4").await;
    let employee_id = seed_employee(&pool, "EMP-1").await;
    let assignment = AssignmentRepo::assign(&pool, &assign(asset_id, employee_id), None)
        .await
        .unwrap()
        .unwrap();

    let input = ReturnAssignment {
        return_condition: Some("good".to_string()),
        notes: None,
    };
    let returned = AssignmentRepo::mark_returned(&pool, assignment.id, &input)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(returned.status, AssignmentStatus::Returned);
    assert!(returned.returned_date.is_some());
    assert_eq!(returned.return_condition.as_deref(), Some("good"));

    let asset = AssetRepo::find_by_id(&pool, asset_id).await.unwrap().unwrap();
    assert_eq!(asset.status, AssetStatus::Available);

    // Returning twice is a no-op.
    let again = AssignmentRepo::mark_returned(&pool, assignment.id, &input)
        .await
        .unwrap();
    assert!(again.is_none());

    // The asset can be handed out again.
    assert!(AssignmentRepo::assign(&pool, &assign(asset_id, employee_id), None)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_listing_and_employee_checks(pool: PgPool) {
    let a1 = seed_asset(&pool, "A-1").await;
    let a2 = seed_asset(&pool, "A-2").await;
    let employee_id = seed_employee(&pool, "EMP-1").await;

    let first = AssignmentRepo::assign(&pool, &assign(a1, employee_id), None)
        .await
        .unwrap()
        .unwrap();
    AssignmentRepo::assign(&pool, &assign(a2, employee_id), None)
        .await
        .unwrap()
        .unwrap();
    AssignmentRepo::mark_returned(&pool, first.id, &ReturnAssignment::default())
        .await
        .unwrap()
        .unwrap();

    let active = AssignmentRepo::list(
        &pool,
        &AssignmentFilter {
            status: Some(AssignmentStatus::Active),
        },
    )
    .await
    .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].asset_tag, "A-2");
    assert_eq!(active[0].employee_name, "Grace Hopper");

    assert_eq!(AssignmentRepo::list_for_employee(&pool, employee_id).await.unwrap().len(), 2);
    assert_eq!(AssignmentRepo::recent(&pool, 1).await.unwrap().len(), 1);
    assert_eq!(AssignmentRepo::count_active(&pool).await.unwrap(), 1);
    assert!(AssignmentRepo::employee_has_active(&pool, employee_id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_employee_with_history_cannot_be_deleted(pool: PgPool) {
    let asset_id = seed_asset(&pool, "A-9").await;
    let employee_id = seed_employee(&pool, "EMP-9").await;
    let assignment = AssignmentRepo::assign(&pool, &assign(asset_id, employee_id), None)
        .await
        .unwrap()
        .unwrap();
    AssignmentRepo::mark_returned(&pool, assignment.id, &ReturnAssignment::default())
        .await
        .unwrap();

    let err = EmployeeRepo::delete(&pool, employee_id).await.unwrap_err();
    match err {
        sqlx::Error::Database(db) => assert_eq!(db.code().as_deref(), Some("23503")),
        other => panic!("expected foreign key violation, got {other:?}"),
    }
}
