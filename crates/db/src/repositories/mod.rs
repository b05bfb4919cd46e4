//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or any executor, where the call may run inside a
//! transaction) as the first argument.

pub mod asset_repo;
pub mod assignment_repo;
pub mod audit_repo;
pub mod dashboard_repo;
pub mod employee_repo;
pub mod role_repo;
pub mod settings_repo;
pub mod user_repo;

pub use asset_repo::AssetRepo;
pub use assignment_repo::AssignmentRepo;
pub use audit_repo::AuditLogRepo;
pub use dashboard_repo::DashboardRepo;
pub use employee_repo::EmployeeRepo;
pub use role_repo::RoleRepo;
pub use settings_repo::SettingsRepo;
pub use user_repo::UserRepo;
