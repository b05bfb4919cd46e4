pub mod assets;
pub mod assignments;
pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod settings;
pub mod users;
