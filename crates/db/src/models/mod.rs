pub mod asset;
pub mod assignment;
pub mod audit;
pub mod dashboard;
pub mod employee;
pub mod role;
pub mod settings;
pub mod user;
