//! Domain types and pure logic for assetdesk.
//!
//! Nothing in this crate touches the database or HTTP; the `db` and `api`
//! crates build on it.

#[macro_use]
mod text_enum;

pub mod asset;
pub mod asset_csv;
pub mod assignment;
pub mod audit;
pub mod code_image;
pub mod depreciation;
pub mod employee;
pub mod error;
pub mod permissions;
pub mod roles;
pub mod settings;
pub mod types;
