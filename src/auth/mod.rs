pub mod dto;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use repo::{AdminUserStore, PgAdminUserStore};
pub use services::{Authorizer, LengthTokenAuthorizer, Principal};
