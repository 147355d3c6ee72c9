pub mod auth;
pub mod config;
pub mod db;
pub mod enc;
pub mod enums;
pub mod errors;
pub mod models;
pub mod policy;
pub mod routes;
pub mod visibility;

#[cfg(test)]
pub mod test_support;
