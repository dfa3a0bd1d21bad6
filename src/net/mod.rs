//! Backend boundary: wire types, auth context, and the REST client.

pub mod api;
pub mod auth;
pub mod types;
