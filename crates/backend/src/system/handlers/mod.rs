pub mod auth;
pub mod revisions;
