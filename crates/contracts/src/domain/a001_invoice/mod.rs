pub mod aggregate;
pub mod api;
