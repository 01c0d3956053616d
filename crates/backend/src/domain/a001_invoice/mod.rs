pub mod memory;
pub mod number;
pub mod repository;
pub mod service;
