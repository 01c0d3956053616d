//! Сессия пользователя: токен в localStorage + dev-вход по tenant/user.

pub mod api;
pub mod context;
pub mod storage;

pub use context::{use_auth, AuthProvider, AuthState, DevLogin};
