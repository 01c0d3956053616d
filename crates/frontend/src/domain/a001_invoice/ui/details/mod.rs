//! Invoice Details UI Module
//!
//! MVVM:
//! - model.rs: API functions (fetch, save)
//! - view_model.rs: form state, validation, save command
//! - view.rs: Leptos component (dialog body)

mod model;
mod view;
mod view_model;

pub use view::InvoiceDetails;
pub use view_model::InvoiceDetailsViewModel;
