pub mod data_grid;
pub mod pagination_controls;
pub mod search_input;
