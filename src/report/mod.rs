pub mod grid;
pub mod json;
pub mod text;
