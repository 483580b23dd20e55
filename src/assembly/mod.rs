pub mod gif;
pub mod reader;
