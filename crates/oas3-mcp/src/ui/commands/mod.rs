pub mod generate;
pub mod list;

pub use generate::{GenerateConfig, generate_config};
pub use list::list_operations;
