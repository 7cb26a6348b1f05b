pub(crate) mod arguments;
pub mod config;
pub mod converter;
pub mod errors;
pub(crate) mod merge;
pub(crate) mod naming;
pub(crate) mod schema_walker;
pub mod templates;

#[cfg(test)]
mod tests;
