pub mod schema_ext;
pub mod spec;

pub(crate) use schema_ext::SchemaExt;
pub use spec::{OperationEntry, SpecDocument, SpecFormat, SpecLoader};
