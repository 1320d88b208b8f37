pub mod endpoint;
pub mod namespace;
