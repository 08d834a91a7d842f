pub mod config;
pub mod error;
pub mod io;
pub mod render;
pub mod resolver;
pub mod store;
pub mod types;

pub use error::{OrgTreeError, Result};
