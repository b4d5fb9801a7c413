pub mod analysis;
pub mod config;
pub mod document;
pub mod error;

pub use analysis::*;
pub use config::Config;
pub use document::*;
pub use error::*;
