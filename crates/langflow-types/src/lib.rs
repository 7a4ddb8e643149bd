// langflow-types: shared types, stream events, and errors
#![allow(clippy::result_large_err)]

pub mod config;
pub mod error;
pub mod file;
pub mod log;
pub mod request;
pub mod response;
pub mod stream;

pub use config::*;
pub use error::*;
pub use file::*;
pub use log::*;
pub use request::*;
pub use response::*;
pub use stream::*;
