pub mod http;
pub mod ndjson;
pub mod utf8;
