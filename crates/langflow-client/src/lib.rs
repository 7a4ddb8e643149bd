//! Async client for the Langflow API.
//!
//! The entry point is [`LangflowClient`]: configure it with a base URL and
//! optional API key, then use [`flow`](LangflowClient::flow) to run and
//! stream flows, [`files`](LangflowClient::files) to manage uploads, and
//! [`logs`](LangflowClient::logs) to read server logs.
//!
//! ```no_run
//! use langflow_client::LangflowClient;
//! use futures::StreamExt;
//!
//! # async fn example() -> Result<(), langflow_client::Error> {
//! let client = LangflowClient::builder()
//!     .base_url("http://localhost:7860")
//!     .api_key("sk-...")
//!     .build()?;
//!
//! let flow = client.flow("my-flow-id");
//! let response = flow.run("hello").await?;
//! println!("{}", response.chat_output_text()?);
//!
//! let mut events = flow.stream("hello again");
//! while let Some(event) = events.next().await {
//!     println!("{:?}", event?.event_name());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod files;
mod flow;
mod logs;
mod util;

pub use client::{LangflowClient, LangflowClientBuilder};
pub use files::Files;
pub use flow::{Flow, FlowEventStream};
pub use logs::Logs;
pub use util::ndjson::NdjsonDecoder;

// Core types, re-exported so callers need only this crate.
pub use langflow_types::{
    BoxStream, ChatMessage, ClientTimeout, Error, ErrorKind, FlowEvent, FlowRequest, FlowResponse,
    InputType, Log, LogsQuery, OutputType, RunOptions, Tweaks, UserFile,
};
