// Flow handle: run, stream, tweak.

use futures::StreamExt;
use serde_json::Value;

use langflow_types::{BoxStream, Error, FlowEvent, FlowRequest, FlowResponse, RunOptions, Tweaks};

use crate::client::LangflowClient;
use crate::util::http::error_from_body;
use crate::util::ndjson::NdjsonDecoder;
use crate::util::utf8::Utf8Buffer;

/// Stream of incremental events from a flow run.
///
/// Dropping the stream cancels the run's transport: the underlying HTTP
/// response is released and no further events are read.
pub type FlowEventStream = BoxStream<'static, Result<FlowEvent, Error>>;

/// A handle to one flow on the server, identified by id.
///
/// `Flow` is an immutable value: [`tweak`](Flow::tweak) returns a new derived
/// handle and never modifies the original, so handles can be shared and
/// specialized freely.
#[derive(Clone)]
pub struct Flow {
    client: LangflowClient,
    id: String,
    tweaks: Tweaks,
}

impl Flow {
    pub(crate) fn new(client: LangflowClient, id: String) -> Self {
        Self {
            client,
            id,
            tweaks: Tweaks::new(),
        }
    }

    /// The flow id this handle targets.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The tweaks accumulated on this handle.
    pub fn tweaks(&self) -> &Tweaks {
        &self.tweaks
    }

    /// Derive a new handle with one tweak added.
    ///
    /// The original handle is unchanged. Tweaking the same key again on the
    /// derived handle overwrites the earlier value.
    pub fn tweak(&self, key: impl Into<String>, value: impl Into<Value>) -> Flow {
        let mut derived = self.clone();
        derived.tweaks.insert(key.into(), value.into());
        derived
    }

    /// Run the flow to completion with default options (chat in, chat out).
    pub async fn run(&self, input: impl Into<String>) -> Result<FlowResponse, Error> {
        self.run_with(input, RunOptions::default()).await
    }

    /// Run the flow to completion with explicit options.
    pub async fn run_with(
        &self,
        input: impl Into<String>,
        options: RunOptions,
    ) -> Result<FlowResponse, Error> {
        let body = FlowRequest::new(input, &options, &self.tweaks);
        let path = format!("/v1/run/{}", self.id);
        let json = self.client.post_json(&path, &body).await?;
        FlowResponse::from_json(json)
    }

    /// Run the flow and stream incremental events with default options.
    pub fn stream(&self, input: impl Into<String>) -> FlowEventStream {
        self.stream_with(input, RunOptions::default())
    }

    /// Run the flow and stream incremental events.
    ///
    /// The stream yields [`FlowEvent`]s in arrival order and ends after the
    /// terminal `end` or `error` event. A malformed record is yielded as an
    /// `Err(Decode)` item and the stream continues; transport failures and
    /// per-chunk read timeouts end the stream after a final `Err` item.
    pub fn stream_with(&self, input: impl Into<String>, options: RunOptions) -> FlowEventStream {
        let inner = self.client.inner();
        let url = format!("{}/v1/run/{}", inner.base_url, self.id);
        let body = FlowRequest::new(input, &options, &self.tweaks);

        Box::pin(async_stream::stream! {
            let headers = match inner.headers() {
                Ok(headers) => headers,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            tracing::debug!(%url, "POST (stream)");
            let response = match inner
                .http
                .post(&url)
                .query(&[("stream", "true")])
                .headers(headers)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    yield Err(Error::network(format!("HTTP request failed: {e}"), e));
                    return;
                }
            };

            let status = response.status().as_u16();
            if status >= 400 {
                let body = response.text().await.unwrap_or_default();
                yield Err(error_from_body(status, &body));
                return;
            }

            let mut byte_stream = response.bytes_stream();
            let mut decoder = NdjsonDecoder::new();
            let mut utf8 = Utf8Buffer::new();

            loop {
                let next = tokio::time::timeout(inner.stream_read_timeout, byte_stream.next()).await;
                let chunk = match next {
                    Ok(Some(Ok(chunk))) => chunk,
                    Ok(Some(Err(e))) => {
                        yield Err(Error::stream(format!("stream read failed: {e}"), e));
                        return;
                    }
                    Ok(None) => break,
                    Err(elapsed) => {
                        yield Err(Error::stream(
                            format!("no data received within {:?}", inner.stream_read_timeout),
                            elapsed,
                        ));
                        return;
                    }
                };

                let text = match utf8.push(&chunk) {
                    Ok(text) => text,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                for record in decoder.feed(&text) {
                    let event = record.and_then(FlowEvent::from_json);
                    let terminal = matches!(&event, Ok(e) if e.is_terminal());
                    if let Ok(FlowEvent::Unknown { event: name, .. }) = &event {
                        tracing::debug!(event = %name, "unrecognized stream event");
                    }
                    yield event;
                    if terminal {
                        return;
                    }
                }
            }

            // Transport closed without a terminal event; flush any
            // unterminated trailing record.
            if let Some(record) = decoder.finish() {
                yield record.and_then(FlowEvent::from_json);
            }
        })
    }
}
