// Server log retrieval: point-in-time fetch and live streaming.

use futures::StreamExt;
use serde_json::Value;

use langflow_types::{BoxStream, Error, Log, LogsQuery};

use crate::client::LangflowClient;
use crate::util::ndjson::NdjsonDecoder;
use crate::util::utf8::Utf8Buffer;

/// Handle for reading server logs.
#[derive(Clone)]
pub struct Logs {
    client: LangflowClient,
}

impl Logs {
    pub(crate) fn new(client: LangflowClient) -> Self {
        Self { client }
    }

    /// Fetch a window of log lines, sorted by timestamp ascending.
    ///
    /// The server responds with an object keyed by timestamp (Unix
    /// milliseconds, as a string); each entry becomes one [`Log`].
    pub async fn fetch(&self, query: LogsQuery) -> Result<Vec<Log>, Error> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(timestamp) = query.timestamp {
            params.push(("timestamp", timestamp.to_string()));
        }
        if let Some(before) = query.lines_before {
            params.push(("lines_before", before.to_string()));
        }
        if let Some(after) = query.lines_after {
            params.push(("lines_after", after.to_string()));
        }
        let json = self.client.get_json("/logs", &params).await?;
        let mut logs = parse_log_map(&json)?;
        logs.sort_by_key(|log| log.timestamp);
        Ok(logs)
    }

    /// Stream log lines as the server emits them.
    ///
    /// Each streamed record is a timestamp-keyed object like the `/logs`
    /// response; its entries are yielded in record order. Dropping the
    /// stream releases the connection.
    pub fn stream(&self) -> BoxStream<'static, Result<Log, Error>> {
        let inner = self.client.inner();
        let url = format!("{}/logs-stream", inner.base_url);

        Box::pin(async_stream::stream! {
            let headers = match inner.headers() {
                Ok(headers) => headers,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            tracing::debug!(%url, "GET (stream)");
            let response = match inner.http.get(&url).headers(headers).send().await {
                Ok(response) => response,
                Err(e) => {
                    yield Err(Error::network(format!("HTTP request failed: {e}"), e));
                    return;
                }
            };

            let status = response.status().as_u16();
            if status >= 400 {
                let body = response.text().await.unwrap_or_default();
                yield Err(crate::util::http::error_from_body(status, &body));
                return;
            }

            let mut byte_stream = response.bytes_stream();
            let mut decoder = NdjsonDecoder::new();
            let mut utf8 = Utf8Buffer::new();

            while let Some(chunk) = byte_stream.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(Error::stream(format!("stream read failed: {e}"), e));
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
                    match record.and_then(|json| parse_log_map(&json)) {
                        Ok(logs) => {
                            for log in logs {
                                yield Ok(log);
                            }
                        }
                        Err(e) => yield Err(e),
                    }
                }
            }
        })
    }
}

/// Decode the server's `{"<timestamp-ms>": "<message>", ...}` log shape.
fn parse_log_map(json: &Value) -> Result<Vec<Log>, Error> {
    let obj = json
        .as_object()
        .ok_or_else(|| Error::decode("log response is not a JSON object"))?;
    let mut logs = Vec::with_capacity(obj.len());
    for (key, value) in obj {
        let timestamp = key
            .parse::<i64>()
            .map_err(|_| Error::decode(format!("log key is not a timestamp: {key:?}")))?;
        let message = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        logs.push(Log { timestamp, message });
    }
    Ok(logs)
}
