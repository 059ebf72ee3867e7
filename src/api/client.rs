use super::backend::{Backend, ProgressEvent, ProgressSink};
use super::models::{
    ErrorBody, HealthStatus, SearchRequest, SearchResponse, UploadResponse, WorkerStatus,
};
use crate::config::BackendConfig;
use crate::error::{ClientError, Result};
use crate::upload::SelectedFile;
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::{FutureExt, Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;
use tracing::debug;

const CHUNK_SIZE: usize = 64 * 1024;

/// reqwest-backed [`Backend`].
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = parse_origin(&config.base_url)?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("leakdb-client/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Config(format!("cannot build URL for {}: {}", path, e)))
    }
}

fn parse_origin(base_url: &str) -> Result<Url> {
    Url::parse(base_url)
        .map_err(|e| ClientError::Config(format!("invalid backend URL {:?}: {}", base_url, e)))
}

/// Resolves a link from a backend response (usually origin-relative) against the backend origin.
pub fn resolve_link(base_url: &Url, href: &str) -> String {
    base_url
        .join(href)
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}

/// Reads `reader` in chunks for the request body, reporting bytes sent against `total`.
fn progress_stream<R>(
    reader: R,
    total: u64,
    on_progress: ProgressSink,
) -> impl Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static
where
    R: AsyncRead + Send + Sync + 'static,
{
    let mut loaded = 0u64;

    ReaderStream::with_capacity(reader, CHUNK_SIZE).map(move |chunk| {
        if let Ok(bytes) = &chunk {
            loaded += bytes.len() as u64;
            on_progress(ProgressEvent {
                loaded,
                total: Some(total),
            });
        }
        chunk
    })
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.bytes().await.unwrap_or_default();
    let detail = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message);
    debug!(status = status.as_u16(), ?detail, "backend rejected request");

    Err(ClientError::Backend {
        status: status.as_u16(),
        detail,
    })
}

impl Backend for HttpBackend {
    fn upload(
        &self,
        file: SelectedFile,
        on_progress: ProgressSink,
    ) -> BoxFuture<'static, Result<UploadResponse>> {
        let client = self.client.clone();
        let url = self.endpoint("/upload");

        async move {
            let url = url?;
            let reader = tokio::fs::File::open(&file.path).await?;
            let total = reader.metadata().await?.len();
            debug!(file = %file.name, bytes = total, "uploading");

            let body = reqwest::Body::wrap_stream(progress_stream(reader, total, on_progress));
            let part = Part::stream_with_length(body, total).file_name(file.name.clone());
            let form = Form::new().part("file", part);

            let response = client.post(url).multipart(form).send().await?;
            decode(response).await
        }
        .boxed()
    }

    fn search(&self, query: String) -> BoxFuture<'static, Result<SearchResponse>> {
        let client = self.client.clone();
        let url = self.endpoint("/search");

        async move {
            debug!(%query, "searching");
            let response = client
                .post(url?)
                .json(&SearchRequest { query: &query })
                .send()
                .await?;
            decode(response).await
        }
        .boxed()
    }

    fn worker_status(&self) -> BoxFuture<'static, Result<WorkerStatus>> {
        let client = self.client.clone();
        let url = self.endpoint("/worker-status");

        async move {
            let response = client.get(url?).send().await?;
            decode(response).await
        }
        .boxed()
    }

    fn health(&self) -> BoxFuture<'static, Result<HealthStatus>> {
        let client = self.client.clone();
        let url = self.endpoint("/health");

        async move {
            let response = client.get(url?).send().await?;
            decode(response).await
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{body_json, body_string_contains, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn endpoints_replace_the_base_path() {
        let backend = HttpBackend::new(&BackendConfig {
            base_url: "http://localhost:8080/app/".to_string(),
            timeout_secs: Some(30),
        })
        .unwrap();
        assert_eq!(
            backend.endpoint("/worker-status").unwrap().as_str(),
            "http://localhost:8080/worker-status"
        );
    }

    #[test]
    fn invalid_origin_is_a_config_error() {
        let err = HttpBackend::new(&BackendConfig {
            base_url: "not a url".to_string(),
            timeout_secs: None,
        })
        .err()
        .unwrap();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn links_resolve_against_origin() {
        let base = parse_origin("http://localhost:8080").unwrap();
        assert_eq!(
            resolve_link(&base, "/files/a.json"),
            "http://localhost:8080/files/a.json"
        );
        assert_eq!(
            resolve_link(&base, "https://cdn.example.org/b.json"),
            "https://cdn.example.org/b.json"
        );
    }

    fn recording_sink() -> (ProgressSink, Arc<Mutex<Vec<ProgressEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink: ProgressSink = {
            let events = events.clone();
            Arc::new(move |event| events.lock().unwrap().push(event))
        };
        (sink, events)
    }

    fn backend_for(server: &MockServer) -> HttpBackend {
        HttpBackend::new(&BackendConfig {
            base_url: server.uri(),
            timeout_secs: Some(5),
        })
        .unwrap()
    }

    #[test]
    fn body_stream_reports_every_chunk() {
        let (sink, events) = recording_sink();
        let size = CHUNK_SIZE * 2 + 100;
        let reader = std::io::Cursor::new(vec![7u8; size]);

        let chunks: Vec<_> =
            futures::executor::block_on(progress_stream(reader, size as u64, sink).collect());
        let sent: usize = chunks.iter().map(|c| c.as_ref().unwrap().len()).sum();
        assert_eq!(sent, size);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), chunks.len());
        let percents: Vec<_> = events.iter().filter_map(ProgressEvent::percent).collect();
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(percents.last(), Some(&100));
        assert_eq!(events.last().unwrap().loaded, size as u64);
    }

    #[test]
    fn empty_file_reports_nothing() {
        let (sink, events) = recording_sink();
        let reader = std::io::Cursor::new(Vec::new());
        let chunks: Vec<_> = futures::executor::block_on(progress_stream(reader, 0, sink).collect());
        assert!(chunks.is_empty());
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_posts_the_file_as_multipart_field() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .and(body_string_contains(r#"name="file"; filename="dump.txt""#))
            .and(body_string_contains("https://example.org:alice:hunter2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "inserted_rows": 1,
                "json_file": "/uploads/dump.json",
                "details": [{
                    "software": "Chrome",
                    "url": "https://example.org",
                    "username": "alice",
                    "password": "hunter2",
                    "date": null
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("dump.txt");
        std::fs::write(&file_path, "https://example.org:alice:hunter2\n").unwrap();
        let file = SelectedFile::from_path(&file_path).unwrap();

        let (sink, events) = recording_sink();
        let response = backend_for(&mock_server).upload(file, sink).await.unwrap();

        assert_eq!(response.inserted_rows, 1);
        assert_eq!(response.json_file.as_deref(), Some("/uploads/dump.json"));
        assert_eq!(response.details.unwrap()[0].username, "alice");
        let events = events.lock().unwrap();
        assert_eq!(events.last().and_then(ProgressEvent::percent), Some(100));
    }

    #[tokio::test]
    async fn search_posts_query_as_json() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_json(json!({ "query": "gmail.com" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    { "software": "Firefox", "url": null, "username": "bob", "password": "pw", "date": "2024-03-05T14:07:09" }
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = backend_for(&mock_server)
            .search("gmail.com".to_string())
            .await
            .unwrap();
        let results = response.results.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "");
        assert_eq!(results[0].date.as_deref(), Some("2024-03-05T14:07:09"));
    }

    #[tokio::test]
    async fn worker_status_is_fetched_with_get() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/worker-status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "running": true,
                "last_checked": "2024-03-05T14:07:09",
                "last_file": "combo.zip",
                "inserted_leaks": 42,
                "errors": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let status = backend_for(&mock_server).worker_status().await.unwrap();
        assert!(status.running);
        assert_eq!(status.inserted_leaks, 42);
        assert_eq!(status.last_file.as_deref(), Some("combo.zip"));
    }

    #[tokio::test]
    async fn error_detail_is_surfaced() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "detail": "Query too short" })),
            )
            .mount(&mock_server)
            .await;

        let err = backend_for(&mock_server)
            .search("a".to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            ClientError::Backend { status: 400, detail: Some(d) } if d == "Query too short"
        ));
        assert_eq!(err.user_message(), "Query too short");
    }

    #[tokio::test]
    async fn empty_error_body_falls_back_to_status_code() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/worker-status"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let err = backend_for(&mock_server).worker_status().await.unwrap_err();
        assert!(matches!(err, ClientError::Backend { status: 500, detail: None }));
        assert_eq!(err.user_message(), "Request failed with status code 500");
    }
}
