//! Firestore REST client.

use std::time::Duration;

use async_trait::async_trait;
use canteras_types::{Collection, Document};
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value as Json;

use crate::config::{ClientConfig, FirestoreSettings};
use crate::decode::{ListDocumentsResponse, RestDocument, decode_document, encode_record};
use crate::{DocumentSource, Result, StoreError};

/// Position in a paginated listing.
enum PageCursor {
    First,
    Next(String),
    Done,
}

/// Firestore client with retries.
///
/// The client is constructed explicitly and handed to whoever needs to
/// fetch; nothing in the workspace holds a global connection.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    client: Client,
    config: ClientConfig,
    documents_url: Url,
    api_key: Option<String>,
}

impl FirestoreClient {
    /// Creates a new client for the configured project and database.
    ///
    /// # Errors
    ///
    /// Returns an error if no project is configured, the base URL is invalid,
    /// or the HTTP client cannot be created.
    pub fn new(settings: FirestoreSettings, config: ClientConfig) -> Result<Self> {
        let project_id = settings
            .project_id
            .filter(|p| !p.is_empty())
            .ok_or_else(|| StoreError::Config("firestore.project_id is not set".into()))?;

        let mut documents_url = Url::parse(&settings.base_url)
            .map_err(|e| StoreError::Config(format!("invalid base URL: {e}")))?;
        documents_url
            .path_segments_mut()
            .map_err(|()| StoreError::Config("base URL cannot hold a path".into()))?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                project_id.as_str(),
                "databases",
                settings.database.as_str(),
                "documents",
            ]);

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            config,
            documents_url,
            api_key: settings.api_key,
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the URL addressing `segments` below the documents root.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.documents_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        url
    }

    /// Streams every document of a collection, following page tokens.
    pub fn document_stream<'a>(
        &'a self,
        collection: &'a str,
    ) -> impl Stream<Item = Result<Document>> + 'a {
        stream::try_unfold(PageCursor::First, move |cursor| async move {
            let token = match cursor {
                PageCursor::Done => return Ok(None),
                PageCursor::First => None,
                PageCursor::Next(token) => Some(token),
            };

            let page = self.list_page(collection, token.as_deref()).await?;
            let next = page
                .next_page_token
                .filter(|t| !t.is_empty())
                .map_or(PageCursor::Done, PageCursor::Next);
            let documents = page
                .documents
                .into_iter()
                .map(decode_document)
                .collect::<Result<Vec<_>>>()?;

            tracing::debug!(collection, count = documents.len(), "fetched page");
            Ok::<_, StoreError>(Some((documents, next)))
        })
        .map_ok(|documents| stream::iter(documents.into_iter().map(Ok::<_, StoreError>)))
        .try_flatten()
    }

    async fn list_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse> {
        let mut url = self.url(&[collection]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", &self.config.page_size.to_string());
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }

        self.get_json(url)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("collection '{collection}'")))
    }

    /// Issues a GET request and decodes the JSON body. Returns `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        let Some(response) = self.send(Method::GET, url, None).await? else {
            return Ok(None);
        };
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Issues a request with an optional JSON body.
    ///
    /// Returns `Ok(None)` on 404. Server errors (5xx), rate limiting (429)
    /// and transient transport errors are retried with backoff; every
    /// request issued here is idempotent.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Json>,
    ) -> Result<Option<Response>> {
        let body = body.map(Json::to_string);
        let mut attempts = 0;

        loop {
            let mut request = self.client.request(method.clone(), url.clone());
            if let Some(body) = &body {
                request = request
                    .header(CONTENT_TYPE, "application/json")
                    .body(body.clone());
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::NOT_FOUND {
                        return Ok(None);
                    }

                    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if attempts < self.config.max_retries {
                            attempts += 1;
                            let delay = self.calculate_backoff_delay(attempts);
                            tracing::warn!(%method, %status, attempts, ?delay, "retrying request");
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                        return Err(StoreError::ServerError {
                            status: status.as_u16(),
                        });
                    }

                    if !status.is_success() {
                        return Err(StoreError::ServerError {
                            status: status.as_u16(),
                        });
                    }

                    return Ok(Some(response));
                }
                Err(e) if Self::is_retryable_error(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = self.calculate_backoff_delay(attempts);
                    tracing::warn!(error = %e, attempts, ?delay, "retrying request");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Calculates the backoff delay with exponential backoff and jitter.
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10));
        let capped_delay = exp_delay.min(self.config.max_delay_ms);

        // Deterministic jitter of up to ±25%, derived from the attempt number
        let jitter_range = capped_delay / 4;
        let jitter = if jitter_range > 0 {
            (u64::from(attempt) * 17 % (jitter_range * 2)) as i64 - jitter_range as i64
        } else {
            0
        };

        Duration::from_millis((capped_delay as i64 + jitter).max(0) as u64)
    }

    fn is_retryable_error(error: &reqwest::Error) -> bool {
        if error.is_builder() {
            return false;
        }
        error.is_timeout() || error.is_connect() || error.is_request()
    }
}

#[async_trait]
impl DocumentSource for FirestoreClient {
    async fn fetch_collection(&self, name: &str) -> Result<Collection> {
        let documents: Vec<Document> = self.document_stream(name).try_collect().await?;
        tracing::info!(collection = name, count = documents.len(), "fetched collection");
        Ok(Collection::with_documents(name, documents))
    }

    async fn fetch_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let url = self.url(&[collection, id]);
        match self.get_json::<RestDocument>(url).await? {
            Some(raw) => Ok(Some(decode_document(raw)?)),
            None => Ok(None),
        }
    }

    async fn put_document(&self, collection: &str, document: &Document) -> Result<()> {
        let url = self.url(&[collection, document.id()]);
        let body = encode_record(document.record());

        self.send(Method::PATCH, url, Some(&body))
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("collection '{collection}'")))?;
        tracing::info!(collection, id = document.id(), "stored document");
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        let url = self.url(&[collection, id]);
        self.send(Method::DELETE, url, None).await?;
        tracing::info!(collection, id, "deleted document");
        Ok(())
    }

    fn describe(&self) -> String {
        let mut url = self.documents_url.clone();
        url.set_query(None);
        format!("firestore {url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const DEFAULT_URL: &str = crate::config::DEFAULT_BASE_URL;

    const PAGE_1: &str = r#"{
        "documents": [
            {"name": "projects/p/databases/(default)/documents/socios/B",
             "fields": {"DNI": {"stringValue": "B"}, "NumeroSocio": {"integerValue": "2"}}},
            {"name": "projects/p/databases/(default)/documents/socios/A",
             "fields": {"DNI": {"stringValue": "A"}, "NumeroSocio": {"integerValue": "1"}}}
        ],
        "nextPageToken": "page-2"
    }"#;

    const PAGE_2: &str = r#"{
        "documents": [
            {"name": "projects/p/databases/(default)/documents/socios/C",
             "fields": {"DNI": {"stringValue": "C"}}}
        ]
    }"#;

    fn settings(base_url: &str) -> FirestoreSettings {
        FirestoreSettings {
            project_id: Some("p".into()),
            base_url: base_url.into(),
            ..FirestoreSettings::default()
        }
    }

    fn fast_config(max_retries: u32) -> ClientConfig {
        ClientConfig {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 5,
            ..ClientConfig::default()
        }
    }

    /// Serves canned responses, choosing one by inspecting the request line.
    async fn spawn_server(route: fn(&str) -> (u16, &'static str)) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut socket).await;
                let request_line = request.lines().next().unwrap_or_default().to_owned();

                let (status, body) = route(&request_line);
                let response = format!(
                    "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{addr}")
    }

    /// Reads the request head and any `content-length` body.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let Ok(n) = socket.read(&mut chunk).await else {
                break;
            };
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let body_len = text[..head_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_requires_project() {
        let result = FirestoreClient::new(FirestoreSettings::default(), ClientConfig::default());
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn test_url_building() {
        let mut settings = settings("https://firestore.googleapis.com/");
        settings.api_key = Some("k".into());
        let client = FirestoreClient::new(settings, ClientConfig::default()).unwrap();

        assert_eq!(
            client.url(&["socios", "12345678A"]).as_str(),
            "https://firestore.googleapis.com/v1/projects/p/databases/(default)/documents/socios/12345678A?key=k"
        );
        assert_eq!(
            client.describe(),
            "firestore https://firestore.googleapis.com/v1/projects/p/databases/(default)/documents"
        );
    }

    #[test]
    fn test_backoff_delay_calculation() {
        let client = FirestoreClient::new(settings(DEFAULT_URL), ClientConfig::default()).unwrap();

        // base_delay * 2 = 500ms, plus jitter
        let delay1 = client.calculate_backoff_delay(1);
        assert!(delay1.as_millis() >= 375 && delay1.as_millis() <= 625);

        // capped at max_delay plus jitter
        let delay_high = client.calculate_backoff_delay(20);
        assert!(delay_high.as_millis() <= 12_500);
    }

    #[tokio::test]
    async fn test_fetch_collection_follows_pages() {
        let base = spawn_server(|line| {
            if line.contains("pageToken=page-2") {
                (200, PAGE_2)
            } else {
                (200, PAGE_1)
            }
        })
        .await;
        let client = FirestoreClient::new(settings(&base), fast_config(0)).unwrap();

        let collection = client.fetch_collection("socios").await.unwrap();
        let ids: Vec<_> = collection.documents().iter().map(Document::id).collect();

        assert_eq!(collection.name(), "socios");
        assert_eq!(ids, ["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_fetch_missing_document() {
        let base = spawn_server(|_| (404, "{}")).await;
        let client = FirestoreClient::new(settings(&base), fast_config(0)).unwrap();

        let doc = client.fetch_document("socios", "nobody").await.unwrap();
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn test_server_error_after_retries() {
        let base = spawn_server(|_| (503, "{}")).await;
        let client = FirestoreClient::new(settings(&base), fast_config(2)).unwrap();

        let err = client.fetch_collection("socios").await.unwrap_err();
        assert!(matches!(err, StoreError::ServerError { status: 503 }));
    }

    #[tokio::test]
    async fn test_unsupported_value_fails_fetch() {
        let base = spawn_server(|_| {
            (
                200,
                r#"{"documents": [{"name": "x/socios/A", "fields": {"alta": {"timestampValue": "2025-01-01T00:00:00Z"}}}]}"#,
            )
        })
        .await;
        let client = FirestoreClient::new(settings(&base), fast_config(0)).unwrap();

        let err = client.fetch_collection("socios").await.unwrap_err();
        assert!(matches!(err, StoreError::Document(_)));
    }

    #[tokio::test]
    async fn test_put_document_patches_by_id() {
        let base = spawn_server(|line| {
            if line.starts_with("PATCH ") && line.contains("/documents/socios/12345678A ") {
                (200, "{}")
            } else {
                (400, "{}")
            }
        })
        .await;
        let client = FirestoreClient::new(settings(&base), fast_config(0)).unwrap();
        let document = Document::new(
            "12345678A",
            canteras_types::Record::new().with("Nombre", "Ana"),
        )
        .unwrap();

        client.put_document("socios", &document).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_document() {
        let base = spawn_server(|line| {
            if line.starts_with("DELETE ") && line.contains("/documents/socios/") {
                (200, "{}")
            } else {
                (400, "{}")
            }
        })
        .await;
        let client = FirestoreClient::new(settings(&base), fast_config(0)).unwrap();

        client.delete_document("socios", "12345678A").await.unwrap();
    }

    #[tokio::test]
    async fn test_write_rejected_by_server() {
        let base = spawn_server(|_| (403, "{}")).await;
        let client = FirestoreClient::new(settings(&base), fast_config(0)).unwrap();

        let err = client.delete_document("socios", "12345678A").await.unwrap_err();
        assert!(matches!(err, StoreError::ServerError { status: 403 }));
    }
}
