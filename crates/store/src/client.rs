use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use vidshelf_core::error::StoreError;
use vidshelf_core::model::{Category, HistoryEntry, NewCategory, Video};
use vidshelf_core::store::RemoteStore;

const VIDEOS: &str = "videos";
const CATEGORIES: &str = "categories";
const HISTORY: &str = "history";

/// Errors from the HTTP layer, before they are mapped to [`StoreError`].
#[derive(Debug, thiserror::Error)]
pub enum HttpStoreError {
    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Document server error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

impl HttpStoreError {
    /// Map to the store contract. `entity`/`id` name the document the call
    /// addressed, so a 404 becomes [`StoreError::NotFound`].
    fn into_store_error(self, entity: &'static str, id: Option<&str>) -> StoreError {
        match self {
            HttpStoreError::ApiError { status: 404, .. } => StoreError::NotFound {
                entity,
                id: id.unwrap_or_default().to_string(),
            },
            HttpStoreError::ApiError { status, body } => StoreError::Rejected { status, body },
            HttpStoreError::Request(err) if err.is_decode() => StoreError::Decode(err.to_string()),
            HttpStoreError::Request(err) => StoreError::Unavailable(err.to_string()),
        }
    }
}

/// [`RemoteStore`] backed by a JSON document server.
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    /// * `base_url` - server root, e.g. `http://localhost:4000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{collection}", self.base_url)
    }

    /// Ids are user text, so they go in as one escaped path segment.
    ///
    /// An unparsable `base_url` is left as-is; sending to it then fails as
    /// a request error.
    fn document_url(&self, collection: &str, id: &str) -> String {
        let mut url = match reqwest::Url::parse(&self.collection_url(collection)) {
            Ok(url) => url,
            Err(_) => return format!("{}/{collection}/{id}", self.base_url),
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url.into()
    }

    // ---- request helpers ----

    async fn get<T: DeserializeOwned>(
        &self,
        url: String,
        entity: &'static str,
        id: Option<&str>,
    ) -> Result<T, StoreError> {
        tracing::trace!(%url, "GET");
        self.try_get(&url)
            .await
            .map_err(|e| e.into_store_error(entity, id))
    }

    async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        body: &B,
        entity: &'static str,
        id: Option<&str>,
    ) -> Result<T, StoreError> {
        Self::try_send(request, body)
            .await
            .map_err(|e| e.into_store_error(entity, id))
    }

    async fn delete(&self, url: String, entity: &'static str, id: &str) -> Result<(), StoreError> {
        tracing::trace!(%url, "DELETE");
        self.try_delete(&url)
            .await
            .map_err(|e| e.into_store_error(entity, Some(id)))
    }

    async fn try_get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpStoreError> {
        let response = self.client.get(url).send().await?;
        Self::parse_response(response).await
    }

    async fn try_send<B: Serialize + ?Sized, T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
        body: &B,
    ) -> Result<T, HttpStoreError> {
        let response = request.json(body).send().await?;
        Self::parse_response(response).await
    }

    async fn try_delete(&self, url: &str) -> Result<(), HttpStoreError> {
        let response = self.client.delete(url).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Return the response unchanged on 2xx, otherwise an
    /// [`HttpStoreError::ApiError`] carrying the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, HttpStoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(HttpStoreError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, HttpStoreError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Body sent when creating a category: the name plus an empty member list.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryDocument<'a> {
    category_name: &'a str,
    all_videos: &'a [Video],
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.get(self.collection_url(CATEGORIES), "Category", None)
            .await
    }

    async fn get_category(&self, id: &str) -> Result<Category, StoreError> {
        self.get(self.document_url(CATEGORIES, id), "Category", Some(id))
            .await
    }

    async fn update_category(&self, id: &str, category: &Category) -> Result<(), StoreError> {
        let url = self.document_url(CATEGORIES, id);
        tracing::trace!(%url, members = category.all_videos.len(), "PUT");
        let _: serde_json::Value = self
            .send(self.client.put(&url), category, "Category", Some(id))
            .await?;
        Ok(())
    }

    async fn get_video(&self, id: &str) -> Result<Video, StoreError> {
        self.get(self.document_url(VIDEOS, id), "Video", Some(id))
            .await
    }

    async fn list_videos(&self) -> Result<Vec<Video>, StoreError> {
        self.get(self.collection_url(VIDEOS), "Video", None).await
    }

    async fn append_history(&self, entry: &HistoryEntry) -> Result<HistoryEntry, StoreError> {
        let url = self.collection_url(HISTORY);
        self.send(self.client.post(&url), entry, "HistoryEntry", None)
            .await
    }

    async fn create_video(&self, video: &Video) -> Result<Video, StoreError> {
        let url = self.collection_url(VIDEOS);
        self.send(self.client.post(&url), video, "Video", Some(video.id.as_str()))
            .await
    }

    async fn delete_video(&self, id: &str) -> Result<(), StoreError> {
        self.delete(self.document_url(VIDEOS, id), "Video", id).await
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category, StoreError> {
        let url = self.collection_url(CATEGORIES);
        let body = CategoryDocument {
            category_name: &category.category_name,
            all_videos: &[],
        };
        self.send(self.client.post(&url), &body, "Category", None)
            .await
    }

    async fn delete_category(&self, id: &str) -> Result<(), StoreError> {
        self.delete(self.document_url(CATEGORIES, id), "Category", id)
            .await
    }

    async fn list_history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        self.get(self.collection_url(HISTORY), "HistoryEntry", None)
            .await
    }
}
