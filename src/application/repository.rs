//! Content repository client.
//!
//! Composes the cache, the gateway, the decoder and the frontmatter parser
//! into the operations pages call: list blogs, list inspirations, fetch one
//! blog post, plus lookup and search built on the listings.

use std::sync::Arc;

use insightarc_api_types::{BlogContent, ContentFile, ContentItem};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    cache::{LocalCache, content_key, list_key},
    domain::{
        content::{ContentKind, ContentSource, ContentSources},
        decode::decode_base64_utf8,
        frontmatter::parse_frontmatter,
        search::{SearchResult, normalize_query, search_items},
    },
    infra::github::{ContentGateway, MediaType},
};

use super::{
    error::{ContentError, FetchFailure},
    inflight::InFlight,
};

/// Search matches across both listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    pub blog: SearchResult,
    pub inspiration: SearchResult,
}

/// Shape of a `metadata.json` response.
///
/// The raw media type usually yields the listing itself, but the API may
/// still answer with the base64 file wrapper.
#[derive(Debug)]
enum ListingPayload {
    Inline(Vec<ContentItem>),
    Encoded(String),
}

impl ListingPayload {
    fn classify(payload: Value) -> Result<Self, FetchFailure> {
        match payload {
            Value::Array(_) => Ok(Self::Inline(serde_json::from_value(payload)?)),
            Value::Object(mut fields) => match fields.remove("content") {
                Some(Value::String(content)) => Ok(Self::Encoded(content)),
                _ => Err(FetchFailure::Shape),
            },
            _ => Err(FetchFailure::Shape),
        }
    }

    fn into_items(self) -> Result<Vec<ContentItem>, FetchFailure> {
        match self {
            Self::Inline(items) => Ok(items),
            Self::Encoded(content) => {
                let text = decode_base64_utf8(&content)?;
                Ok(serde_json::from_str(&text)?)
            }
        }
    }
}

pub struct ContentRepository {
    gateway: Arc<dyn ContentGateway>,
    cache: Arc<LocalCache>,
    sources: ContentSources,
    lists: InFlight<Vec<ContentItem>, ContentError>,
    documents: InFlight<BlogContent, ContentError>,
}

impl ContentRepository {
    pub fn new(
        gateway: Arc<dyn ContentGateway>,
        cache: Arc<LocalCache>,
        sources: ContentSources,
    ) -> Self {
        Self {
            gateway,
            cache,
            sources,
            lists: InFlight::new(),
            documents: InFlight::new(),
        }
    }

    pub async fn list_blogs(&self, use_cache: bool) -> Result<Vec<ContentItem>, ContentError> {
        self.list(ContentKind::Blog, use_cache).await
    }

    pub async fn list_inspirations(
        &self,
        use_cache: bool,
    ) -> Result<Vec<ContentItem>, ContentError> {
        self.list(ContentKind::Inspiration, use_cache).await
    }

    /// Listing of `kind` from its `metadata.json`.
    ///
    /// With `use_cache` a fresh cached copy is returned as is and a network
    /// result is written back; without it the cache is neither read nor written.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        kind: ContentKind,
        use_cache: bool,
    ) -> Result<Vec<ContentItem>, ContentError> {
        let key = list_key(kind);
        let source = self.sources.get(kind).clone();

        if use_cache {
            if let Some(items) = self.cache.get::<Vec<ContentItem>>(key, source.cache_expire_hours) {
                return Ok(items);
            }
        }

        let gateway = Arc::clone(&self.gateway);
        let cache = Arc::clone(&self.cache);
        self.lists
            .run(key, move || async move {
                let items = fetch_listing(gateway.as_ref(), &source)
                    .await
                    .map_err(|failure| ContentError::ListFetch {
                        kind,
                        source: failure,
                    })?;
                info!(
                    target = "insightarc::repository",
                    kind = %kind,
                    items = items.len(),
                    "Fetched content listing"
                );
                if use_cache {
                    cache.save(key, &items);
                }
                Ok(items)
            })
            .await
    }

    /// Frontmatter and body of the blog post `file_name` (with or without `.md`).
    #[instrument(skip(self))]
    pub async fn blog_content(
        &self,
        file_name: &str,
        use_cache: bool,
    ) -> Result<BlogContent, ContentError> {
        let key = content_key(file_name);
        let source = self.sources.blog.clone();

        if use_cache {
            if let Some(content) = self.cache.get::<BlogContent>(&key, source.cache_expire_hours) {
                return Ok(content);
            }
        }

        let gateway = Arc::clone(&self.gateway);
        let cache = Arc::clone(&self.cache);
        let file_name = file_name.to_string();
        let cache_key = key.clone();
        self.documents
            .run(&key, move || async move {
                let content = fetch_document(gateway.as_ref(), &source, &file_name)
                    .await
                    .map_err(|failure| ContentError::ContentFetch {
                        file_name: file_name.clone(),
                        source: failure,
                    })?;
                debug!(
                    target = "insightarc::repository",
                    file_name = %file_name,
                    meta_keys = content.meta.len(),
                    "Fetched blog content"
                );
                if use_cache {
                    cache.save(&cache_key, &content);
                }
                Ok(content)
            })
            .await
    }

    /// Blog listing entry with the given `id`, read past the cache.
    pub async fn find_blog(&self, id: &str) -> Result<Option<ContentItem>, ContentError> {
        let items = self.list_blogs(false).await?;
        Ok(items.into_iter().find(|item| item.id == id))
    }

    /// Substring search over both listings. A blank query matches nothing and
    /// fetches nothing.
    pub async fn search(&self, query: &str, use_cache: bool) -> Result<SearchReport, ContentError> {
        if normalize_query(query).is_none() {
            return Ok(SearchReport::default());
        }

        let (blogs, inspirations) = tokio::try_join!(
            self.list(ContentKind::Blog, use_cache),
            self.list(ContentKind::Inspiration, use_cache),
        )?;

        Ok(SearchReport {
            blog: search_items(query, &blogs),
            inspiration: search_items(query, &inspirations),
        })
    }
}

async fn fetch_listing(
    gateway: &dyn ContentGateway,
    source: &ContentSource,
) -> Result<Vec<ContentItem>, FetchFailure> {
    let payload = gateway
        .fetch_json(&source.metadata_path(), MediaType::Raw)
        .await?;
    ListingPayload::classify(payload)?.into_items()
}

async fn fetch_document(
    gateway: &dyn ContentGateway,
    source: &ContentSource,
    file_name: &str,
) -> Result<BlogContent, FetchFailure> {
    let payload = gateway
        .fetch_json(&source.markdown_path(file_name), MediaType::Json)
        .await?;
    let file: ContentFile = serde_json::from_value(payload)?;
    let text = decode_base64_utf8(&file.content)?;
    Ok(parse_frontmatter(&text).into())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde_json::json;

    use super::*;
    use crate::{
        cache::{ManualClock, MemoryStore},
        infra::github::GatewayError,
    };

    /// Gateway answering every request with one canned payload.
    struct ScriptedGateway {
        reply: Result<Value, GatewayError>,
        calls: Mutex<Vec<(String, MediaType)>>,
    }

    impl ScriptedGateway {
        fn new(reply: Result<Value, GatewayError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, MediaType)> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl ContentGateway for ScriptedGateway {
        async fn fetch_json(&self, path: &str, accept: MediaType) -> Result<Value, GatewayError> {
            self.calls
                .lock()
                .expect("calls lock")
                .push((path.to_string(), accept));
            self.reply.clone()
        }
    }

    fn repository(gateway: Arc<ScriptedGateway>) -> ContentRepository {
        let cache = LocalCache::with_clock(
            Arc::new(MemoryStore::new()),
            Arc::new(ManualClock::at(1_000)),
        );
        ContentRepository::new(
            gateway,
            Arc::new(cache),
            ContentSources {
                blog: ContentSource::new("blogs", 1.0),
                inspiration: ContentSource::new("inspirations/", 2.0),
            },
        )
    }

    #[test]
    fn classify_accepts_array_and_wrapper() {
        let inline = ListingPayload::classify(json!([{"id": "a"}])).expect("array");
        assert!(matches!(inline, ListingPayload::Inline(ref items) if items.len() == 1));

        let encoded = ListingPayload::classify(json!({"content": "W10=", "sha": "x"}))
            .expect("wrapper");
        assert!(matches!(encoded, ListingPayload::Encoded(ref content) if content == "W10="));
        assert!(encoded.into_items().expect("decode").is_empty());
    }

    #[test]
    fn classify_rejects_other_shapes() {
        for payload in [
            json!({"message": "Not Found"}),
            json!({"content": 42}),
            json!("text"),
            json!(null),
        ] {
            assert_eq!(
                ListingPayload::classify(payload).expect_err("shape"),
                FetchFailure::Shape
            );
        }
    }

    #[test]
    fn array_of_wrong_items_is_a_json_failure() {
        let err = ListingPayload::classify(json!([{"title": "no id"}])).expect_err("json");
        assert!(matches!(err, FetchFailure::Json(_)));
    }

    #[tokio::test]
    async fn listings_request_raw_metadata_for_each_kind() {
        let gateway = ScriptedGateway::new(Ok(json!([])));
        let repository = repository(Arc::clone(&gateway));

        repository.list_blogs(false).await.expect("blogs");
        repository.list_inspirations(false).await.expect("inspirations");

        assert_eq!(
            gateway.calls(),
            vec![
                ("blogs/metadata.json".to_string(), MediaType::Raw),
                ("inspirations/metadata.json".to_string(), MediaType::Raw),
            ]
        );
    }

    #[tokio::test]
    async fn blog_content_requests_wrapped_markdown() {
        let document = STANDARD.encode("---\na: 1\n---\nbody");
        let gateway = ScriptedGateway::new(Ok(json!({ "content": document })));
        let repository = repository(Arc::clone(&gateway));

        let content = repository.blog_content("post.md", false).await.expect("content");
        assert_eq!(content.meta.get("a").map(String::as_str), Some("1"));
        assert_eq!(content.content, "body");
        assert_eq!(
            gateway.calls(),
            vec![("blogs/post.md".to_string(), MediaType::Json)]
        );
    }

    #[tokio::test]
    async fn gateway_failure_is_tagged_with_operation() {
        let status = GatewayError::Status {
            path: "blogs/metadata.json".into(),
            status: 500,
            status_text: "Internal Server Error".into(),
        };
        let repository = repository(ScriptedGateway::new(Err(status.clone())));

        let err = repository.list_blogs(true).await.expect_err("status");
        assert_eq!(
            err,
            ContentError::ListFetch {
                kind: ContentKind::Blog,
                source: FetchFailure::Gateway(status),
            }
        );
        assert_eq!(repository.lists.pending(), 0);
    }

    #[tokio::test]
    async fn content_without_string_field_fails() {
        let repository = repository(ScriptedGateway::new(Ok(json!({"sha": "x"}))));

        let err = repository.blog_content("post", true).await.expect_err("missing");
        assert!(matches!(
            err,
            ContentError::ContentFetch { ref file_name, source: FetchFailure::Json(_) }
                if file_name == "post"
        ));
    }
}
