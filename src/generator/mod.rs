//! Generator module - writes the listing and post pages as static HTML

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::client::ContentApi;
use crate::config::SiteConfig;
use crate::content::PostDetail;
use crate::feed::PostFeed;
use crate::templates::TemplateRenderer;

/// Result of a generation run
#[derive(Debug, Default)]
pub struct GenerateSummary {
    pub pages_written: usize,
    pub pages_skipped: usize,
}

/// Static site generator backed by the content API
pub struct Generator<'a, C: ContentApi> {
    config: &'a SiteConfig,
    api: &'a C,
    renderer: TemplateRenderer,
    public_dir: PathBuf,
}

impl<'a, C: ContentApi> Generator<'a, C> {
    /// Create a new generator
    pub fn new(config: &'a SiteConfig, api: &'a C, public_dir: PathBuf) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;

        Ok(Self {
            config,
            api,
            renderer,
            public_dir,
        })
    }

    /// Generate the listing page and a detail page per listed post.
    ///
    /// A post page that fails to build is skipped with a warning; the rest
    /// of the site is still written. A listing failure aborts the run, since
    /// there is nothing to link to.
    pub async fn generate(&self) -> Result<GenerateSummary> {
        fs::create_dir_all(&self.public_dir)?;

        let mut feed = PostFeed::new(self.config);
        feed.load_initial(self.api).await?;

        let index_html = self
            .renderer
            .render_index(self.config, feed.posts(), feed.has_more())?;
        fs::write(self.public_dir.join("index.html"), index_html)?;

        let mut summary = GenerateSummary {
            pages_written: 1,
            pages_skipped: 0,
        };

        for post in feed.posts() {
            match self.generate_post_page(&post.uid).await {
                Ok(()) => summary.pages_written += 1,
                Err(e) => {
                    tracing::warn!("Skipping post page `{}`: {}", post.uid, e);
                    summary.pages_skipped += 1;
                }
            }
        }

        Ok(summary)
    }

    async fn generate_post_page(&self, uid: &str) -> Result<()> {
        let doc = self.api.get_by_uid(&self.config.document_type, uid).await?;
        let detail = PostDetail::from_document(&doc)?;
        let html = self.renderer.render_post(self.config, &detail)?;

        let dir = self.public_dir.join("post").join(uid);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("index.html"), html)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Document, PageCursor, PagedResponse, QueryOptions};
    use crate::error::Error;
    use serde_json::json;

    /// In-memory content repository with one listing page and two documents
    struct StubApi {
        listing: PagedResponse,
        documents: Vec<Document>,
    }

    fn detail_doc(uid: &str, title: &str) -> Document {
        serde_json::from_value(json!({
            "uid": uid,
            "first_publication_date": "2021-03-15T19:25:28Z",
            "data": {
                "title": title,
                "subtitle": "sub",
                "author": "Ana",
                "banner": { "url": "https://images.example.com/b.png" },
                "content": [
                    {
                        "heading": "Heading",
                        "body": [
                            { "type": "paragraph", "text": "Body text.", "spans": [] }
                        ]
                    }
                ]
            }
        }))
        .unwrap()
    }

    impl crate::client::ContentApi for StubApi {
        async fn get_by_type(
            &self,
            _doc_type: &str,
            _options: &QueryOptions,
        ) -> crate::error::Result<PagedResponse> {
            Ok(self.listing.clone())
        }

        async fn get_by_uid(&self, doc_type: &str, uid: &str) -> crate::error::Result<Document> {
            self.documents
                .iter()
                .find(|d| d.uid.as_deref() == Some(uid))
                .cloned()
                .ok_or_else(|| Error::NotFound {
                    doc_type: doc_type.to_string(),
                    uid: uid.to_string(),
                })
        }

        async fn fetch_page(&self, _cursor: &PageCursor) -> crate::error::Result<PagedResponse> {
            Ok(PagedResponse {
                results: Vec::new(),
                next_page: None,
            })
        }
    }

    fn config() -> SiteConfig {
        SiteConfig {
            api_endpoint: "https://repo.example.com".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_generate_writes_listing_and_posts() {
        let api = StubApi {
            listing: PagedResponse {
                results: vec![
                    detail_doc("first-post", "First"),
                    detail_doc("second-post", "Second"),
                ],
                next_page: None,
            },
            documents: vec![
                detail_doc("first-post", "First"),
                detail_doc("second-post", "Second"),
            ],
        };

        let out = tempfile::tempdir().unwrap();
        let config = config();
        let generator = Generator::new(&config, &api, out.path().to_path_buf()).unwrap();
        let summary = generator.generate().await.unwrap();

        assert_eq!(summary.pages_written, 3);
        assert_eq!(summary.pages_skipped, 0);
        assert!(out.path().join("index.html").exists());
        assert!(out.path().join("post/first-post/index.html").exists());
        assert!(out.path().join("post/second-post/index.html").exists());
    }

    #[tokio::test]
    async fn test_broken_post_is_skipped_not_fatal() {
        // the listing names a document the repository cannot resolve
        let api = StubApi {
            listing: PagedResponse {
                results: vec![detail_doc("exists", "Good"), detail_doc("ghost", "Gone")],
                next_page: None,
            },
            documents: vec![detail_doc("exists", "Good")],
        };

        let out = tempfile::tempdir().unwrap();
        let config = config();
        let generator = Generator::new(&config, &api, out.path().to_path_buf()).unwrap();
        let summary = generator.generate().await.unwrap();

        assert_eq!(summary.pages_written, 2);
        assert_eq!(summary.pages_skipped, 1);
        assert!(out.path().join("post/exists/index.html").exists());
        assert!(!out.path().join("post/ghost/index.html").exists());
    }
}
