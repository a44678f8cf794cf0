//! Listing feed: accumulated posts plus the active pagination cursor
//!
//! The feed is single-writer state. `&mut self` keeps overlapping loads out
//! at the type level; the server additionally holds it behind a mutex so a
//! "load more" trigger cannot interleave with another one.

use crate::client::{ContentApi, Ordering, PageCursor, PagedResponse, QueryOptions};
use crate::config::SiteConfig;
use crate::content::Post;
use crate::error::Result;

/// Accumulated listing state
#[derive(Debug)]
pub struct PostFeed {
    doc_type: String,
    page_size: usize,
    posts: Vec<Post>,
    next: Option<PageCursor>,
    pages_loaded: usize,
}

impl PostFeed {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            doc_type: config.document_type.clone(),
            page_size: config.page_size,
            posts: Vec::new(),
            next: None,
            pages_loaded: 0,
        }
    }

    /// Posts accumulated so far, in arrival order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Whether another page can still be loaded
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Number of pages fetched so far (0 before the first load)
    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    /// Fetch page 1: the most recent posts, newest first.
    ///
    /// Replaces any previously accumulated state.
    pub async fn load_initial<C: ContentApi>(&mut self, api: &C) -> Result<()> {
        let options = QueryOptions {
            page_size: self.page_size,
            orderings: Some(Ordering::newest_first()),
        };
        let response = api.get_by_type(&self.doc_type, &options).await?;
        let posts = normalize(&response)?;

        self.next = response.next_cursor();
        self.posts = posts;
        self.pages_loaded = 1;
        tracing::debug!(
            "Loaded initial page: {} posts, more = {}",
            self.posts.len(),
            self.has_more()
        );
        Ok(())
    }

    /// Fetch the next page and append it.
    ///
    /// Returns `Ok(false)` without any fetch when pagination is exhausted.
    /// On error the accumulated posts and the cursor are left unchanged, so
    /// the caller can retry.
    pub async fn load_more<C: ContentApi>(&mut self, api: &C) -> Result<bool> {
        let Some(cursor) = self.next.clone() else {
            return Ok(false);
        };

        let response = api.fetch_page(&cursor).await?;
        let batch = normalize(&response)?;

        self.next = response.next_cursor();
        self.posts.extend(batch);
        self.pages_loaded += 1;
        tracing::debug!(
            "Appended page {}: {} posts total, more = {}",
            self.pages_loaded,
            self.posts.len(),
            self.has_more()
        );
        Ok(true)
    }
}

fn normalize(response: &PagedResponse) -> Result<Vec<Post>> {
    response.results.iter().map(Post::from_document).collect()
}
