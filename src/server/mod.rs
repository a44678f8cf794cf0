//! HTTP server with interval-based listing revalidation

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tower_http::trace::TraceLayer;

use crate::client::{ContentApi, ContentClient};
use crate::config::SiteConfig;
use crate::content::PostDetail;
use crate::error::Error;
use crate::feed::PostFeed;
use crate::templates::TemplateRenderer;

/// Shared server state
struct AppState {
    config: SiteConfig,
    client: ContentClient,
    renderer: TemplateRenderer,
    /// Accumulated listing; the mutex serializes "load more" triggers
    feed: Mutex<PostFeed>,
    listing_cache: RwLock<Option<CachedListing>>,
}

struct CachedListing {
    html: String,
    rendered_at: Instant,
}

/// Start the server
pub async fn start(config: SiteConfig, ip: &str, port: u16) -> Result<()> {
    let client = ContentClient::new(&config)?;
    let renderer = TemplateRenderer::new()?;

    let state = Arc::new(AppState {
        feed: Mutex::new(PostFeed::new(&config)),
        config,
        client,
        renderer,
        listing_cache: RwLock::new(None),
    });

    let app = Router::new()
        .route("/", get(listing_handler))
        .route("/post/:slug", get(post_handler))
        .route("/load-more", post(load_more_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Listing page with stale-while-revalidate semantics: a cached copy older
/// than `revalidate_secs` is still served, with the refresh running in the
/// background. Only the very first request blocks on the content API.
async fn listing_handler(State(state): State<Arc<AppState>>) -> Response {
    let max_age = Duration::from_secs(state.config.revalidate_secs);

    let stale = {
        let cache = state.listing_cache.read().await;
        match cache.as_ref() {
            Some(c) if c.rendered_at.elapsed() < max_age => {
                return Html(c.html.clone()).into_response();
            }
            Some(c) => Some(c.html.clone()),
            None => None,
        }
    };

    if let Some(html) = stale {
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = refresh_listing(&state).await {
                tracing::warn!("Background listing refresh failed: {}", e);
            }
        });
        return Html(html).into_response();
    }

    match refresh_listing(&state).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Listing unavailable: {}", e);
            (StatusCode::BAD_GATEWAY, "content repository unavailable").into_response()
        }
    }
}

/// Re-fetch page 1 and re-render the listing cache.
///
/// Once the feed has been expanded by "load more", the accumulated list is
/// left alone and only the rendering is refreshed; revalidation must not
/// throw away pages the reader asked for.
async fn refresh_listing(state: &Arc<AppState>) -> crate::error::Result<String> {
    let mut feed = state.feed.lock().await;
    if feed.pages_loaded() <= 1 {
        feed.load_initial(&state.client).await?;
    }

    let html = state
        .renderer
        .render_index(&state.config, feed.posts(), feed.has_more())?;

    *state.listing_cache.write().await = Some(CachedListing {
        html: html.clone(),
        rendered_at: Instant::now(),
    });

    Ok(html)
}

/// Post detail page; an unknown slug gets the loading placeholder
async fn post_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    let (status, html) =
        post_page_response(&state.config, &state.renderer, &state.client, &slug).await;
    (status, html).into_response()
}

/// Build the response for a post page request.
///
/// An unknown slug renders the loading placeholder with a 404 status; any
/// other failure maps to 502.
async fn post_page_response<C: ContentApi>(
    config: &SiteConfig,
    renderer: &TemplateRenderer,
    api: &C,
    slug: &str,
) -> (StatusCode, Html<String>) {
    match render_post(config, renderer, api, slug).await {
        Ok(html) => (StatusCode::OK, Html(html)),
        Err(e) if e.is_not_found() => {
            tracing::debug!("No document for slug `{}`", slug);
            match renderer.render_loading(config) {
                Ok(html) => (StatusCode::NOT_FOUND, Html(html)),
                Err(e) => {
                    tracing::error!("Placeholder render failed: {}", e);
                    (StatusCode::NOT_FOUND, Html("not found".to_string()))
                }
            }
        }
        Err(e) => {
            tracing::error!("Post page `{}` failed: {}", slug, e);
            (
                StatusCode::BAD_GATEWAY,
                Html("content repository unavailable".to_string()),
            )
        }
    }
}

async fn render_post<C: ContentApi>(
    config: &SiteConfig,
    renderer: &TemplateRenderer,
    api: &C,
    slug: &str,
) -> Result<String, Error> {
    let doc = api.get_by_uid(&config.document_type, slug).await?;
    let detail = PostDetail::from_document(&doc)?;
    renderer.render_post(config, &detail)
}

/// "Load more" trigger. Holding the feed mutex for the whole fetch-append
/// cycle serializes overlapping triggers; a failed fetch keeps the current
/// list and the button simply remains available as the retry affordance.
async fn load_more_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut feed = state.feed.lock().await;

    if !advance_feed(&mut feed, &state.client).await {
        // nothing loaded yet: leave the cache empty so `GET /` surfaces
        // the failure instead of serving an empty listing as fresh
        return Redirect::to("/").into_response();
    }

    match state
        .renderer
        .render_index(&state.config, feed.posts(), feed.has_more())
    {
        Ok(html) => {
            *state.listing_cache.write().await = Some(CachedListing {
                html,
                rendered_at: Instant::now(),
            });
        }
        Err(e) => tracing::error!("Listing re-render failed: {}", e),
    }

    Redirect::to("/").into_response()
}

/// Advance the feed by one page, whichever page that is.
///
/// Returns whether the listing is worth re-rendering: a failed "load more"
/// keeps the accumulated list (still renderable), while a failed first load
/// leaves nothing to show.
async fn advance_feed<C: ContentApi>(feed: &mut PostFeed, api: &C) -> bool {
    if feed.pages_loaded() == 0 {
        match feed.load_initial(api).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Initial load failed: {}", e);
                false
            }
        }
    } else {
        if let Err(e) = feed.load_more(api).await {
            tracing::warn!("Load more failed, keeping current list: {}", e);
        }
        true
    }
}
