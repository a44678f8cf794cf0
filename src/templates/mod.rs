//! Embedded page templates rendered with Tera
//!
//! All templates are compiled into the binary; there is no theme directory
//! to resolve at runtime.

use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{estimate_minutes_at, richtext, Post, PostDetail};
use crate::error::Result;
use crate::helpers::display_date_opt;

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescaping is off: view fields are escaped when the views are
        // built, and section bodies are pre-rendered trusted HTML (see
        // `richtext::as_html`).
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("spacetraveling/layout.html")),
            ("index.html", include_str!("spacetraveling/index.html")),
            ("post.html", include_str!("spacetraveling/post.html")),
            ("loading.html", include_str!("spacetraveling/loading.html")),
            (
                "partials/header.html",
                include_str!("spacetraveling/partials/header.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render the listing page
    pub fn render_index(
        &self,
        config: &SiteConfig,
        posts: &[Post],
        has_more: bool,
    ) -> Result<String> {
        let views: Vec<PostView> = posts.iter().map(PostView::from_post).collect();

        let mut context = Context::new();
        context.insert("site_title", &richtext::html_escape(&config.title));
        context.insert("posts", &views);
        context.insert("has_more", &has_more);

        Ok(self.tera.render("index.html", &context)?)
    }

    /// Render a post page
    pub fn render_post(&self, config: &SiteConfig, detail: &PostDetail) -> Result<String> {
        let view = PostDetailView::from_detail(detail, config.words_per_minute);

        let mut context = Context::new();
        context.insert("site_title", &richtext::html_escape(&config.title));
        context.insert("post", &view);

        Ok(self.tera.render("post.html", &context)?)
    }

    /// Render the loading/not-found placeholder
    pub fn render_loading(&self, config: &SiteConfig) -> Result<String> {
        let mut context = Context::new();
        context.insert("site_title", &richtext::html_escape(&config.title));

        Ok(self.tera.render("loading.html", &context)?)
    }
}

/// Listing entry as seen by templates; text fields pre-escaped
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub uid: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
}

impl PostView {
    pub fn from_post(post: &Post) -> Self {
        Self {
            uid: richtext::html_escape(&post.uid),
            title: richtext::html_escape(&post.title),
            subtitle: richtext::html_escape(&post.subtitle),
            author: richtext::html_escape(&post.author),
            date: display_date_opt(post.first_publication_date.as_ref()),
        }
    }
}

/// One body section: escaped heading plus trusted pre-rendered HTML
#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub heading: String,
    pub body_html: String,
}

/// Post page as seen by templates
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailView {
    pub title: String,
    pub author: String,
    pub date: String,
    pub banner_url: String,
    pub reading_minutes: usize,
    pub sections: Vec<SectionView>,
}

impl PostDetailView {
    pub fn from_detail(detail: &PostDetail, words_per_minute: usize) -> Self {
        let sections = detail
            .content
            .iter()
            .map(|section| SectionView {
                heading: richtext::html_escape(&section.heading),
                body_html: richtext::as_html(&section.body),
            })
            .collect();

        Self {
            title: richtext::html_escape(&detail.title),
            author: richtext::html_escape(&detail.author),
            date: display_date_opt(detail.first_publication_date.as_ref()),
            banner_url: richtext::html_escape(&detail.banner_url),
            reading_minutes: estimate_minutes_at(&detail.content, words_per_minute),
            sections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::richtext::{Block, TextNode};
    use crate::content::ContentBlock;
    use chrono::TimeZone;

    fn config() -> SiteConfig {
        SiteConfig {
            api_endpoint: "https://repo.example.com".to_string(),
            ..Default::default()
        }
    }

    fn sample_post(uid: &str) -> Post {
        Post {
            uid: uid.to_string(),
            first_publication_date: Some(
                chrono::Utc.with_ymd_and_hms(2021, 3, 15, 19, 25, 28).unwrap(),
            ),
            title: "Creating a CRA app".to_string(),
            subtitle: "All about it".to_string(),
            author: "Joseph Oliveira".to_string(),
        }
    }

    #[test]
    fn test_render_index_lists_posts() {
        let renderer = TemplateRenderer::new().unwrap();
        let posts = vec![sample_post("first"), sample_post("second")];

        let html = renderer.render_index(&config(), &posts, true).unwrap();
        assert!(html.contains(r#"href="/post/first""#));
        assert!(html.contains(r#"href="/post/second""#));
        assert!(html.contains("15 mar 2021"));
        assert!(html.contains("Carregar mais posts"));
    }

    #[test]
    fn test_render_index_escapes_uid_in_href() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut post = sample_post("odd");
        post.uid = r#"odd"slug"#.to_string();

        let html = renderer.render_index(&config(), &[post], false).unwrap();
        assert!(html.contains(r#"href="/post/odd&quot;slug""#));
        assert!(!html.contains(r#"/post/odd"slug"#));
    }

    #[test]
    fn test_render_index_exhausted_hides_pagination() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_index(&config(), &[sample_post("only")], false)
            .unwrap();
        assert!(!html.contains("Carregar mais posts"));
    }

    #[test]
    fn test_render_post_page() {
        let renderer = TemplateRenderer::new().unwrap();
        let detail = PostDetail {
            uid: "cra".to_string(),
            first_publication_date: None,
            title: "Title <script>".to_string(),
            author: "Ana".to_string(),
            banner_url: "https://images.example.com/banner.png".to_string(),
            content: vec![ContentBlock {
                heading: "Section one".to_string(),
                body: vec![Block::Paragraph(TextNode {
                    text: "Some body text.".to_string(),
                    spans: Vec::new(),
                })],
            }],
        };

        let html = renderer.render_post(&config(), &detail).unwrap();
        // titles are escaped, body HTML comes through as markup
        assert!(html.contains("Title &lt;script&gt;"));
        assert!(html.contains("<p>Some body text.</p>"));
        assert!(html.contains("1 min"));
        assert!(html.contains(r#"src="https://images.example.com/banner.png""#));
    }

    #[test]
    fn test_render_loading_placeholder() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render_loading(&config()).unwrap();
        assert!(html.contains("Carregando..."));
    }
}
