//! Display projections of content API documents
//!
//! Raw [`Document`]s never reach the templates; these constructors project
//! them down to the fields the pages actually display, and turn absent
//! fields into typed errors instead of panics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Document;
use crate::content::richtext::Block;
use crate::error::{Error, Result};

/// A post as shown on the listing page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub uid: String,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl Post {
    /// Project a raw document into the listing shape
    pub fn from_document(doc: &Document) -> Result<Self> {
        Ok(Self {
            uid: doc.uid.clone().ok_or(Error::MissingField("uid"))?,
            first_publication_date: doc.first_publication_date,
            title: string_field(doc, "title", "data.title")?,
            subtitle: string_field(doc, "subtitle", "data.subtitle")?,
            author: string_field(doc, "author", "data.author")?,
        })
    }
}

/// One section of a post body: a heading followed by rich text
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub body: Vec<Block>,
}

/// A post as shown on its own page
#[derive(Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub uid: String,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub author: String,
    pub banner_url: String,
    /// Sections in source order; rendering must not reorder them
    pub content: Vec<ContentBlock>,
}

impl PostDetail {
    /// Project a raw document into the detail shape
    pub fn from_document(doc: &Document) -> Result<Self> {
        let banner_url = doc
            .data
            .get("banner")
            .and_then(|b| b.get("url"))
            .and_then(|u| u.as_str())
            .ok_or(Error::MissingField("data.banner.url"))?
            .to_string();

        let content = doc
            .data
            .get("content")
            .ok_or(Error::MissingField("data.content"))?;
        let content: Vec<ContentBlock> = serde_json::from_value(content.clone())
            .map_err(|_| Error::MissingField("data.content"))?;

        Ok(Self {
            uid: doc.uid.clone().ok_or(Error::MissingField("uid"))?,
            first_publication_date: doc.first_publication_date,
            title: string_field(doc, "title", "data.title")?,
            author: string_field(doc, "author", "data.author")?,
            banner_url,
            content,
        })
    }
}

fn string_field(doc: &Document, key: &str, path: &'static str) -> Result<String> {
    doc.data
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or(Error::MissingField(path))
}
