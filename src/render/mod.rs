//! Listing renderer module
//!
//! Turns the record store into the HTML page served at `/read`. Templates
//! are plain HTML with `{{ name }}` placeholders; the renderer is handed its
//! template source at construction so tests can swap in an in-memory one.
//!
//! Supported placeholders:
//! - `{{ messages }}` - the store rendered as an HTML list, oldest first
//! - `{{ count }}` - number of stored records

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::store::{Record, Records};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template {0:?} not found")]
    TemplateNotFound(String),
    #[error("failed to read template {name:?}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Where templates come from
pub trait TemplateSource: Send + Sync {
    fn load(&self, name: &str) -> Result<String, RenderError>;
}

/// Templates read from files under a directory, on every render
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    root: PathBuf,
}

impl FileTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TemplateSource for FileTemplateSource {
    fn load(&self, name: &str) -> Result<String, RenderError> {
        std::fs::read_to_string(self.root.join(name)).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                RenderError::TemplateNotFound(name.to_string())
            } else {
                RenderError::Io {
                    name: name.to_string(),
                    source: e,
                }
            }
        })
    }
}

/// Templates held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateSource {
    templates: HashMap<String, String>,
}

impl InMemoryTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_template(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.templates.insert(name.into(), body.into());
        self
    }
}

impl TemplateSource for InMemoryTemplateSource {
    fn load(&self, name: &str) -> Result<String, RenderError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::TemplateNotFound(name.to_string()))
    }
}

/// Renders the store into the listing page
#[derive(Clone)]
pub struct ListingRenderer {
    source: Arc<dyn TemplateSource>,
    template: String,
}

impl ListingRenderer {
    pub fn new(source: Arc<dyn TemplateSource>, template: impl Into<String>) -> Self {
        Self {
            source,
            template: template.into(),
        }
    }

    /// Render `messages` into the listing template
    ///
    /// Output depends only on the template text and `messages`.
    pub fn render(&self, messages: &Records) -> Result<String, RenderError> {
        let template = self.source.load(&self.template)?;
        Ok(substitute(&template, |name| match name {
            "messages" => Some(render_messages(messages)),
            "count" => Some(messages.len().to_string()),
            _ => None,
        }))
    }
}

/// Replace `{{ name }}` placeholders; unknown names are left as written
fn substitute(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        let end = start + 2 + len + 2;
        out.push_str(&rest[..start]);
        match lookup(rest[start + 2..end - 2].trim()) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..end]),
        }
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}

fn render_messages(messages: &Records) -> String {
    if messages.is_empty() {
        return "<p class=\"empty\">No messages yet.</p>".to_string();
    }

    let mut html = String::from("<ul class=\"messages\">\n");
    for (key, record) in messages {
        html.push_str("  <li>\n");
        html.push_str(&format!(
            "    <span class=\"timestamp\">{}</span>\n",
            escape_html(key)
        ));
        html.push_str(&render_record(record));
        html.push_str("  </li>\n");
    }
    html.push_str("</ul>");
    html
}

fn render_record(record: &Record) -> String {
    let mut html = String::from("    <dl>\n");
    for (field, value) in record {
        html.push_str(&format!(
            "      <dt>{}</dt><dd>{}</dd>\n",
            escape_html(field),
            escape_html(value)
        ));
    }
    html.push_str("    </dl>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
