// Application state module
// Everything a request handler needs, shared across connections

use std::sync::Arc;

use super::types::Config;
use crate::http::mime::{ContentTypes, ExtensionTable};
use crate::render::{FileTemplateSource, ListingRenderer};
use crate::store::RecordStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: RecordStore,
    pub renderer: ListingRenderer,
    pub content_types: Arc<dyn ContentTypes>,

    /// Whether each request is written to the access log
    pub access_log: bool,
}

impl AppState {
    /// Build state with on-disk templates and the built-in MIME table
    pub fn new(config: &Config) -> Self {
        let renderer = ListingRenderer::new(
            Arc::new(FileTemplateSource::new(&config.site.root)),
            config.site.listing_template.clone(),
        );
        Self::with_parts(
            config,
            RecordStore::new(&config.storage.data_file),
            renderer,
            Arc::new(ExtensionTable),
        )
    }

    /// Build state from explicit collaborators
    pub fn with_parts(
        config: &Config,
        store: RecordStore,
        renderer: ListingRenderer,
        content_types: Arc<dyn ContentTypes>,
    ) -> Self {
        Self {
            config: config.clone(),
            store,
            renderer,
            content_types,
            access_log: config.logging.access_log,
        }
    }
}
