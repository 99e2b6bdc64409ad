//! Provider seam for the pipeline stages.
//!
//! Each stage acquires its provider connections through a
//! [`ProviderFactory`] and releases them before returning, so provider
//! lifetime is scoped to the stage that uses it.  Tests substitute
//! scripted implementations.

use std::sync::Arc;

use genui_cloud::BlobStore;
use genui_llm::providers::image::ImagenProvider;
use genui_llm::{CompletionError, CompletionProvider, ImageProvider};

/// Creates the external capability clients a run needs.
pub trait ProviderFactory: Send + Sync {
    /// A completion provider bound to `model`.
    fn completion(&self, model: &str) -> Result<Box<dyn CompletionProvider>, CompletionError>;

    /// The image-generation provider for embedded image requests.
    fn image(&self) -> Box<dyn ImageProvider>;

    /// The blob store image uploads go to.
    fn blob_store(&self) -> Arc<dyn BlobStore>;
}

/// Production factory: registry-backed completion providers, the Imagen
/// binding, and a shared blob store built at startup.
pub struct LiveProviders {
    blob: Arc<dyn BlobStore>,
}

impl LiveProviders {
    pub fn new(blob: Arc<dyn BlobStore>) -> Self {
        Self { blob }
    }
}

impl ProviderFactory for LiveProviders {
    fn completion(&self, model: &str) -> Result<Box<dyn CompletionProvider>, CompletionError> {
        genui_llm::factory::create_provider(model)
    }

    fn image(&self) -> Box<dyn ImageProvider> {
        Box::new(ImagenProvider::from_env())
    }

    fn blob_store(&self) -> Arc<dyn BlobStore> {
        Arc::clone(&self.blob)
    }
}
