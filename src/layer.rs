use crate::engine::LightningCss;
use crate::options::CssOptions;
use crate::service::CssTransformService;
use crate::transformer::CssTransformer;
use std::sync::Arc;
use tower::Layer;

/// A Tower layer that transforms CSS response bodies.
///
/// Responses whose `Content-Type` is `text/css` or `.css` are run through the
/// configured engine and served as `text/css`. Everything else passes
/// through unchanged.
#[derive(Debug)]
pub struct CssTransformLayer<E = LightningCss> {
    transformer: Arc<CssTransformer<E>>,
}

impl CssTransformLayer<LightningCss> {
    /// Creates a layer that transforms with Lightning CSS.
    pub fn new(options: CssOptions) -> Self {
        Self::with_engine(options, LightningCss::new())
    }
}

impl<E> CssTransformLayer<E> {
    /// Creates a layer that transforms with `engine`.
    pub fn with_engine(options: CssOptions, engine: E) -> Self {
        Self {
            transformer: Arc::new(CssTransformer::with_engine(options, engine)),
        }
    }

    /// Returns the shared transformer.
    pub fn transformer(&self) -> &CssTransformer<E> {
        &self.transformer
    }
}

impl<E> Clone for CssTransformLayer<E> {
    fn clone(&self) -> Self {
        Self {
            transformer: Arc::clone(&self.transformer),
        }
    }
}

impl<S, E> Layer<S> for CssTransformLayer<E> {
    type Service = CssTransformService<S, E>;

    fn layer(&self, inner: S) -> Self::Service {
        CssTransformService::new(inner, Arc::clone(&self.transformer))
    }
}
