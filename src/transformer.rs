use crate::body::{BodyKind, Source};
use crate::detect::{is_module_file, source_path};
use crate::engine::{CssEngine, LightningCss, TransformInput};
use crate::error::{BoxError, Error, TransformError};
use crate::options::CssOptions;
use bytes::Bytes;
use http_body::Body;
use http_body_util::BodyExt;

/// Outcome of [`CssTransformer::rewrite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// The body was absent; the response should be left alone.
    Skipped,
    /// The body was transformed. `None` means the engine produced no output.
    Replaced(Option<Bytes>),
}

/// Transforms stylesheets served for a request path.
///
/// This is the framework-independent core of
/// [`CssTransformService`](crate::CssTransformService). It derives the source
/// filename and the CSS modules flag from the request path and forwards
/// everything else from [`CssOptions`] to the engine.
#[derive(Debug, Clone)]
pub struct CssTransformer<E = LightningCss> {
    options: CssOptions,
    engine: E,
}

impl CssTransformer<LightningCss> {
    /// Creates a transformer backed by Lightning CSS.
    pub fn new(options: CssOptions) -> Self {
        Self::with_engine(options, LightningCss::new())
    }
}

impl<E> CssTransformer<E> {
    /// Creates a transformer backed by `engine`.
    pub fn with_engine(options: CssOptions, engine: E) -> Self {
        Self { options, engine }
    }

    /// Returns the configuration.
    pub fn options(&self) -> &CssOptions {
        &self.options
    }

    /// Returns the engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: CssEngine> CssTransformer<E> {
    /// Transforms `code` served for `request_path`.
    pub fn transform_source(
        &self,
        request_path: &str,
        code: &[u8],
    ) -> Result<Option<Bytes>, TransformError> {
        let transform = self.options.transform();
        let filename = source_path(self.options.root(), request_path);
        let filename = filename.to_string_lossy();
        let css_modules = is_module_file(request_path) && !transform.css_modules_disabled();

        let result = self.engine.transform(TransformInput {
            code,
            filename: &filename,
            project_root: self.options.project_root(),
            css_modules,
            options: transform,
        });

        match &result {
            Ok(output) => tracing::debug!(
                path = request_path,
                filename = %filename,
                css_modules,
                input_len = code.len(),
                output_len = output.as_ref().map(Bytes::len),
                "transformed stylesheet"
            ),
            Err(error) => tracing::debug!(
                path = request_path,
                filename = %filename,
                %error,
                "stylesheet transform failed"
            ),
        }

        result
    }

    /// Transforms a response body of any shape served for `request_path`.
    ///
    /// Streaming bodies are drained first. An absent body is not transformed.
    pub async fn rewrite<B>(&self, request_path: &str, body: BodyKind<B>) -> Result<Rewrite, Error>
    where
        B: Body,
        B::Error: Into<BoxError>,
    {
        let code = match body.into_source() {
            Source::Absent => {
                tracing::trace!(path = request_path, "no body to transform");
                return Ok(Rewrite::Skipped);
            }
            Source::Ready(code) => code,
            Source::Drain(body) => body
                .collect()
                .await
                .map_err(|e| Error::Body(e.into()))?
                .to_bytes(),
        };

        let output = self.transform_source(request_path, &code)?;
        Ok(Rewrite::Replaced(output))
    }
}
