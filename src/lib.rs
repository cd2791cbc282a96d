//! CSS transform middleware for Tower.
//!
//! This crate provides a Tower layer that runs CSS responses through
//! [Lightning CSS](https://lightningcss.dev/) before they reach the client.
//! Install it outside a static file service.
//!
//! # Example
//!
//! ```ignore
//! use http_css_transform::{CssOptions, CssTransformLayer, TransformOptions};
//! use tower::ServiceBuilder;
//!
//! let options = CssOptions::new("/srv/www")?.transform_options(TransformOptions {
//!     minify: true,
//!     targets: vec![">= 0.25%".into()],
//!     ..TransformOptions::default()
//! });
//!
//! let service = ServiceBuilder::new()
//!     .layer(CssTransformLayer::new(options))
//!     .service(ServeDir::new("/srv/www"));
//! ```
//!
//! # Transform Rules
//!
//! A response is transformed when its `Content-Type` is `text/css` or `.css`
//! (parameters such as `charset` are ignored) and it has a body. Responses
//! with any other type, and CSS responses without a body, pass through
//! unchanged.
//!
//! Requests for `*.module.css` are transformed as CSS modules unless
//! [`TransformOptions::css_modules`] is set to `false`.
//!
//! # Response Modifications
//!
//! When a body is transformed:
//! - `Content-Type` is set to `text/css`
//! - `Content-Length` header is removed
//! - `Accept-Ranges` header is removed
//!
//! `Content-Encoding` is not inspected: an encoded CSS body is handed to the
//! engine as is and fails to parse. Install this layer inside any
//! compression layer, and in front of uncompressed files only.
//!
//! Engine failures are returned as the service error.

#![deny(missing_docs)]

mod body;
mod detect;
mod engine;
mod error;
mod future;
mod layer;
mod options;
mod service;
mod transformer;

pub use body::{BodyKind, CssBody};
pub use detect::{CSS_CONTENT_TYPE, CSS_CONTENT_TYPES, is_css_content_type, is_module_file};
pub use engine::{CssEngine, LightningCss, TransformInput};
pub use error::{BoxError, Error, TransformError};
pub use future::ResponseFuture;
pub use layer::CssTransformLayer;
pub use options::{CssModules, CssModulesConfig, CssOptions, TransformOptions};
pub use service::CssTransformService;
pub use transformer::{CssTransformer, Rewrite};
