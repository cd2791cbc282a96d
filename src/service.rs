use crate::body::CssBody;
use crate::engine::{CssEngine, LightningCss};
use crate::error::BoxError;
use crate::future::ResponseFuture;
use crate::transformer::CssTransformer;
use http::{Request, Response};
use http_body::Body;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Service;

/// A Tower service that transforms CSS response bodies.
#[derive(Debug)]
pub struct CssTransformService<S, E = LightningCss> {
    inner: S,
    transformer: Arc<CssTransformer<E>>,
}

impl<S, E> CssTransformService<S, E> {
    /// Creates a new service wrapping `inner`.
    pub fn new(inner: S, transformer: Arc<CssTransformer<E>>) -> Self {
        Self { inner, transformer }
    }

    /// Returns a reference to the inner service.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns a mutable reference to the inner service.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consumes this service, returning the inner service.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Clone, E> Clone for CssTransformService<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            transformer: Arc::clone(&self.transformer),
        }
    }
}

impl<S, E, ReqBody, ResBody> Service<Request<ReqBody>> for CssTransformService<S, E>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Error: Into<BoxError>,
    ResBody: Body,
    ResBody::Error: Into<BoxError>,
    E: CssEngine,
{
    type Response = Response<CssBody<ResBody>>;
    type Error = BoxError;
    type Future = ResponseFuture<S::Future, ResBody, E>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let path = req.uri().path().to_owned();
        let inner = self.inner.call(req);

        ResponseFuture::new(inner, Arc::clone(&self.transformer), path)
    }
}
