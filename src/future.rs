use crate::body::{BodyKind, CssBody, Source};
use crate::detect::{CSS_CONTENT_TYPE, is_css_content_type};
use crate::engine::CssEngine;
use crate::error::{BoxError, Error};
use crate::transformer::CssTransformer;
use bytes::Bytes;
use http::response::Parts;
use http::{Response, header};
use http_body::Body;
use http_body_util::BodyExt;
use http_body_util::combinators::Collect;
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

pin_project! {
    /// Future for CSS transform service responses.
    pub struct ResponseFuture<F, B, E>
    where
        B: Body,
    {
        #[pin]
        state: State<F, B>,
        transformer: Arc<CssTransformer<E>>,
        path: String,
    }
}

pin_project! {
    #[project = StateProj]
    enum State<F, B>
    where
        B: Body,
    {
        /// Waiting for the inner service.
        Inner {
            #[pin]
            future: F,
        },
        /// Collecting a streaming CSS body into memory.
        Draining {
            #[pin]
            collect: Collect<B>,
            parts: Option<Parts>,
        },
        /// The response has been returned.
        Done,
    }
}

impl<F, B: Body, E> ResponseFuture<F, B, E> {
    pub(crate) fn new(inner: F, transformer: Arc<CssTransformer<E>>, path: String) -> Self {
        Self {
            state: State::Inner { future: inner },
            transformer,
            path,
        }
    }
}

impl<F, B, E, SE> Future for ResponseFuture<F, B, E>
where
    F: Future<Output = Result<Response<B>, SE>>,
    SE: Into<BoxError>,
    B: Body,
    B::Error: Into<BoxError>,
    E: CssEngine,
{
    type Output = Result<Response<CssBody<B>>, BoxError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        loop {
            let mut this = self.as_mut().project();

            match this.state.as_mut().project() {
                StateProj::Inner { future } => {
                    let result = ready!(future.poll(cx));
                    this.state.set(State::Done);
                    let (parts, body) = match result {
                        Ok(response) => response.into_parts(),
                        Err(e) => return Poll::Ready(Err(e.into())),
                    };

                    if !is_css_content_type(&parts.headers) {
                        tracing::trace!(path = %this.path, "not a css response");
                        return Poll::Ready(Ok(Response::from_parts(
                            parts,
                            CssBody::passthrough(body),
                        )));
                    }

                    match BodyKind::from_body(body).into_source() {
                        Source::Absent => {
                            tracing::trace!(path = %this.path, "css response has no body");
                            return Poll::Ready(Ok(Response::from_parts(
                                parts,
                                CssBody::buffered(None),
                            )));
                        }
                        Source::Ready(code) => {
                            return Poll::Ready(transform_response(
                                this.transformer,
                                this.path,
                                parts,
                                &code,
                            ));
                        }
                        Source::Drain(body) => {
                            this.state.set(State::Draining {
                                collect: body.collect(),
                                parts: Some(parts),
                            });
                        }
                    }
                }

                StateProj::Draining { collect, parts } => {
                    let result = ready!(collect.poll(cx));
                    let parts = parts.take();
                    this.state.set(State::Done);

                    let code = match result {
                        Ok(collected) => collected.to_bytes(),
                        Err(e) => return Poll::Ready(Err(Error::Body(e.into()).into())),
                    };

                    let Some(parts) = parts else {
                        return Poll::Pending;
                    };

                    return Poll::Ready(transform_response(
                        this.transformer,
                        this.path,
                        parts,
                        &code,
                    ));
                }

                StateProj::Done => return Poll::Pending,
            }
        }
    }
}

/// Replaces the body with the transformed stylesheet and fixes the headers.
fn transform_response<B, E: CssEngine>(
    transformer: &CssTransformer<E>,
    path: &str,
    mut parts: Parts,
    code: &Bytes,
) -> Result<Response<CssBody<B>>, BoxError> {
    let output = transformer
        .transform_source(path, code)
        .map_err(Error::from)?;

    parts.headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static(CSS_CONTENT_TYPE),
    );

    // The rewritten body has a different length
    parts.headers.remove(header::CONTENT_LENGTH);

    // Byte ranges of the served file no longer apply
    parts.headers.remove(header::ACCEPT_RANGES);

    Ok(Response::from_parts(parts, CssBody::buffered(output)))
}
