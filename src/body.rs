use bytes::{Buf, Bytes};
use http_body::{Body, Frame, SizeHint};
use pin_project_lite::pin_project;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

/// The shapes a response body can take before transformation.
///
/// `Text` and `Bytes` are already in memory. `Other` is a streaming body
/// that has to be drained first. All three end up as one byte buffer handed
/// to the engine.
#[derive(Debug)]
pub enum BodyKind<B> {
    /// No body.
    Empty,
    /// A text body.
    Text(String),
    /// A binary body.
    Bytes(Bytes),
    /// Any other body, drained before transforming.
    Other(B),
}

impl<B: Body> BodyKind<B> {
    /// Classifies a streaming body. A body that has already ended is absent.
    pub fn from_body(body: B) -> Self {
        if body.is_end_stream() {
            BodyKind::Empty
        } else {
            BodyKind::Other(body)
        }
    }
}

impl<B> BodyKind<B> {
    /// Normalizes in-memory variants to bytes.
    pub(crate) fn into_source(self) -> Source<B> {
        match self {
            BodyKind::Empty => Source::Absent,
            BodyKind::Text(text) => Source::Ready(Bytes::from(text)),
            BodyKind::Bytes(bytes) => Source::Ready(bytes),
            BodyKind::Other(body) => Source::Drain(body),
        }
    }
}

impl<B> From<String> for BodyKind<B> {
    fn from(text: String) -> Self {
        BodyKind::Text(text)
    }
}

impl<B> From<&'static str> for BodyKind<B> {
    fn from(text: &'static str) -> Self {
        BodyKind::Text(text.to_owned())
    }
}

impl<B> From<Bytes> for BodyKind<B> {
    fn from(bytes: Bytes) -> Self {
        BodyKind::Bytes(bytes)
    }
}

impl<B> From<Vec<u8>> for BodyKind<B> {
    fn from(bytes: Vec<u8>) -> Self {
        BodyKind::Bytes(Bytes::from(bytes))
    }
}

/// A body normalized for the engine.
pub(crate) enum Source<B> {
    /// Nothing to transform.
    Absent,
    /// Bytes ready to transform.
    Ready(Bytes),
    /// A body that must be drained into bytes first.
    Drain(B),
}

pin_project! {
    /// A response body that is either transformed CSS or the untouched inner body.
    #[project = CssBodyProj]
    #[derive(Debug)]
    #[allow(missing_docs)]
    pub enum CssBody<B> {
        /// Body held in memory after transformation.
        Buffered {
            data: Option<Bytes>,
        },
        /// Passthrough body for responses that were not transformed.
        Passthrough {
            #[pin]
            inner: B,
        },
    }
}

impl<B> CssBody<B> {
    /// Creates an in-memory body. `None` or empty data yields an empty body.
    pub fn buffered(data: Option<Bytes>) -> Self {
        Self::Buffered {
            data: data.filter(|data| !data.is_empty()),
        }
    }

    /// Creates a passthrough body.
    pub fn passthrough(inner: B) -> Self {
        Self::Passthrough { inner }
    }
}

impl<B> Body for CssBody<B>
where
    B: Body,
    B::Data: Buf,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            CssBodyProj::Buffered { data } => Poll::Ready(data.take().map(|d| Ok(Frame::data(d)))),
            CssBodyProj::Passthrough { inner } => match inner.poll_frame(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Ready(Some(Ok(frame))) => {
                    let frame = frame.map_data(|mut data| data.copy_to_bytes(data.remaining()));
                    Poll::Ready(Some(Ok(frame)))
                }
                Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(io::Error::other(e.into())))),
            },
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            CssBody::Buffered { data } => data.is_none(),
            CssBody::Passthrough { inner } => inner.is_end_stream(),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            CssBody::Buffered { data } => {
                SizeHint::with_exact(data.as_ref().map_or(0, |d| d.len() as u64))
            }
            CssBody::Passthrough { inner } => inner.size_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderMap;
    use std::collections::VecDeque;

    /// A test body that yields predefined frames.
    struct TestBody {
        frames: VecDeque<Frame<Bytes>>,
    }

    impl TestBody {
        fn new(frames: Vec<Frame<Bytes>>) -> Self {
            Self {
                frames: frames.into(),
            }
        }
    }

    impl Body for TestBody {
        type Data = Bytes;
        type Error = std::convert::Infallible;

        fn poll_frame(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
            match self.frames.pop_front() {
                Some(frame) => Poll::Ready(Some(Ok(frame))),
                None => Poll::Ready(None),
            }
        }

        fn is_end_stream(&self) -> bool {
            self.frames.is_empty()
        }
    }

    fn poll_body<B: Body + Unpin>(body: &mut B) -> Option<Result<Frame<B::Data>, B::Error>> {
        let waker = std::task::Waker::noop();
        let mut cx = Context::from_waker(waker);
        match Pin::new(body).poll_frame(&mut cx) {
            Poll::Ready(result) => result,
            Poll::Pending => None,
        }
    }

    #[test]
    fn test_from_body_ended_is_empty() {
        let kind = BodyKind::from_body(TestBody::new(vec![]));
        assert!(matches!(kind, BodyKind::Empty));
    }

    #[test]
    fn test_from_body_streaming_is_other() {
        let kind = BodyKind::from_body(TestBody::new(vec![Frame::data(Bytes::from("a{}"))]));
        assert!(matches!(kind, BodyKind::Other(_)));
    }

    #[test]
    fn test_text_normalizes_to_utf8_bytes() {
        let kind: BodyKind<TestBody> = BodyKind::from(".ä{}");
        match kind.into_source() {
            Source::Ready(bytes) => assert_eq!(bytes, Bytes::from(".ä{}".as_bytes())),
            _ => panic!("Expected ready bytes"),
        }
    }

    #[test]
    fn test_bytes_normalize_unchanged() {
        let kind: BodyKind<TestBody> = BodyKind::from(b".a{}".to_vec());
        match kind.into_source() {
            Source::Ready(bytes) => assert_eq!(bytes, Bytes::from_static(b".a{}")),
            _ => panic!("Expected ready bytes"),
        }
    }

    #[test]
    fn test_buffered_yields_single_frame() {
        let mut body: CssBody<TestBody> = CssBody::buffered(Some(Bytes::from(".a{}")));
        assert_eq!(body.size_hint().exact(), Some(4));
        assert!(!body.is_end_stream());

        let frame = poll_body(&mut body).unwrap().unwrap();
        assert_eq!(frame.into_data().unwrap(), Bytes::from(".a{}"));

        assert!(body.is_end_stream());
        assert!(poll_body(&mut body).is_none());
    }

    #[test]
    fn test_buffered_debug() {
        let body = CssBody::<Bytes>::buffered(Some(Bytes::from(".a{}")));
        assert!(format!("{body:?}").starts_with("Buffered"));
    }

    #[test]
    fn test_buffered_none_is_empty() {
        let mut body: CssBody<TestBody> = CssBody::buffered(None);
        assert!(body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(0));
        assert!(poll_body(&mut body).is_none());
    }

    #[test]
    fn test_passthrough_trailers() {
        let mut trailers = HeaderMap::new();
        trailers.insert("x-checksum", "abc123".parse().unwrap());

        let inner = TestBody::new(vec![
            Frame::data(Bytes::from("data")),
            Frame::trailers(trailers.clone()),
        ]);
        let mut body = CssBody::passthrough(inner);

        let frame = poll_body(&mut body).unwrap().unwrap();
        assert_eq!(frame.into_data().unwrap(), Bytes::from("data"));

        let frame = poll_body(&mut body).unwrap().unwrap();
        let received_trailers = frame.into_trailers().unwrap();
        assert_eq!(received_trailers.get("x-checksum").unwrap(), "abc123");

        assert!(poll_body(&mut body).is_none());
    }
}
