use std::io::{self, Error as IoError, ErrorKind};
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures::stream::FusedStream;
use futures::{ready, Stream, StreamExt};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, instrument};

use crate::pipeline::{Pipeline, Status};
use crate::{ObjectDecoder, StreamConfig, StreamError, Utf8Assembler};

/// Boxed byte stream, the shape produced by the `from_*` constructors.
pub type ByteStream<'a> = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + 'a>>;

/// Async counterpart of [`ResponseIterator`](crate::ResponseIterator).
///
/// Wraps any stream of byte chunks, for instance an HTTP response body, and
/// yields one decoded value per object of the top-level array. Bytes are only
/// pulled from the inner stream when no completed object is waiting.
pub struct ResponseStream<S, D> {
    stream: Option<S>,
    assembler: Utf8Assembler,
    pipeline: Pipeline<D>,
}

impl<S, D: ObjectDecoder> ResponseStream<S, D> {
    pub fn new(stream: S, decoder: D) -> Self {
        Self::with_config(stream, decoder, StreamConfig::default())
    }

    pub fn with_config(stream: S, decoder: D, config: StreamConfig) -> Self {
        Self {
            stream: Some(stream),
            assembler: Utf8Assembler::new(),
            pipeline: Pipeline::new(decoder, config),
        }
    }

    /// Stop the stream and drop the inner byte stream, which closes the
    /// connection behind it. Idempotent.
    pub fn cancel(&mut self) {
        self.pipeline.cancel();
        self.stream = None;
    }

    pub fn pending(&self) -> usize {
        self.pipeline.pending()
    }

    pub fn is_cancelled(&self) -> bool {
        self.pipeline.status() == Status::Cancelled
    }
}

impl<'a, D: ObjectDecoder> ResponseStream<ByteStream<'a>, D> {
    /// Read the array from an async reader, `config.read_size` bytes at a time.
    pub fn from_async_read<R>(reader: R, decoder: D, config: StreamConfig) -> Self
    where
        R: AsyncRead + Unpin + Send + 'a,
    {
        let chunks = read_chunks(reader, config.read_size);
        Self::with_config(chunks, decoder, config)
    }

    /// Read the array from chunks sent over a channel. Closing the sending
    /// side ends the stream.
    pub fn from_channel(rx: mpsc::Receiver<Vec<u8>>, decoder: D, config: StreamConfig) -> Self {
        let chunks = ReceiverStream::new(rx).map(|chunk| Ok::<_, IoError>(Bytes::from(chunk)));
        Self::with_config(Box::pin(chunks), decoder, config)
    }
}

fn read_chunks<'a, R>(mut reader: R, read_size: usize) -> ByteStream<'a>
where
    R: AsyncRead + Unpin + Send + 'a,
{
    let read_size = read_size.max(1);
    Box::pin(async_stream::stream! {
        loop {
            let mut buf = BytesMut::with_capacity(read_size);
            match reader.read_buf(&mut buf).await {
                Ok(0) => break,
                Ok(_) => yield Ok(buf.freeze()),
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    })
}

impl<S, B, E, D> ResponseStream<S, D>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
    D: ObjectDecoder + Unpin,
{
    /// Collect up to `batch_size` values; a short batch means the stream ended.
    #[instrument(skip(self))]
    pub async fn next_batch(&mut self) -> Result<Vec<D::Item>, StreamError> {
        let batch_size = self.pipeline.config().batch_size;
        let mut batch = Vec::with_capacity(batch_size);
        while batch.len() < batch_size {
            match self.next().await {
                Some(item) => batch.push(item?),
                None => break,
            }
        }
        Ok(batch)
    }
}

impl<S, B, E, D> Stream for ResponseStream<S, D>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
    D: ObjectDecoder + Unpin,
{
    type Item = Result<D::Item, StreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(item) = this.pipeline.take_ready() {
                return Poll::Ready(Some(item));
            }
            if !this.pipeline.is_active() {
                return Poll::Ready(None);
            }
            let Some(stream) = this.stream.as_mut() else {
                return Poll::Ready(None);
            };
            match ready!(Pin::new(stream).poll_next(cx)) {
                Some(Ok(chunk)) => {
                    let fragment = match this.assembler.push(chunk.as_ref()) {
                        Ok(fragment) => fragment,
                        Err(e) => return Poll::Ready(Some(Err(e.into()))),
                    };
                    if !this.pipeline.feed(&fragment) {
                        this.stream = None;
                    }
                }
                Some(Err(e)) => {
                    let e = IoError::new(ErrorKind::Other, e);
                    return Poll::Ready(Some(Err(StreamError::Transport(e))));
                }
                None => {
                    debug!("byte stream ended");
                    this.stream = None;
                    let dangling = this.assembler.finish();
                    let truncated = this.pipeline.finish();
                    return Poll::Ready(match dangling {
                        Err(e) => Some(Err(e.into())),
                        Ok(()) => truncated.map(Err),
                    });
                }
            }
        }
    }
}

impl<S, B, E, D> FusedStream for ResponseStream<S, D>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
    D: ObjectDecoder + Unpin,
{
    fn is_terminated(&self) -> bool {
        self.pipeline.is_finished()
    }
}
