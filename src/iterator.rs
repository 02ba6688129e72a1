use std::io::Read;
use std::iter::FusedIterator;

use tracing::instrument;

use crate::pipeline::{Pipeline, Status};
use crate::{ChunkSource, ObjectDecoder, ReaderSource, StreamConfig, StreamError};

/// Blocking, pull-based iterator over the objects of a streamed JSON array.
///
/// Each call to [`next`](Iterator::next) first drains objects that are already
/// complete, and only pulls a new fragment from the source when none are left.
/// Values come out in the order their closing brace appeared in the stream.
///
/// ```
/// use rest_array_stream::{IterSource, RawDecoder, ResponseIterator};
///
/// let source = IterSource::new(["[{\"a\":1},", "{\"a\":2}]"]);
/// let objects: Vec<String> = ResponseIterator::new(source, RawDecoder)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(objects, ["{\"a\":1}", "{\"a\":2}"]);
/// ```
pub struct ResponseIterator<S, D> {
    source: S,
    pipeline: Pipeline<D>,
}

impl<S: ChunkSource, D: ObjectDecoder> ResponseIterator<S, D> {
    pub fn new(source: S, decoder: D) -> Self {
        Self::with_config(source, decoder, StreamConfig::default())
    }

    pub fn with_config(source: S, decoder: D, config: StreamConfig) -> Self {
        Self {
            source,
            pipeline: Pipeline::new(decoder, config),
        }
    }

    /// Stop the stream and close the source. Safe to call at any time, any
    /// number of times; every later `next` returns `None`.
    pub fn cancel(&mut self) {
        self.pipeline.cancel();
        self.source.close();
    }

    /// Objects scanned but not yet returned.
    pub fn pending(&self) -> usize {
        self.pipeline.pending()
    }

    /// Whether the stream was exhausted, cancelled or failed and everything
    /// it produced has been returned.
    pub fn is_terminated(&self) -> bool {
        self.pipeline.is_finished()
    }

    pub fn is_cancelled(&self) -> bool {
        self.pipeline.status() == Status::Cancelled
    }

    /// Collect up to `batch_size` values. A short batch means the stream has
    /// ended; errors are returned as soon as they occur.
    #[instrument(skip(self))]
    pub fn next_batch(&mut self) -> Result<Vec<D::Item>, StreamError> {
        let batch_size = self.pipeline.config().batch_size;
        let mut batch = Vec::with_capacity(batch_size);
        while batch.len() < batch_size {
            match self.next() {
                Some(item) => batch.push(item?),
                None => break,
            }
        }
        Ok(batch)
    }
}

impl<R: Read, D: ObjectDecoder> ResponseIterator<ReaderSource<R>, D> {
    /// Read the array from a blocking reader, `config.read_size` bytes at a
    /// time.
    pub fn from_reader(reader: R, decoder: D, config: StreamConfig) -> Self {
        let source = ReaderSource::with_read_size(reader, config.read_size);
        Self::with_config(source, decoder, config)
    }
}

impl<S: ChunkSource, D: ObjectDecoder> Iterator for ResponseIterator<S, D> {
    type Item = Result<D::Item, StreamError>;

    #[instrument(skip(self))]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pipeline.take_ready() {
                return Some(item);
            }
            if !self.pipeline.is_active() {
                return None;
            }
            match self.source.next_fragment() {
                Ok(Some(fragment)) => {
                    if !self.pipeline.feed(&fragment) {
                        self.source.close();
                    }
                }
                Ok(None) => {
                    let truncated = self.pipeline.finish();
                    self.source.close();
                    return truncated.map(Err);
                }
                // The iterator stays live; the caller decides whether to pull again.
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

impl<S: ChunkSource, D: ObjectDecoder> FusedIterator for ResponseIterator<S, D> {}
