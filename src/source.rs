use std::io::{self, Read};

use tokio::sync::mpsc;

use crate::Utf8Assembler;

/// Producer of text fragments for a [`ResponseIterator`](crate::ResponseIterator).
///
/// Fragments carry no structure: they are consecutive slices of the response
/// text and may split any token. `next_fragment` may block.
pub trait ChunkSource {
    /// Next fragment, or `Ok(None)` once the source is exhausted.
    fn next_fragment(&mut self) -> io::Result<Option<String>>;

    /// Release the underlying connection. Calling it more than once is a
    /// no-op, and once closed the source reports exhaustion.
    fn close(&mut self);
}

impl<S: ChunkSource + ?Sized> ChunkSource for Box<S> {
    fn next_fragment(&mut self) -> io::Result<Option<String>> {
        (**self).next_fragment()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Source over an in-memory sequence of fragments.
pub struct IterSource<I> {
    inner: Option<I>,
}

impl<I> IterSource<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    pub fn new(fragments: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: Some(fragments.into_iter()),
        }
    }
}

impl<I> ChunkSource for IterSource<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    fn next_fragment(&mut self) -> io::Result<Option<String>> {
        Ok(self.inner.as_mut().and_then(Iterator::next).map(Into::into))
    }

    fn close(&mut self) {
        self.inner = None;
    }
}

/// Source over a sequence of fragments where any pull may fail.
pub struct TryIterSource<I> {
    inner: Option<I>,
}

impl<I, S> TryIterSource<I>
where
    I: Iterator<Item = io::Result<S>>,
    S: Into<String>,
{
    pub fn new(fragments: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: Some(fragments.into_iter()),
        }
    }
}

impl<I, S> ChunkSource for TryIterSource<I>
where
    I: Iterator<Item = io::Result<S>>,
    S: Into<String>,
{
    fn next_fragment(&mut self) -> io::Result<Option<String>> {
        match self.inner.as_mut().and_then(Iterator::next) {
            Some(fragment) => fragment.map(|f| Some(f.into())),
            None => Ok(None),
        }
    }

    fn close(&mut self) {
        self.inner = None;
    }
}

pub const DEFAULT_READ_SIZE: usize = 1024;

/// Source over a blocking byte reader, such as a socket or a response body.
///
/// Reads at most `read_size` bytes per fragment and never splits a UTF-8 code
/// point across two fragments.
pub struct ReaderSource<R> {
    reader: Option<R>,
    assembler: Utf8Assembler,
    buf: Vec<u8>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_read_size(reader, DEFAULT_READ_SIZE)
    }

    pub fn with_read_size(reader: R, read_size: usize) -> Self {
        Self {
            reader: Some(reader),
            assembler: Utf8Assembler::new(),
            buf: vec![0; read_size.max(1)],
        }
    }
}

impl<R: Read> ChunkSource for ReaderSource<R> {
    fn next_fragment(&mut self) -> io::Result<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        let n = loop {
            match reader.read(&mut self.buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                result => break result?,
            }
        };
        if n == 0 {
            self.reader = None;
            self.assembler.finish()?;
            return Ok(None);
        }
        self.assembler.push(&self.buf[..n]).map(Some)
    }

    fn close(&mut self) {
        self.reader = None;
    }
}

/// Source fed by another thread through a tokio channel.
///
/// Pulls with `blocking_recv`, so it must not be driven from inside an async
/// runtime. Use [`ResponseStream`](crate::ResponseStream) there instead.
pub struct ChannelSource {
    rx: Option<mpsc::Receiver<String>>,
}

impl ChannelSource {
    pub fn new(rx: mpsc::Receiver<String>) -> Self {
        Self { rx: Some(rx) }
    }
}

impl ChunkSource for ChannelSource {
    fn next_fragment(&mut self) -> io::Result<Option<String>> {
        Ok(match self.rx.as_mut() {
            Some(rx) => rx.blocking_recv(),
            None => None,
        })
    }

    fn close(&mut self) {
        // Dropping the receiver makes pending and future sends fail.
        self.rx = None;
    }
}
