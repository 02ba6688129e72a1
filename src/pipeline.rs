use tracing::{debug, warn};

use crate::{metrics, BoundaryScanner, ObjectDecoder, ObjectQueue, StreamConfig, StreamError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Active,
    Exhausted,
    Cancelled,
    Failed,
}

/// Scanner, queue and decoder shared by the blocking iterator and the async
/// stream. The callers only decide where fragments come from.
pub(crate) struct Pipeline<D> {
    scanner: BoundaryScanner,
    queue: ObjectQueue,
    decoder: D,
    config: StreamConfig,
    status: Status,
    /// Scan error held back until the objects completed before it are out.
    deferred: Option<StreamError>,
}

impl<D: ObjectDecoder> Pipeline<D> {
    pub(crate) fn new(decoder: D, config: StreamConfig) -> Self {
        Self {
            scanner: BoundaryScanner::with_options(config.scanner.clone()),
            queue: ObjectQueue::new(),
            decoder,
            config,
            status: Status::Active,
            deferred: None,
        }
    }

    pub(crate) fn status(&self) -> Status {
        self.status
    }

    pub(crate) fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub(crate) fn pending(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Nothing is left to hand out and no more fragments will be taken.
    pub(crate) fn is_finished(&self) -> bool {
        !self.is_active() && self.queue.is_empty() && self.deferred.is_none()
    }

    /// Scan one fragment. Returns `false` once the scanner has failed, at
    /// which point the caller must stop pulling. Objects closed earlier in
    /// the same fragment stay queued and the error is reported after them.
    pub(crate) fn feed(&mut self, fragment: &str) -> bool {
        metrics::record_fragment();
        let scanned = self.scanner.process_fragment(fragment, &mut self.queue);
        metrics::set_pending(self.queue.len());
        match scanned {
            Ok(()) => true,
            Err(e) => {
                debug!(pending = self.queue.len(), "scan failed: {}", e);
                self.status = Status::Failed;
                self.deferred = Some(e);
                false
            }
        }
    }

    /// Decode the oldest queued object. With `skip_invalid` set, rejected
    /// objects are dropped until one decodes or the queue runs dry. A
    /// deferred scan error comes out once the queue is empty.
    pub(crate) fn take_ready(&mut self) -> Option<Result<D::Item, StreamError>> {
        while let Some(text) = self.queue.pop() {
            metrics::set_pending(self.queue.len());
            match self.decoder.decode(&text) {
                Ok(item) => {
                    metrics::record_object();
                    return Some(Ok(item));
                }
                Err(e) => {
                    metrics::record_decode_failure();
                    if self.config.skip_invalid {
                        warn!("Skipping invalid object: {}", e);
                        continue;
                    }
                    return Some(Err(e.into()));
                }
            }
        }
        self.deferred.take().map(Err)
    }

    /// The source is exhausted. Returns the truncation error if there is one
    /// to report.
    pub(crate) fn finish(&mut self) -> Option<StreamError> {
        match self.scanner.finish() {
            Ok(()) => {
                debug!("stream exhausted");
                self.status = Status::Exhausted;
                None
            }
            Err(e) if self.config.fail_on_truncation => {
                self.status = Status::Failed;
                Some(e)
            }
            Err(e) => {
                warn!("{}, ending stream", e);
                self.status = Status::Exhausted;
                None
            }
        }
    }

    pub(crate) fn cancel(&mut self) {
        if self.status == Status::Active {
            debug!(pending = self.queue.len(), "stream cancelled");
            self.status = Status::Cancelled;
        }
        self.queue.clear();
        self.deferred = None;
        metrics::set_pending(0);
    }
}
