//! Cancellable stream of renderer output chunks.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::{Bytes, BytesMut};
use futures::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use spelunk_error::{Error, Result};

/// Forward-only stream of image bytes with three terminal signals:
/// a chunk (`Some(Ok)`), an error (`Some(Err)`, always the last item) and
/// the end of the stream (`None`).
///
/// The producer side is a pump task feeding a bounded channel. Dropping
/// the stream closes the channel and aborts the pump, which releases the
/// renderer's process and pipe handles. This happens on every exit path:
/// normal end, error, or the consumer walking away mid-stream.
pub struct ChunkStream {
    rx: mpsc::Receiver<Result<Bytes>>,
    pump: Option<JoinHandle<()>>,
    finished: bool,
}

impl ChunkStream {
    pub(crate) fn new(rx: mpsc::Receiver<Result<Bytes>>, pump: JoinHandle<()>) -> Self {
        Self {
            rx,
            pump: Some(pump),
            finished: false,
        }
    }

    /// A stream fed by hand; useful for renderers that do not own a process.
    pub fn channel(capacity: usize) -> (mpsc::Sender<Result<Bytes>>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let stream = Self {
            rx,
            pump: None,
            finished: false,
        };
        (tx, stream)
    }

    /// Drain the stream into one buffer, failing on the first error.
    pub async fn read_all(mut self) -> Result<Bytes> {
        use futures::StreamExt;

        let mut buf = BytesMut::new();
        while let Some(chunk) = self.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    fn close(&mut self) {
        self.rx.close();
        if let Some(pump) = self.pump.take() {
            trace!("releasing renderer pump");
            pump.abort();
        }
    }
}

impl Stream for ChunkStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }

        match ready!(self.rx.poll_recv(cx)) {
            Some(Ok(chunk)) => Poll::Ready(Some(Ok(chunk))),
            Some(Err(err)) => {
                self.finished = true;
                self.close();
                Poll::Ready(Some(Err(err)))
            }
            None => {
                self.finished = true;
                self.close();
                Poll::Ready(None)
            }
        }
    }
}

impl Drop for ChunkStream {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ChunkStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStream")
            .field("finished", &self.finished)
            .field("pumping", &self.pump.is_some())
            .finish()
    }
}

/// Send helper used by producers; `false` once the consumer is gone.
pub(crate) async fn forward(tx: &mpsc::Sender<Result<Bytes>>, item: Result<Bytes>) -> bool {
    tx.send(item).await.is_ok()
}

/// Error for a producer that stopped without reporting why.
pub(crate) fn abandoned(program: &str) -> Error {
    Error::render_failed("renderer output ended unexpectedly").with_context("program", program.to_string())
}
