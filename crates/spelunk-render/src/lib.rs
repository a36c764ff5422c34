//! Adapter for the external diagram renderer.
//!
//! Markup goes to a renderer process on stdin; the image comes back as a
//! [`ChunkStream`] of byte chunks, forwarded as soon as they are read.
//! Nothing is buffered or retried. The first error ends the stream, and
//! dropping the stream tears the renderer process down.
//!
//! # Module Structure
//!
//! - [`stream`]: the cancellable chunk stream
//! - [`process`]: the process-backed renderer and its configuration

pub mod process;
pub mod stream;

use spelunk_error::Result;

pub use process::{ProcessRenderer, RendererConfig};
pub use stream::ChunkStream;

/// Something that turns diagram markup into a stream of image bytes.
pub trait DiagramRenderer: Send + Sync {
    /// Start rendering `markup`.
    ///
    /// Fails up front only when the renderer cannot be started; later
    /// failures arrive as the last item of the stream.
    fn render(&self, markup: String) -> Result<ChunkStream>;

    /// MIME type of the produced image.
    fn content_type(&self) -> &'static str {
        "image/svg+xml"
    }
}
