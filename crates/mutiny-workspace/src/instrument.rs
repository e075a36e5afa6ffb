// instrument.rs — Streaming transform seam between the mutation engine and staged files.
//
// When source text is staged into the scratch area it can be routed
// through an instrumenter supplied by the caller (mutant activation
// switches, coverage probes, and the like). The workspace knows nothing
// about the transform itself: it hands the instrumenter the raw file
// sink, writes the original text into whatever writer comes back, and
// shuts that writer down when the content ends.

use tokio::io::AsyncWrite;

/// A boxed async byte sink, as handed to and returned by instrumenters.
///
/// In Rust, trait objects let the workspace stay generic over the
/// concrete writer: the instrumenter sees "somewhere bytes go", whether
/// that is a plain file or another instrumenter stacked below it.
pub type BoxedSink = Box<dyn AsyncWrite + Send + Unpin>;

/// Wraps a file sink with a streaming source-to-source transform.
///
/// Implementations return a writer that rewrites whatever is written to
/// it and forwards the result to `sink`. Shutting down the returned
/// writer must flush any buffered tail and shut down `sink` itself; the
/// workspace treats a completed shutdown as "the file is fully on disk".
pub trait Instrumenter: Send + Sync {
    fn attach(&self, sink: BoxedSink) -> BoxedSink;
}
