// staging_pipeline.rs — Instrumented staging through the public API.
//
// These tests drive the workspace the way the mutation orchestrator
// does: open a session, allocate per-mutant directories, and stage
// content through caller-supplied instrumenters. The instrumenters here
// are deliberately simple stand-ins for the real source rewriters: an
// uppercaser (visibly transforms), a byte counter (observes the stream),
// and one that seizes mid-write (failures must surface as stream
// errors, not vanish).

use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use tempfile::tempdir;
use tokio::io::AsyncWrite;

use mutiny_workspace::{BoxedSink, FileContent, Instrumenter, ScratchWorkspace, WorkspaceError};

// ── Test instrumenters ───────────────────────────────────────────────

/// Uppercases every byte on its way to the sink.
struct Uppercaser;

struct UppercaseWriter {
    inner: BoxedSink,
}

impl AsyncWrite for UppercaseWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let upper: Vec<u8> = buf.iter().map(|b| b.to_ascii_uppercase()).collect();
        // One output byte per input byte, so a short write downstream
        // maps one-to-one onto bytes consumed from `buf`.
        Pin::new(&mut this.inner).poll_write(cx, &upper)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

impl Instrumenter for Uppercaser {
    fn attach(&self, sink: BoxedSink) -> BoxedSink {
        Box::new(UppercaseWriter { inner: sink })
    }
}

/// Counts bytes flowing through without changing them.
struct ByteCounter {
    written: Arc<AtomicUsize>,
}

struct CountingWriter {
    inner: BoxedSink,
    written: Arc<AtomicUsize>,
}

impl AsyncWrite for CountingWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_write(cx, buf) {
            Poll::Ready(Ok(n)) => {
                this.written.fetch_add(n, Ordering::Relaxed);
                Poll::Ready(Ok(n))
            }
            other => other,
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

impl Instrumenter for ByteCounter {
    fn attach(&self, sink: BoxedSink) -> BoxedSink {
        Box::new(CountingWriter {
            inner: sink,
            written: Arc::clone(&self.written),
        })
    }
}

/// Fails every write, like a transform whose inner pipeline has closed.
struct Seizing;

struct SeizingWriter;

impl AsyncWrite for SeizingWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "instrumenter pipeline closed",
        )))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl Instrumenter for Seizing {
    fn attach(&self, _sink: BoxedSink) -> BoxedSink {
        Box::new(SeizingWriter)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[tokio::test]
async fn text_streams_through_the_transform() {
    let root = tempdir().unwrap();
    let ws = ScratchWorkspace::open_in(root.path()).unwrap();
    let dir = ws.allocate_dir("mutant-").unwrap();

    let path = dir.join("source.rs");
    ws.write_file(&path, FileContent::from("fn main() {}"), Some(&Uppercaser))
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "FN MAIN() {}");
}

#[tokio::test]
async fn every_byte_reaches_the_instrumenter() {
    let root = tempdir().unwrap();
    let ws = ScratchWorkspace::open_in(root.path()).unwrap();
    let dir = ws.allocate_dir("mutant-").unwrap();

    let counter = ByteCounter {
        written: Arc::new(AtomicUsize::new(0)),
    };
    let text = "let answer = 42;\n".repeat(100);
    ws.write_file(&dir.join("big.rs"), FileContent::from(text.as_str()), Some(&counter))
        .await
        .unwrap();

    assert_eq!(counter.written.load(Ordering::Relaxed), text.len());
    assert_eq!(std::fs::read_to_string(dir.join("big.rs")).unwrap(), text);
}

#[tokio::test]
async fn binary_content_bypasses_the_instrumenter() {
    let root = tempdir().unwrap();
    let ws = ScratchWorkspace::open_in(root.path()).unwrap();
    let dir = ws.allocate_dir("assets-").unwrap();

    let path = dir.join("logo.png");
    let bytes = b"raw png bytes".to_vec();
    // An uppercaser is supplied but binary content must never see it.
    ws.write_file(&path, FileContent::Binary(bytes.clone()), Some(&Uppercaser))
        .await
        .unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), bytes);
}

#[tokio::test]
async fn instrumented_copy_transforms_the_source() {
    let root = tempdir().unwrap();
    let ws = ScratchWorkspace::open_in(root.path()).unwrap();
    let dir = ws.allocate_dir("mutant-").unwrap();

    let original = root.path().join("lib.rs");
    std::fs::write(&original, "pub fn id() {}").unwrap();

    let staged = dir.join("lib.rs");
    ws.copy_file(&original, &staged, Some(&Uppercaser))
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&staged).unwrap(), "PUB FN ID() {}");
    // The source file is untouched.
    assert_eq!(std::fs::read_to_string(&original).unwrap(), "pub fn id() {}");
}

#[tokio::test]
async fn a_seizing_instrumenter_surfaces_as_stream_error() {
    let root = tempdir().unwrap();
    let ws = ScratchWorkspace::open_in(root.path()).unwrap();
    let dir = ws.allocate_dir("mutant-").unwrap();

    let result = ws
        .write_file(&dir.join("doomed.rs"), FileContent::from("fn main() {}"), Some(&Seizing))
        .await;

    assert!(matches!(result, Err(WorkspaceError::StreamError { .. })));
}

#[tokio::test]
async fn cleanup_takes_every_session_with_it() {
    let root = tempdir().unwrap();
    let a = ScratchWorkspace::open_in(root.path()).unwrap();
    let b = ScratchWorkspace::open_in(root.path()).unwrap();

    // Cleaning through either handle removes the whole base directory,
    // other sessions included.
    a.cleanup().await;

    assert!(!a.base_path().exists());
    assert!(!b.session_path().exists());
}

#[tokio::test]
async fn full_mutant_staging_pass() {
    let root = tempdir().unwrap();
    let ws = ScratchWorkspace::open_in(root.path()).unwrap();

    let mut dirs = Vec::new();
    for i in 0..5 {
        let dir = ws.allocate_dir("mutant-").unwrap();
        ws.write_file(
            &dir.join("lib.rs"),
            FileContent::Text(format!("// mutant {}\n", i)),
            Some(&Uppercaser),
        )
        .await
        .unwrap();
        dirs.push(dir);
    }

    let distinct: std::collections::HashSet<_> = dirs.iter().collect();
    assert_eq!(distinct.len(), 5);
    for dir in &dirs {
        let staged = std::fs::read_to_string(dir.join("lib.rs")).unwrap();
        assert!(staged.starts_with("// MUTANT"));
    }

    ws.cleanup().await;
    assert!(!ws.base_path().exists());
}
