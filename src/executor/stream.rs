//! Line draining for child output pipes
//!
//! Each pipe is read by a single task. Lines are split on `\n`, a trailing
//! `\r` is dropped, and invalid UTF-8 is replaced rather than ending the
//! stream early.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

use crate::error::OutputStream;

/// Read `reader` line by line until EOF, handing each line to `on_line`
pub(crate) async fn drain_lines<R, F>(reader: R, stream: OutputStream, mut on_line: F)
where
    R: AsyncRead + Unpin,
    F: FnMut(String),
{
    let mut buf_reader = BufReader::new(reader);
    // Reuse line buffer across iterations
    let mut buf = Vec::with_capacity(4096);

    loop {
        buf.clear();
        match buf_reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break, // EOF
            Ok(_) => on_line(decode_line(&buf)),
            Err(e) => {
                tracing::warn!("Error reading {}: {}", stream, e);
                break;
            }
        }
    }
}

fn decode_line(buf: &[u8]) -> String {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Render a raw line the way it is delivered to callers.
///
/// Every line gets a trailing newline; stderr lines are trimmed first.
pub(crate) fn format_line(line: &str, stream: OutputStream) -> String {
    match stream {
        OutputStream::Stdout => format!("{}\n", line),
        OutputStream::Stderr => format!("{}\n", line.trim()),
    }
}

/// Drain a pipe into one string, formatted per [`format_line`]
pub(crate) async fn accumulate<R>(reader: R, stream: OutputStream) -> String
where
    R: AsyncRead + Unpin,
{
    let mut output = String::new();
    drain_lines(reader, stream, |line| output.push_str(&format_line(&line, stream))).await;
    output
}

/// Drain a pipe into a channel, formatted per [`format_line`].
///
/// Dropping `tx` at EOF is the end-of-stream signal for the receiver.
pub(crate) async fn forward<R>(reader: R, stream: OutputStream, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    drain_lines(reader, stream, |line| {
        // Keep reading after the receiver is gone so the child never blocks on a full pipe.
        let _ = tx.send(format_line(&line, stream));
    })
    .await;
}

/// Live sequence of lines from one output stream of a running process.
///
/// Yields lines in the order the process wrote them and ends once the pipe
/// closes and everything already received has been consumed.
#[derive(Debug)]
pub struct LineStream {
    stream: OutputStream,
    rx: mpsc::UnboundedReceiver<String>,
}

impl LineStream {
    pub(crate) fn channel(stream: OutputStream) -> (mpsc::UnboundedSender<String>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { stream, rx })
    }

    /// Which output stream this sequence carries
    pub fn stream(&self) -> OutputStream {
        self.stream
    }

    /// Next line, waiting until one arrives. `None` once the stream has ended.
    pub async fn next_line(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Blocking variant of [`next_line`](Self::next_line) for threads outside
    /// the runtime.
    ///
    /// # Panics
    ///
    /// Panics when called from within an async execution context.
    pub fn blocking_next_line(&mut self) -> Option<String> {
        self.rx.blocking_recv()
    }

    /// Consume the stream, collecting every remaining line
    pub async fn collect_lines(mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = self.next_line().await {
            lines.push(line);
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_line_strips_terminators() {
        assert_eq!(decode_line(b"hello\n"), "hello");
        assert_eq!(decode_line(b"hello\r\n"), "hello");
        assert_eq!(decode_line(b"no newline"), "no newline");
        assert_eq!(decode_line(b"\n"), "");
    }

    #[test]
    fn test_decode_line_invalid_utf8() {
        let line = decode_line(b"ok \xff\xfe end\n");
        assert!(line.starts_with("ok "));
        assert!(line.ends_with(" end"));
        assert!(line.contains('\u{FFFD}'));
    }

    #[test]
    fn test_format_line_trims_stderr_only() {
        assert_eq!(format_line("  padded  ", OutputStream::Stdout), "  padded  \n");
        assert_eq!(format_line("  padded  ", OutputStream::Stderr), "padded\n");
    }

    #[tokio::test]
    async fn test_accumulate_reads_all_lines() {
        let input: &[u8] = b"first\n  second  \nthird";
        let out = accumulate(input, OutputStream::Stdout).await;
        assert_eq!(out, "first\n  second  \nthird\n");

        let input: &[u8] = b"  warn  \n\terror\t\n";
        let err = accumulate(input, OutputStream::Stderr).await;
        assert_eq!(err, "warn\nerror\n");
    }

    #[tokio::test]
    async fn test_accumulate_empty_input() {
        let input: &[u8] = b"";
        assert_eq!(accumulate(input, OutputStream::Stdout).await, "");
    }

    #[tokio::test]
    async fn test_forward_ends_stream_at_eof() {
        let (tx, mut lines) = LineStream::channel(OutputStream::Stdout);
        let input: &[u8] = b"a\nb\n";

        forward(input, OutputStream::Stdout, tx).await;

        assert_eq!(lines.stream(), OutputStream::Stdout);
        assert_eq!(lines.next_line().await.as_deref(), Some("a\n"));
        assert_eq!(lines.next_line().await.as_deref(), Some("b\n"));
        assert_eq!(lines.next_line().await, None);
    }

    #[tokio::test]
    async fn test_forward_survives_dropped_receiver() {
        let (tx, lines) = LineStream::channel(OutputStream::Stderr);
        drop(lines);
        let input: &[u8] = b"ignored\nalso ignored\n";
        forward(input, OutputStream::Stderr, tx).await;
    }

    #[test]
    fn test_blocking_next_line() {
        let (tx, mut lines) = LineStream::channel(OutputStream::Stdout);
        tokio_test::block_on(async move {
            let input: &[u8] = b"one\ntwo\n";
            forward(input, OutputStream::Stdout, tx).await;
        });

        assert_eq!(lines.blocking_next_line().as_deref(), Some("one\n"));
        assert_eq!(lines.blocking_next_line().as_deref(), Some("two\n"));
        assert_eq!(lines.blocking_next_line(), None);
    }

    #[tokio::test]
    async fn test_collect_lines() {
        let (tx, lines) = LineStream::channel(OutputStream::Stderr);
        let input: &[u8] = b" x \n y \n";
        forward(input, OutputStream::Stderr, tx).await;
        assert_eq!(lines.collect_lines().await, vec!["x\n", "y\n"]);
    }
}
