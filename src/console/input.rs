//! Console input
//!
//! Lines are read on a detached OS thread and handed to the async side over
//! a channel. Runtime shutdown never waits on a read that is still blocked.

use std::io::BufRead;
use std::thread;
use tokio::sync::mpsc;
use tracing::debug;

const LINE_BUFFER: usize = 16;

/// Forward every line of `reader` into the returned channel.
///
/// The channel closes at EOF or when the receiver is dropped. A read error
/// is forwarded once and ends the reader.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<std::io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);

    thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() || failed {
                break;
            }
        }
        debug!("[Input] Line reader finished");
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn forwards_lines_then_closes() {
        let mut rx = spawn_line_reader(Cursor::new("ADD M1 High\n\nREPORT\n"));

        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line.unwrap());
        }
        assert_eq!(lines, vec!["ADD M1 High", "", "REPORT"]);
    }

    /// Never returns data, like a terminal nobody is typing into.
    struct Stalled;

    impl std::io::Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            loop {
                thread::park();
            }
        }
    }

    #[tokio::test]
    async fn blocked_read_does_not_hold_the_runtime() {
        let mut rx = spawn_line_reader(std::io::BufReader::new(Stalled));
        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(20), rx.recv()).await;
        assert!(waited.is_err());
        drop(rx);
        // The test returning proves shutdown did not wait on the reader thread
    }
}
