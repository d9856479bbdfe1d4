//! Readiness-driven fan-in over several byte streams
//!
//! Waits with `poll(2)` on every still-open source, reads whatever is ready and
//! hands complete newline-terminated lines to a callback tagged with the
//! source's index. Each source keeps its own partial-line buffer, so byte order
//! within one source is preserved; a source that reports end-of-stream is
//! flushed and excluded from further waits.

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use std::io::{self, Read};
use std::os::fd::AsFd;
use tracing::trace;

const READ_CHUNK: usize = 8 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FanInError {
    #[error("waiting on channels failed: {0}")]
    Poll(#[source] io::Error),

    #[error("reading channel {source_id} failed: {error}")]
    Read {
        source_id: usize,
        #[source]
        error: io::Error,
    },
}

struct Source<R> {
    reader: R,
    pending: Vec<u8>,
    open: bool,
}

impl<R> Source<R> {
    /// Emit every complete line buffered so far
    fn drain_lines<F, E>(&mut self, id: usize, on_line: &mut F) -> Result<(), E>
    where
        F: FnMut(usize, &str) -> Result<(), E>,
    {
        let Some(last) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Ok(());
        };
        for line in self.pending[..last].split(|&b| b == b'\n') {
            emit(id, line, on_line)?;
        }
        self.pending.drain(..=last);
        Ok(())
    }

    /// Emit the unterminated tail left at end-of-stream
    fn flush_tail<F, E>(&mut self, id: usize, on_line: &mut F) -> Result<(), E>
    where
        F: FnMut(usize, &str) -> Result<(), E>,
    {
        let tail = std::mem::take(&mut self.pending);
        emit(id, &tail, on_line)
    }
}

fn emit<F, E>(id: usize, line: &[u8], on_line: &mut F) -> Result<(), E>
where
    F: FnMut(usize, &str) -> Result<(), E>,
{
    if line.is_empty() {
        return Ok(());
    }
    on_line(id, &String::from_utf8_lossy(line))
}

pub struct FanIn<R> {
    sources: Vec<Source<R>>,
}

impl<R: Read + AsFd> FanIn<R> {
    /// Sources are identified by their position in `readers`
    pub fn new(readers: impl IntoIterator<Item = R>) -> Self {
        let sources = readers
            .into_iter()
            .map(|reader| Source {
                reader,
                pending: Vec::new(),
                open: true,
            })
            .collect();
        Self { sources }
    }

    /// Read every source to end-of-stream, calling `on_line(source, line)`
    ///
    /// Blocks until all sources are closed. An error returned by the callback
    /// stops the loop and is passed through.
    pub fn run<F, E>(mut self, mut on_line: F) -> Result<(), E>
    where
        F: FnMut(usize, &str) -> Result<(), E>,
        E: From<FanInError>,
    {
        let mut buf = vec![0u8; READ_CHUNK];

        loop {
            let active: Vec<usize> = (0..self.sources.len())
                .filter(|&i| self.sources[i].open)
                .collect();
            if active.is_empty() {
                return Ok(());
            }

            for id in self.wait_ready(&active)? {
                let source = &mut self.sources[id];
                match source.reader.read(&mut buf) {
                    Ok(0) => {
                        source.open = false;
                        source.flush_tail(id, &mut on_line)?;
                        trace!("Channel {} reached end-of-stream", id);
                    }
                    Ok(n) => {
                        source.pending.extend_from_slice(&buf[..n]);
                        source.drain_lines(id, &mut on_line)?;
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(error) => {
                        return Err(FanInError::Read {
                            source_id: id,
                            error,
                        }
                        .into())
                    }
                }
            }
        }
    }

    /// Block until at least one of `active` is readable or hung up
    fn wait_ready(&self, active: &[usize]) -> Result<Vec<usize>, FanInError> {
        let mut fds: Vec<PollFd<'_>> = active
            .iter()
            .map(|&i| PollFd::new(self.sources[i].reader.as_fd(), PollFlags::POLLIN))
            .collect();

        loop {
            match poll(&mut fds, PollTimeout::NONE) {
                Ok(_) => break,
                Err(Errno::EINTR) => continue,
                Err(errno) => return Err(FanInError::Poll(io::Error::from(errno))),
            }
        }

        let wake =
            PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR | PollFlags::POLLNVAL;
        Ok(active
            .iter()
            .zip(&fds)
            .filter(|(_, fd)| fd.revents().is_some_and(|r| r.intersects(wake)))
            .map(|(&i, _)| i)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::net::UnixStream;

    #[derive(Debug)]
    enum TestError {
        FanIn(FanInError),
        Stop,
    }

    impl From<FanInError> for TestError {
        fn from(err: FanInError) -> Self {
            TestError::FanIn(err)
        }
    }

    fn collect(readers: Vec<UnixStream>) -> Vec<(usize, String)> {
        let mut lines = Vec::new();
        FanIn::new(readers)
            .run(|id, line| {
                lines.push((id, line.to_string()));
                Ok::<_, TestError>(())
            })
            .unwrap();
        lines
    }

    #[test]
    fn test_reads_all_sources_to_end() {
        let (mut w0, r0) = UnixStream::pair().unwrap();
        let (mut w1, r1) = UnixStream::pair().unwrap();
        w0.write_all(b"alpha\nbeta\n").unwrap();
        w1.write_all(b"gamma\n").unwrap();
        drop(w0);
        drop(w1);

        let mut lines = collect(vec![r0, r1]);
        lines.sort();
        assert_eq!(
            lines,
            vec![
                (0, "alpha".to_string()),
                (0, "beta".to_string()),
                (1, "gamma".to_string()),
            ]
        );
    }

    #[test]
    fn test_preserves_order_within_a_source() {
        let (mut w, r) = UnixStream::pair().unwrap();
        let body: String = (0..2000).map(|i| format!("w{i}\n")).collect();
        let writer = std::thread::spawn(move || w.write_all(body.as_bytes()));

        let lines = collect(vec![r]);
        writer.join().unwrap().unwrap();

        assert_eq!(lines.len(), 2000);
        for (i, (id, line)) in lines.iter().enumerate() {
            assert_eq!(*id, 0);
            assert_eq!(line, &format!("w{i}"));
        }
    }

    #[test]
    fn test_flushes_unterminated_tail_and_skips_blank_lines() {
        let (mut w, r) = UnixStream::pair().unwrap();
        w.write_all(b"one\n\n\ntwo").unwrap();
        drop(w);

        let lines = collect(vec![r]);
        assert_eq!(lines, vec![(0, "one".to_string()), (0, "two".to_string())]);
    }

    #[test]
    fn test_empty_source_closes_immediately() {
        let (w, r) = UnixStream::pair().unwrap();
        drop(w);
        assert!(collect_from(FanIn::new(vec![r])).is_empty());
    }

    fn collect_from(fan_in: FanIn<UnixStream>) -> Vec<String> {
        let mut lines = Vec::new();
        fan_in
            .run(|_, line| {
                lines.push(line.to_string());
                Ok::<_, TestError>(())
            })
            .unwrap();
        lines
    }

    #[test]
    fn test_callback_error_stops_the_loop() {
        let (mut w, r) = UnixStream::pair().unwrap();
        w.write_all(b"first\nsecond\n").unwrap();
        drop(w);

        let result = FanIn::new(vec![r]).run(|_, _| Err(TestError::Stop));
        assert!(matches!(result, Err(TestError::Stop)));
    }

    #[test]
    fn test_no_sources_returns_immediately() {
        assert!(collect(Vec::new()).is_empty());
    }
}
