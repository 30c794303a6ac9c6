//! Byte-stream seams between the machine and its host.

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read, Write};

pub trait ByteSource {
    /// Block until a byte is available. `None` signals end of input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

pub trait ByteSink {
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ── std::io adapters ─────────────────────────────────────────────

pub struct StreamSource<R: Read> {
    inner: R,
}

impl<R: Read> StreamSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for StreamSource<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

pub struct StreamSink<W: Write> {
    inner: W,
}

impl<W: Write> StreamSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ByteSink for StreamSink<W> {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.inner.write_all(&[byte])
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ── In-memory providers ──────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct MemSource {
    bytes: VecDeque<u8>,
}

impl MemSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self { bytes: bytes.into() }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }
}

impl ByteSource for MemSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.bytes.pop_front())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemSink {
    bytes: Vec<u8>,
}

impl MemSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl ByteSink for MemSink {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.bytes.push(byte);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flaky {
        interrupted: bool,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            buf[0] = b'z';
            Ok(1)
        }
    }

    #[test]
    fn stream_source_reads_then_eof() {
        let mut src = StreamSource::new(&b"ab"[..]);
        assert_eq!(src.read_byte().unwrap(), Some(b'a'));
        assert_eq!(src.read_byte().unwrap(), Some(b'b'));
        assert_eq!(src.read_byte().unwrap(), None);
        assert_eq!(src.read_byte().unwrap(), None);
    }

    #[test]
    fn stream_source_retries_interrupted() {
        let mut src = StreamSource::new(Flaky { interrupted: false });
        assert_eq!(src.read_byte().unwrap(), Some(b'z'));
    }

    #[test]
    fn stream_sink_writes_through() {
        let mut sink = StreamSink::new(Vec::new());
        sink.write_byte(1).unwrap();
        sink.write_byte(255).unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.into_inner(), vec![1, 255]);
    }

    #[test]
    fn mem_providers() {
        let mut src = MemSource::new(b"x".to_vec());
        assert_eq!(src.remaining(), 1);
        assert_eq!(src.read_byte().unwrap(), Some(b'x'));
        assert_eq!(src.read_byte().unwrap(), None);

        let mut sink = MemSink::new();
        sink.write_byte(72).unwrap();
        assert_eq!(sink.bytes(), b"H");
    }
}
