//! Program image codec: a flat run of big-endian platters, no header.

use crate::{error::ImageError, Platter};
use blake3::Hasher;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramImage {
    words: Vec<Platter>,
    trailing: usize,
    cid: String,
}

impl ProgramImage {
    /// Decode complete 4-byte groups. A trailing partial group is dropped.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let chunks = bytes.chunks_exact(4);
        let trailing = chunks.remainder().len();
        let words = chunks
            .map(|c| Platter::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Self { words, trailing, cid: cid_b3(bytes) }
    }

    pub fn from_words(words: Vec<Platter>) -> Self {
        let cid = cid_b3(&encode_words(&words));
        Self { words, trailing: 0, cid }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|source| ImageError::Read { path: path.to_path_buf(), source })?;
        let image = Self::from_bytes(&bytes);
        if image.trailing > 0 {
            warn!(path = %path.display(), dropped = image.trailing, "image length not a multiple of 4");
        }
        debug!(path = %path.display(), words = image.words.len(), cid = %image.cid, "image loaded");
        Ok(image)
    }

    pub fn words(&self) -> &[Platter] {
        &self.words
    }

    pub fn into_words(self) -> Vec<Platter> {
        self.words
    }

    /// Bytes dropped from the end of the source because they did not form a full platter.
    pub fn trailing_bytes(&self) -> usize {
        self.trailing
    }

    /// `b3:<hex>` digest of the source bytes.
    pub fn cid(&self) -> &str {
        &self.cid
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        encode_words(&self.words)
    }
}

fn encode_words(words: &[Platter]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

pub fn cid_b3(bytes: &[u8]) -> String {
    let mut h = Hasher::new();
    h.update(bytes);
    format!("b3:{}", hex::encode(h.finalize().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn big_endian_words() {
        let img = ProgramImage::from_bytes(&[0xD0, 0x00, 0x00, 0x48, 0x70, 0x00, 0x00, 0x00]);
        assert_eq!(img.words(), &[0xD000_0048, 0x7000_0000]);
        assert_eq!(img.trailing_bytes(), 0);
        assert_eq!(img.to_bytes().len(), 8);
    }

    #[test]
    fn trailing_bytes_are_dropped() {
        for extra in 1..=3 {
            let mut bytes = vec![0, 0, 0, 1];
            bytes.extend(std::iter::repeat(0xAA).take(extra));
            let img = ProgramImage::from_bytes(&bytes);
            assert_eq!(img.words(), &[1]);
            assert_eq!(img.trailing_bytes(), extra);
        }
        assert!(ProgramImage::from_bytes(&[1, 2]).words().is_empty());
    }

    #[test]
    fn cid_shape_and_stability() {
        let a = ProgramImage::from_bytes(&[0, 0, 0, 7]);
        let b = ProgramImage::from_words(vec![7]);
        assert!(a.cid().starts_with("b3:"));
        assert_eq!(a.cid().len(), 3 + 64);
        assert_eq!(a.cid(), b.cid());
        assert_ne!(a.cid(), ProgramImage::from_words(vec![8]).cid());
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x70, 0, 0, 0, 0xFF]).unwrap();
        let img = ProgramImage::load(file.path()).unwrap();
        assert_eq!(img.words(), &[0x7000_0000]);
        assert_eq!(img.trailing_bytes(), 1);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.umz");
        let err = ProgramImage::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("read "), "{err}");
        assert!(err.to_string().contains("nope.umz"));
    }
}
