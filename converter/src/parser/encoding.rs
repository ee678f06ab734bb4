//! Dump file reading with encoding auto-detection.
//!
//! The first buffered block of a dump is sniffed with `chardet`; every line
//! is then decoded with the matching `encoding_rs` codec. Lines are read one
//! at a time so arbitrarily large dumps stream through in constant memory.

use encoding_rs::Encoding;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{InputError, InputResult};

/// Bytes buffered ahead of the first line, and used for sniffing.
const SNIFF_CAPACITY: usize = 64 * 1024;

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Map a normalized charset name to a codec, falling back to UTF-8.
pub fn codec_for(encoding: &str) -> &'static Encoding {
    match encoding {
        "utf-8" => encoding_rs::UTF_8,
        "iso-8859-1" => encoding_rs::ISO_8859_15,
        "windows-1252" => encoding_rs::WINDOWS_1252,
        other => Encoding::for_label(other.as_bytes()).unwrap_or(encoding_rs::UTF_8),
    }
}

/// Decode one line of bytes. Invalid sequences become U+FFFD.
pub fn decode_line(bytes: &[u8], codec: &'static Encoding) -> String {
    codec.decode_without_bom_handling(bytes).0.into_owned()
}

/// Line iterator over a dump, yielding decoded lines without terminators.
pub struct DumpReader<R> {
    inner: R,
    codec: &'static Encoding,
    line: usize,
    buf: Vec<u8>,
}

impl DumpReader<BufReader<File>> {
    /// Open a dump file.
    pub fn open<P: AsRef<Path>>(path: P) -> InputResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(BufReader::with_capacity(SNIFF_CAPACITY, file))
    }
}

impl<R: BufRead> DumpReader<R> {
    /// Wrap a buffered reader, sniffing its encoding from the first block.
    pub fn new(mut inner: R) -> InputResult<Self> {
        let sniffed = inner
            .fill_buf()
            .map_err(|source| InputError::Read { line: 1, source })?;
        let codec = codec_for(&detect_encoding(sniffed));

        Ok(Self {
            inner,
            codec,
            line: 0,
            buf: Vec::new(),
        })
    }

    /// Number of lines read so far.
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Read the next line, or `None` at end of input.
    pub fn next_line(&mut self) -> InputResult<Option<String>> {
        self.buf.clear();
        let read = self
            .inner
            .read_until(b'\n', &mut self.buf)
            .map_err(|source| InputError::Read {
                line: self.line + 1,
                source,
            })?;

        if read == 0 {
            return Ok(None);
        }
        self.line += 1;

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }

        Ok(Some(decode_line(&self.buf, self.codec)))
    }
}

impl<R: BufRead> Iterator for DumpReader<R> {
    type Item = InputResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
