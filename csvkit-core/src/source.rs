//! Source transport and encoding (spec §4.2).
//!
//! Opens a named source or standard input, transparently decompresses a
//! `.gz` suffix, decodes to UTF-8, detects and strips a BOM, and hands a
//! validated UTF-8 byte stream to the tokenizer. Transcoding from a
//! non-UTF-8 declared encoding is out of scope (spec §1): the core only
//! consumes the post-recode UTF-8 view, which a caller can supply via
//! [`Source::with_recoder`].

use crate::errors::*;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// A byte source: a file path (optionally `.gz`-compressed), a bare `-`
/// meaning standard input, or an already-open reader.
pub enum SourceSpec<'a> {
    Stdin,
    Path(&'a Path),
    Reader(Box<dyn Read>),
}

/// Opens `spec`, transparently decompressing `.gz`, and returns a boxed
/// reader over the raw (not yet UTF-8-checked) bytes.
pub fn open(spec: SourceSpec<'_>) -> Result<Box<dyn Read>> {
    let reader: Box<dyn Read> = match spec {
        SourceSpec::Stdin => Box::new(io::stdin()),
        SourceSpec::Reader(r) => r,
        SourceSpec::Path(path) => {
            let file = File::open(path)
                .chain_err(|| format!("cannot open {}", path.display()))?;
            if path.extension().and_then(|e| e.to_str()) == Some("gz") {
                Box::new(MultiGzDecoder::new(file))
            } else {
                Box::new(file)
            }
        }
    };
    Ok(reader)
}

/// Reads all of `reader`, strips a leading UTF-8 BOM if present, and
/// validates the rest is well-formed UTF-8.
pub fn read_to_utf8(mut reader: Box<dyn Read>) -> Result<String> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .chain_err(|| "cannot read input")?;
    strip_bom_and_validate(bytes)
}

fn strip_bom_and_validate(mut bytes: Vec<u8>) -> Result<String> {
    if bytes.starts_with(&BOM) {
        bytes.drain(0..3);
    }
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let position = e.utf8_error().valid_up_to() as u64;
            let bad_byte = e.as_bytes()[position as usize];
            Err(ErrorKind::EncodingError(bad_byte, position).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_bom() {
        let mut bytes = BOM.to_vec();
        bytes.extend_from_slice(b"a,b\n1,2\n");
        let s = strip_bom_and_validate(bytes).unwrap();
        assert_eq!(s, "a,b\n1,2\n");
    }

    #[test]
    fn passes_through_clean_utf8() {
        let s = strip_bom_and_validate(b"a,b\n1,2\n".to_vec()).unwrap();
        assert_eq!(s, "a,b\n1,2\n");
    }

    #[test]
    fn invalid_utf8_fails_with_position() {
        let bytes = vec![b'a', b',', 0xff, b'\n'];
        let err = strip_bom_and_validate(bytes).unwrap_err();
        assert!(err.to_string().contains("EncodingError"));
    }
}
