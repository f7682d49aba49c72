use std::io::{self, Read};

use log::{error, warn};
use xml::attribute::OwnedAttribute;
use xml::reader::XmlEvent;
use xml::EventReader;

use crate::error::{Diagnostic, TmxError};
use crate::util::{get_attrs, scan_numbers};

/// Initial output-buffer guess handed to [`decompress`] by the layer path.
/// Only a hint: the buffer doubles as often as the stream demands.
pub(crate) const DECOMPRESS_SIZE_HINT: usize = 256;

/// Everything extracted from a layer's data element.
pub(crate) struct LayerData {
    pub encoding: String,
    pub compression: Option<String>,
    pub tiles: Vec<u32>,
}

/// Parses the data element of a layer, dispatching on its encoding.
///
/// CSV and base64 (raw or zlib/gzip compressed) payloads decode to the
/// layer's global tile ids. Any other encoding leaves the tile sequence
/// empty and records a warning diagnostic; the load carries on.
pub(crate) fn parse_data<R: Read>(
    parser: &mut EventReader<R>,
    attrs: Vec<OwnedAttribute>,
    layer: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<LayerData, TmxError> {
    let (compression, encoding) = get_attrs!(
        attrs,
        optionals: [
            ("compression", compression, |v| Some(v)),
        ],
        required: [
            ("encoding", encoding, |v| Some(v)),
        ],
        TmxError::MalformedAttributes("data must have an encoding".to_string())
    );

    let text = parse_data_text(parser)?;
    let tiles = match encoding.as_ref() {
        "csv" => scan_numbers(&text)?,
        "base64" => {
            let bytes = base64::decode(text.trim().as_bytes())
                .map_err(TmxError::Base64DecodingError)?;
            let bytes = match compression.as_deref() {
                None => bytes,
                Some(_) => match decompress(&bytes, DECOMPRESS_SIZE_HINT) {
                    Ok(inflated) => inflated,
                    Err(e) => {
                        let diagnostic = Diagnostic::DecompressionFailed {
                            layer: layer.to_string(),
                            detail: e.to_string(),
                        };
                        error!("{}", diagnostic);
                        diagnostics.push(diagnostic);
                        Vec::new()
                    }
                },
            };
            convert_to_gids(&bytes)
        }
        other => {
            let diagnostic = Diagnostic::UnknownEncoding {
                layer: layer.to_string(),
                encoding: other.to_string(),
            };
            warn!("{}", diagnostic);
            diagnostics.push(diagnostic);
            Vec::new()
        }
    };

    Ok(LayerData {
        encoding,
        compression,
        tiles,
    })
}

/// Returns the text content of the data element, or an empty string when the
/// element closes without any.
fn parse_data_text<R: Read>(parser: &mut EventReader<R>) -> Result<String, TmxError> {
    loop {
        match parser.next().map_err(TmxError::XmlDecodingError)? {
            XmlEvent::Characters(s) => return Ok(s),
            XmlEvent::EndElement { name, .. } => {
                if name.local_name == "data" {
                    return Ok(String::new());
                }
            }
            XmlEvent::EndDocument => {
                return Err(TmxError::PrematureEnd(
                    "Document ended inside a data element".to_string(),
                ))
            }
            _ => {}
        }
    }
}

/// Regroups a raw byte stream into little-endian u32 global tile ids. A
/// trailing group of fewer than four bytes is dropped, not an error.
pub(crate) fn convert_to_gids(all: &[u8]) -> Vec<u32> {
    all.chunks_exact(4)
        .map(|chunk| {
            chunk[0] as u32
                | (chunk[1] as u32) << 8
                | (chunk[2] as u32) << 16
                | (chunk[3] as u32) << 24
        })
        .collect()
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Inflates a zlib- or gzip-wrapped buffer of unknown decompressed size.
///
/// The wrapper is detected from the stream itself, so callers never name the
/// scheme. The output buffer starts at `size_hint` bytes and doubles
/// whenever the inflater fills it before reaching the end of the stream;
/// inflation resumes into the appended space rather than restarting.
pub(crate) fn decompress(data: &[u8], size_hint: usize) -> Result<Vec<u8>, TmxError> {
    if data.starts_with(&GZIP_MAGIC) {
        decode_gzip(data, size_hint)
    } else {
        decode_zlib(data, size_hint)
    }
}

fn decode_zlib(data: &[u8], size_hint: usize) -> Result<Vec<u8>, TmxError> {
    use flate2::{Decompress, FlushDecompress, Status};

    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(size_hint.max(1));
    loop {
        let consumed = inflater.total_in() as usize;
        let status = inflater
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::Finish)
            .map_err(|e| {
                TmxError::DecompressingError(io::Error::new(io::ErrorKind::InvalidData, e))
            })?;
        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                if out.len() < out.capacity() {
                    // Spare output space left means the input ran out first.
                    return Err(TmxError::DecompressingError(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "compressed data ended before the end of the stream",
                    )));
                }
                out.reserve_exact(out.capacity());
            }
        }
    }
    if (inflater.total_in() as usize) < data.len() {
        return Err(TmxError::DecompressingError(io::Error::new(
            io::ErrorKind::InvalidData,
            "compressed data continues past the end of the stream",
        )));
    }
    Ok(out)
}

fn decode_gzip(data: &[u8], size_hint: usize) -> Result<Vec<u8>, TmxError> {
    use flate2::read::GzDecoder;

    let mut decoder = GzDecoder::new(data);
    let mut out = vec![0; size_hint.max(1)];
    let mut filled = 0;
    loop {
        if filled == out.len() {
            out.resize(out.len() * 2, 0);
        }
        match decoder.read(&mut out[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) => return Err(TmxError::DecompressingError(e)),
        }
    }
    out.truncate(filled);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::{GzEncoder, ZlibEncoder};
    use flate2::Compression;

    use super::{convert_to_gids, decompress, DECOMPRESS_SIZE_HINT};

    fn zlib(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn zlib_round_trips_with_any_size_hint() {
        let original: Vec<u8> = (0..2048u32).map(|n| (n % 251) as u8).collect();
        let compressed = zlib(&original);
        // Guesses below, at and above the true output size must all work.
        for hint in [1, 16, original.len(), original.len() * 2] {
            assert_eq!(decompress(&compressed, hint).unwrap(), original);
        }
    }

    #[test]
    fn gzip_round_trips_with_any_size_hint() {
        let original: Vec<u8> = (0..2048u32).map(|n| (n % 13) as u8).collect();
        let compressed = gzip(&original);
        for hint in [1, DECOMPRESS_SIZE_HINT, original.len() * 2] {
            assert_eq!(decompress(&compressed, hint).unwrap(), original);
        }
    }

    #[test]
    fn garbage_input_is_an_error() {
        assert!(decompress(b"not a zlib stream", DECOMPRESS_SIZE_HINT).is_err());
    }

    #[test]
    fn truncated_stream_is_an_error() {
        let compressed = zlib(&[7u8; 4096]);
        let truncated = &compressed[..compressed.len() / 2];
        assert!(decompress(truncated, DECOMPRESS_SIZE_HINT).is_err());
    }

    #[test]
    fn trailing_bytes_after_stream_end_are_an_error() {
        let mut compressed = zlib(b"abc");
        compressed.extend_from_slice(b"junk");
        assert!(decompress(&compressed, DECOMPRESS_SIZE_HINT).is_err());
    }

    #[test]
    fn gids_regroup_little_endian() {
        let bytes = [0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0x80];
        assert_eq!(convert_to_gids(&bytes), vec![1, 0x8002_0100]);
    }

    #[test]
    fn trailing_partial_gid_is_dropped() {
        let bytes = [0x2a, 0x00, 0x00, 0x00, 0xff, 0xff];
        assert_eq!(convert_to_gids(&bytes), vec![42]);
    }
}
