//! pkt-line re-exports and helpers for reading and writing advertisements.

use gix_packetline_blocking as pkt;

pub use pkt::{PacketLineRef, StreamingPeekableIter as PktIter, Writer as PktWriter};

use crate::{Error, Result};

/// Create a pkt-line writer in text mode, which newline-terminates every line written to it.
pub fn text_writer<W: std::io::Write>(w: W) -> PktWriter<W> {
    let mut out = PktWriter::new(w);
    out.enable_text_mode();
    out
}

/// Write a flush packet.
pub fn write_flush<W: std::io::Write>(w: &mut PktWriter<W>) -> std::io::Result<()> {
    pkt::encode::flush_to_write(w.inner_mut()).map(|_| ())
}

/// Write each of `lines` as its own pkt-line, then a flush packet.
pub fn write_section<W: std::io::Write>(w: &mut PktWriter<W>, lines: &[&[u8]]) -> std::io::Result<()> {
    use std::io::Write;
    for line in lines {
        w.write_all(line)?;
    }
    write_flush(w)
}

/// Split `data` into its flush-terminated sections, each a list of data payloads.
///
/// Payloads keep their trailing newline, if any. Delimiter and response-end packets carry no
/// meaning in a v0 advertisement and are skipped. A trailing section that is not terminated by a
/// flush is still returned.
pub fn read_sections(mut data: &[u8]) -> Result<Vec<Vec<Vec<u8>>>> {
    let mut sections = Vec::new();
    let mut lines = Vec::new();
    while !data.is_empty() {
        match pkt::decode::streaming(data)? {
            pkt::decode::Stream::Complete { line, bytes_consumed } => {
                match line {
                    PacketLineRef::Data(d) => lines.push(d.to_vec()),
                    PacketLineRef::Flush => sections.push(std::mem::take(&mut lines)),
                    PacketLineRef::Delimiter | PacketLineRef::ResponseEnd => {}
                }
                data = &data[bytes_consumed..];
            }
            pkt::decode::Stream::Incomplete { bytes_needed } => {
                return Err(Error::Truncated { bytes_needed });
            }
        }
    }
    if !lines.is_empty() {
        sections.push(lines);
    }
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_split_at_flush_packets() {
        let mut buf = Vec::new();
        let mut w = text_writer(&mut buf);
        write_section(&mut w, &[b"# service=git-upload-pack"]).unwrap();
        write_section(&mut w, &[b"a", b"b"]).unwrap();

        let sections = read_sections(&buf).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0], vec![b"# service=git-upload-pack\n".to_vec()]);
        assert_eq!(sections[1], vec![b"a\n".to_vec(), b"b\n".to_vec()]);
    }

    #[test]
    fn unterminated_tail_is_kept() {
        let sections = read_sections(b"0006a\n").unwrap();
        assert_eq!(sections, vec![vec![b"a\n".to_vec()]]);
    }

    #[test]
    fn short_packets_are_reported_as_truncated() {
        assert!(matches!(read_sections(b"000aab"), Err(Error::Truncated { .. })));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(read_sections(b"zzzz"), Err(Error::Decode(_))));
    }
}
