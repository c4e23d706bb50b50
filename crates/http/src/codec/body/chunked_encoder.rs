use bytes::{BufMut, BytesMut};
use std::io::Write;

use tokio_util::codec::Encoder;

use crate::codec::FastWrite;
use crate::codec::header::HeaderEncoder;
use crate::protocol::{Headers, SendError};
use crate::utils::CRLF;

/// One piece of a chunked body.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ChunkItem<'a> {
    /// `<hex-len>\r\n<data>\r\n`
    Chunk(&'a [u8]),
    /// `0\r\n`, the trailer fields, then the final blank line
    Last(&'a Headers),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ChunkedEncoder {
    eof: bool,
}

impl ChunkedEncoder {
    pub(crate) fn new() -> Self {
        Self { eof: false }
    }

    /// Whether the terminating chunk has been encoded.
    pub(crate) fn is_finish(&self) -> bool {
        self.eof
    }
}

impl Encoder<ChunkItem<'_>> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, item: ChunkItem<'_>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.eof {
            return Ok(());
        }

        match item {
            // a zero length chunk would terminate the body
            ChunkItem::Chunk([]) => Ok(()),
            ChunkItem::Chunk(bytes) => {
                write!(FastWrite(dst), "{:x}\r\n", bytes.len())?;
                dst.reserve(bytes.len() + CRLF.len());
                dst.put_slice(bytes);
                dst.put_slice(CRLF);
                Ok(())
            }
            ChunkItem::Last(trailers) => {
                self.eof = true;
                dst.put_slice(b"0\r\n");
                HeaderEncoder.encode(trailers, dst)
            }
        }
    }
}
