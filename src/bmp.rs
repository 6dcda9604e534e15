//! Self-contained BMP pixel decoder.
//!
//! The raster codec collaborator (the `image` crate build we ship) handles
//! JPEG, PNG, and GIF; BMP is decoded here instead, by hand. The format is
//! simple enough that owning the decoder costs less than another codec
//! feature: two fixed little-endian headers, an optional color table, and
//! bottom-up scanlines padded to 4-byte boundaries.
//!
//! Supported bit depths are 1, 4, 8, 16, and 24. Depths below 24 resolve
//! pixels through the color table; 16-bit streams store a big-endian table
//! index per pixel, sub-byte depths pack several pixels per byte.
//!
//! The decoder allocates a fresh buffer per call and touches no shared
//! state, so independent decodes may run in parallel.

use crate::error::{CanvasError, Result};
use image::{Rgb, RgbImage};

/// `BM`, read as a little-endian u16.
const SIGNATURE: u16 = 0x4D42;

/// Parsed BMP headers (14-byte file header + 40-byte info header).
#[derive(Debug, Clone, Copy)]
struct Header {
    file_size: u32,
    pixel_offset: u32,
    width: u32,
    /// Stored height. The sign/order convention makes this format
    /// bottom-up: the first scanline in the stream is the bottom image row.
    height: u32,
    depth: Depth,
    /// Declared size of the raw scanline data; 0 means "derive from the
    /// file size and pixel offset".
    raw_size: u32,
}

impl Header {
    fn effective_raw_size(&self) -> usize {
        if self.raw_size == 0 {
            self.file_size.saturating_sub(self.pixel_offset) as usize
        } else {
            self.raw_size as usize
        }
    }
}

/// Bit depth of the pixel samples. Each variant owns its own extraction
/// rule, so the per-depth bit twiddling stays isolated and unit-testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Depth {
    Bits1,
    Bits4,
    Bits8,
    Bits16,
    Bits24,
}

impl Depth {
    fn from_bits(bits: u16) -> Result<Self> {
        match bits {
            1 => Ok(Depth::Bits1),
            4 => Ok(Depth::Bits4),
            8 => Ok(Depth::Bits8),
            16 => Ok(Depth::Bits16),
            24 => Ok(Depth::Bits24),
            other => Err(CanvasError::UnsupportedDepth(other)),
        }
    }

    fn bits(self) -> usize {
        match self {
            Depth::Bits1 => 1,
            Depth::Bits4 => 4,
            Depth::Bits8 => 8,
            Depth::Bits16 => 16,
            Depth::Bits24 => 24,
        }
    }

    /// Number of color-table entries this depth expects: 2^bits for
    /// palette-indexed depths, none for direct-color 24-bit.
    fn palette_len(self) -> usize {
        match self {
            Depth::Bits24 => 0,
            _ => 1usize << self.bits(),
        }
    }

    /// Extract pixel `x` from one unpadded scanline.
    ///
    /// The palette is guaranteed by the decoder to hold exactly
    /// [`palette_len`](Self::palette_len) entries, which covers every index
    /// value the depth can produce.
    fn pixel(self, row: &[u8], x: usize, palette: &[Rgb<u8>]) -> Rgb<u8> {
        match self {
            Depth::Bits24 => {
                // Packed B, G, R triplet.
                let i = x * 3;
                Rgb([row[i + 2], row[i + 1], row[i]])
            }
            Depth::Bits16 => {
                // Big-endian-packed color-table index.
                let i = x * 2;
                let index = u16::from_be_bytes([row[i], row[i + 1]]);
                palette[index as usize]
            }
            Depth::Bits8 => palette[row[x] as usize],
            Depth::Bits4 => {
                // Two pixels per byte: even position takes the high nibble.
                let byte = row[x / 2];
                let index = if x % 2 == 0 { byte >> 4 } else { byte & 0x0F };
                palette[index as usize]
            }
            Depth::Bits1 => {
                // Eight pixels per byte, bit 0 of the row = most significant.
                let byte = row[x / 8];
                let index = (byte >> (7 - (x % 8))) & 1;
                palette[index as usize]
            }
        }
    }
}

/// Bytes of pixel payload in one scanline, before padding.
fn row_payload(width: u32, bits: usize) -> usize {
    (width as usize * bits).div_ceil(8)
}

/// Full scanline length in the stream: payload rounded up to a 4-byte
/// boundary.
fn row_stride(width: u32, bits: usize) -> usize {
    (width as usize * bits).div_ceil(32) * 4
}

/// Padding bytes appended after each scanline (0..=3; a would-be padding
/// of 4 is 0).
fn row_padding(width: u32, bits: usize) -> usize {
    row_stride(width, bits) - row_payload(width, bits)
}

/// Little-endian field reader over the raw stream. Every read is
/// bounds-checked so malformed streams fail with `TruncatedData` instead
/// of reading out of range.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(CanvasError::TruncatedData {
            needed: usize::MAX,
            available: self.bytes.len(),
        })?;
        if end > self.bytes.len() {
            return Err(CanvasError::TruncatedData {
                needed: end,
                available: self.bytes.len(),
            });
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

fn parse_header(r: &mut Reader) -> Result<Header> {
    // 14-byte file header.
    let magic = r.u16()?;
    if magic != SIGNATURE {
        return Err(CanvasError::BadSignature { found: magic });
    }
    let file_size = r.u32()?;
    let _reserved = r.u32()?;
    let pixel_offset = r.u32()?;

    // 40-byte info header.
    let _header_size = r.u32()?;
    let width = r.u32()?;
    let height = r.u32()?;
    let _planes = r.u16()?;
    let depth = Depth::from_bits(r.u16()?)?;
    let _compression = r.u32()?;
    let raw_size = r.u32()?;
    let _horiz_resolution = r.u32()?;
    let _vert_resolution = r.u32()?;
    let _colors_used = r.u32()?;
    let _colors_important = r.u32()?;

    Ok(Header {
        file_size,
        pixel_offset,
        width,
        height,
        depth,
        raw_size,
    })
}

/// Color table immediately following the info header: packed 32-bit
/// little-endian `0x00RRGGBB` entries.
fn parse_palette(r: &mut Reader, count: usize) -> Result<Vec<Rgb<u8>>> {
    let bytes = r.take(count * 4)?;
    Ok(bytes
        .chunks_exact(4)
        .map(|entry| {
            let packed = u32::from_le_bytes([entry[0], entry[1], entry[2], entry[3]]);
            Rgb([
                (packed >> 16) as u8,
                (packed >> 8) as u8,
                packed as u8,
            ])
        })
        .collect())
}

/// Decode a BMP byte stream into an RGB pixel buffer.
///
/// Fails with [`CanvasError::BadSignature`] when the two-byte magic is not
/// `BM`, [`CanvasError::UnsupportedDepth`] for bit depths outside
/// {1, 4, 8, 16, 24}, and [`CanvasError::TruncatedData`] when the stream
/// ends before the scanlines its headers declare.
pub fn decode(bytes: &[u8]) -> Result<RgbImage> {
    let mut reader = Reader::new(bytes);
    let header = parse_header(&mut reader)?;
    let palette = parse_palette(&mut reader, header.depth.palette_len())?;

    let width = header.width;
    let height = header.height;
    let bits = header.depth.bits();
    let stride = row_stride(width, bits);
    let payload = row_payload(width, bits);

    let data = reader.remaining();
    let declared = header.effective_raw_size().min(data.len());
    let data = &data[..declared];

    // The stream must hold every scanline the headers declare (only the
    // final row's trailing padding may be absent, since no pixel is read
    // from it). Checking up front, before the output buffer exists, also
    // bounds the allocation by the input length: a headers-only stream
    // claiming huge dimensions fails here instead of allocating.
    if height > 0 {
        let needed = (height as usize - 1)
            .saturating_mul(stride)
            .saturating_add(payload);
        if needed > data.len() {
            return Err(CanvasError::TruncatedData {
                needed,
                available: data.len(),
            });
        }
    }

    let mut out = RgbImage::new(width, height);

    // Scanlines are stored bottom-up: the first row of the stream is the
    // last row of the image.
    for file_row in 0..height as usize {
        let start = file_row * stride;
        let row = &data[start..start + payload];
        let y = height - 1 - file_row as u32;
        for x in 0..width as usize {
            out.put_pixel(x as u32, y, header.depth.pixel(row, x, &palette));
        }
    }

    Ok(out)
}
