use crate::constants::{HIDDEN_BIT_MASK, LENGTH_PREFIX_BITS, TERMINATOR_LEN};
use image::{Rgba, RgbaImage};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    #[error(
        "the secret produces a run of zero bits at offset {0} that would be read back as the terminator"
    )]
    AmbiguousZeroRun(usize),

    #[error("no terminator found within the {0}x{1} image; it may not contain a hidden message")]
    TerminatorNotFound(u32, u32),

    #[error("cover image has {available} pixels but the secret needs {required}")]
    CoverTooSmall { required: usize, available: usize },

    #[error("image is too small to hold a length prefix")]
    MissingLengthPrefix,

    #[error("length prefix declares {declared} symbols but only {available} pixels remain")]
    PayloadTruncated { declared: usize, available: usize },
}

/// Pixel traversal order shared by embed and extract. Both sides must use the
/// same order or the recovered bit stream is garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOrder {
    /// Top-to-bottom rows, left-to-right within each row. The wire-compatible
    /// default.
    #[default]
    RowMajor,
    ColumnMajor,
}

impl ScanOrder {
    fn coordinates(self, width: u32, height: u32) -> Box<dyn Iterator<Item = (u32, u32)>> {
        match self {
            ScanOrder::RowMajor => {
                Box::new((0..height).flat_map(move |y| (0..width).map(move |x| (x, y))))
            }
            ScanOrder::ColumnMajor => {
                Box::new((0..width).flat_map(move |x| (0..height).map(move |y| (x, y))))
            }
        }
    }
}

/// How the end of the hidden message is signalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Termination {
    /// End of message is implied by a run of [`TERMINATOR_LEN`] zero symbols,
    /// which embedding emits naturally once the secret is exhausted. The
    /// wire-compatible default.
    #[default]
    ZeroRun,
    /// A 32-bit symbol count occupies the first pixels. Not wire compatible
    /// with `ZeroRun`, but zero symbols inside the secret are representable.
    LengthPrefix,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CodecOptions {
    pub scan_order: ScanOrder,
    pub termination: Termination,
}

/// Maximum number of secret bytes an image of the given dimensions can carry.
/// Deliberately loose (`W*H*3/8` rather than the tight one-bit-per-pixel
/// bound) to leave headroom for the terminator.
pub fn capacity(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3 / 8
}

/// A secret exactly at capacity is rejected.
pub fn can_fit(width: u32, height: u32, payload_len: usize) -> bool {
    payload_len < capacity(width, height)
}

/// Hides `payload` in a copy of `cover`, one symbol per pixel in the red
/// channel's least significant bit. Each payload byte contributes a single
/// symbol, its own least significant bit; green, blue and alpha are copied
/// unchanged. Pixels past the end of the payload receive zero bits, which in
/// `ZeroRun` mode is what forms the terminator.
///
/// A payload longer than the pixel count is silently truncated in `ZeroRun`
/// mode; callers are expected to guard with [`can_fit`] first.
pub fn embed(
    cover: &RgbaImage,
    payload: &[u8],
    options: &CodecOptions,
) -> Result<RgbaImage, CodecError> {
    let (width, height) = cover.dimensions();
    let symbols = symbol_stream(payload, width, height, options.termination)?;

    let mut stream = symbols.into_iter();
    let mut stego = RgbaImage::new(width, height);
    for (x, y) in options.scan_order.coordinates(width, height) {
        let Rgba([red, green, blue, alpha]) = *cover.get_pixel(x, y);
        let bit = stream.next().unwrap_or(0);
        stego.put_pixel(
            x,
            y,
            Rgba([(red & !HIDDEN_BIT_MASK) | bit, green, blue, alpha]),
        );
    }

    Ok(stego)
}

/// Recovers the hidden symbol sequence from an encoded image. Each returned
/// byte is a single symbol valued 0 or 1, mirroring the one-symbol-per-pixel
/// embedding granularity; no 8-bit reassembly is performed.
pub fn extract(encoded: &RgbaImage, options: &CodecOptions) -> Result<Vec<u8>, CodecError> {
    match options.termination {
        Termination::ZeroRun => extract_zero_run(encoded, options.scan_order),
        Termination::LengthPrefix => extract_length_prefixed(encoded, options.scan_order),
    }
}

fn symbol_stream(
    payload: &[u8],
    width: u32,
    height: u32,
    termination: Termination,
) -> Result<Vec<u8>, CodecError> {
    let payload_symbols = payload.iter().map(|byte| byte & HIDDEN_BIT_MASK);

    match termination {
        Termination::ZeroRun => {
            let symbols: Vec<u8> = payload_symbols.collect();
            reject_ambiguous_zero_runs(&symbols)?;
            Ok(symbols)
        }
        Termination::LengthPrefix => {
            let available = width as usize * height as usize;
            let required = LENGTH_PREFIX_BITS + payload.len();
            if required > available || payload.len() > u32::MAX as usize {
                return Err(CodecError::CoverTooSmall {
                    required,
                    available,
                });
            }

            let count = payload.len() as u32;
            let mut symbols = Vec::with_capacity(required);
            symbols.extend((0..LENGTH_PREFIX_BITS).rev().map(|i| ((count >> i) & 1) as u8));
            symbols.extend(payload_symbols);
            Ok(symbols)
        }
    }
}

/// Extraction cuts the stream at the first window of [`TERMINATOR_LEN`] zero
/// symbols, so a zero run of that length inside the payload, or any zero
/// symbols at its tail (which merge with the emergent terminator), cannot
/// round-trip. Refuse them up front instead of corrupting silently.
fn reject_ambiguous_zero_runs(symbols: &[u8]) -> Result<(), CodecError> {
    let mut run = 0usize;
    for (i, &symbol) in symbols.iter().enumerate() {
        if symbol == 0 {
            run += 1;
            if run == TERMINATOR_LEN {
                return Err(CodecError::AmbiguousZeroRun(i + 1 - TERMINATOR_LEN));
            }
        } else {
            run = 0;
        }
    }
    if run > 0 {
        return Err(CodecError::AmbiguousZeroRun(symbols.len() - run));
    }
    Ok(())
}

fn extract_zero_run(encoded: &RgbaImage, order: ScanOrder) -> Result<Vec<u8>, CodecError> {
    let (width, height) = encoded.dimensions();
    let mut symbols = Vec::new();
    let mut terminated = false;

    for (x, y) in order.coordinates(width, height) {
        symbols.push(encoded.get_pixel(x, y)[0] & HIDDEN_BIT_MASK);
        if symbols.len() >= TERMINATOR_LEN
            && symbols[symbols.len() - TERMINATOR_LEN..]
                .iter()
                .all(|&s| s == 0)
        {
            terminated = true;
            break;
        }
    }

    if !terminated {
        return Err(CodecError::TerminatorNotFound(width, height));
    }

    symbols.truncate(symbols.len() - TERMINATOR_LEN);
    Ok(symbols)
}

fn extract_length_prefixed(encoded: &RgbaImage, order: ScanOrder) -> Result<Vec<u8>, CodecError> {
    let (width, height) = encoded.dimensions();
    let mut coords = order.coordinates(width, height);

    let mut declared: u32 = 0;
    for _ in 0..LENGTH_PREFIX_BITS {
        let (x, y) = coords.next().ok_or(CodecError::MissingLengthPrefix)?;
        declared = (declared << 1) | u32::from(encoded.get_pixel(x, y)[0] & HIDDEN_BIT_MASK);
    }

    let declared = declared as usize;
    let available = (width as usize * height as usize).saturating_sub(LENGTH_PREFIX_BITS);
    if declared > available {
        return Err(CodecError::PayloadTruncated {
            declared,
            available,
        });
    }

    Ok(coords
        .take(declared)
        .map(|(x, y)| encoded.get_pixel(x, y)[0] & HIDDEN_BIT_MASK)
        .collect())
}
