/// Mask selecting the red-channel bit that carries a hidden symbol.
pub const HIDDEN_BIT_MASK: u8 = 1;

/// Number of consecutive zero symbols that marks the end of a message.
pub const TERMINATOR_LEN: usize = 8;

/// Pixels occupied by the symbol count in length-prefixed mode.
/// The count is a `u32` written one bit per pixel, most significant bit first.
pub const LENGTH_PREFIX_BITS: usize = 32;

/// Image extensions the tool accepts for both input and output.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["jpg", "png"];

/// File stem used for the encoded image when no output path is given.
pub const DEFAULT_OUTPUT_STEM: &str = "encoded_image";
