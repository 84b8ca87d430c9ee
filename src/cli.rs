//! Command-line surface of the tool, defined with `clap`'s derive API.
//! Everything a user can pass on the command line lives in this module.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// A command-line tool that hides a short text message in the red-channel
/// least significant bits of a JPEG or PNG image, and recovers it again.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "A command-line tool that hides a short text message in the red-channel \
least significant bits of a JPEG or PNG image, and recovers it again."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands: encode (hide) and decode (recover).
#[derive(Parser, Debug)]
pub enum Commands {
    /// Hide a secret message inside an image.
    Encode(EncodeArgs),

    /// Recover the hidden message from an encoded image.
    Decode(DecodeArgs),
}

/// Arguments for the 'encode' subcommand.
#[derive(Parser, Debug)]
#[command(group(
    ArgGroup::new("payload")
        .required(true)
        .args(["secret", "secret_path"])
))]
pub struct EncodeArgs {
    /// Path to the cover image (must end in .jpg or .png).
    #[arg(short, long)]
    pub image_path: PathBuf,

    /// The secret message, given inline.
    #[arg(short, long)]
    pub secret: Option<String>,

    /// Path to a file whose full contents are the secret message.
    #[arg(long)]
    pub secret_path: Option<PathBuf>,

    /// Where to write the encoded image. Defaults to encoded_image.<ext>
    /// next to the working directory, with the input's extension.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use the length-prefixed protocol instead of the zero-run terminator.
    /// Images encoded this way must also be decoded with this flag.
    #[arg(long)]
    pub length_prefixed: bool,
}

/// Arguments for the 'decode' subcommand.
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// Path to the encoded image (must end in .jpg or .png).
    #[arg(short, long)]
    pub image_path: PathBuf,

    /// Decode with the length-prefixed protocol instead of the zero-run
    /// terminator.
    #[arg(long)]
    pub length_prefixed: bool,
}
