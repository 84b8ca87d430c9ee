//! High-level logic behind the `encode` and `decode` subcommands.
//! Coordinates file I/O, the capacity guard and the codec, and reports
//! results to the user.

use crate::cli::{DecodeArgs, EncodeArgs};
use crate::constants::{DEFAULT_OUTPUT_STEM, SUPPORTED_EXTENSIONS};
use crate::steganography::{self, CodecOptions, Termination};
use anyhow::{Context, Result};
use colored::Colorize;
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Handles the 'encode' subcommand.
///
/// Reads the cover image and the secret, checks that the secret fits, embeds
/// it and writes the encoded image.
///
/// # Errors
///
/// Returns an error when:
/// * the image path has an unsupported extension or cannot be decoded,
/// * the secret cannot be read,
/// * the image does not have enough capacity for the secret,
/// * the codec rejects the secret (ambiguous zero run, undersized cover),
/// * the encoded image cannot be written.
pub fn handle_encode(args: EncodeArgs) -> Result<()> {
    let extension = validated_extension(&args.image_path)?.to_owned();
    let cover = open_image(&args.image_path)?;
    let secret = read_secret(&args)?;

    let (width, height) = cover.dimensions();
    anyhow::ensure!(
        steganography::can_fit(width, height, secret.len()),
        "Not enough space in the image to hide the secret. \nRequired: {}, Available: {}",
        secret.len().to_string().red().bold(),
        steganography::capacity(width, height).to_string().green().bold()
    );

    log::debug!("embedding {} secret bytes into {width}x{height} image", secret.len());
    let stego = steganography::embed(&cover, &secret, &codec_options(args.length_prefixed))
        .context("Failed to embed the secret into the image")?;

    let dest = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{DEFAULT_OUTPUT_STEM}.{extension}")));
    stego.save(&dest).with_context(|| {
        format!(
            "Unable to write encoded image: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!("Steganography completed successfully!");
    println!(
        "The encoded image has been saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// Handles the 'decode' subcommand.
///
/// Reads the encoded image, recovers the hidden symbol sequence and prints it
/// as a string of 0/1 digits.
///
/// # Errors
///
/// Returns an error when the image path has an unsupported extension, the
/// image cannot be decoded, or no hidden message can be recovered from it.
pub fn handle_decode(args: DecodeArgs) -> Result<()> {
    validated_extension(&args.image_path)?;
    let encoded = open_image(&args.image_path)?;

    let symbols = steganography::extract(&encoded, &codec_options(args.length_prefixed))
        .with_context(|| {
            format!(
                "Failed to recover a hidden message from: {}",
                args.image_path.to_string_lossy().red().bold()
            )
        })?;

    let rendered: String = symbols.iter().map(|&s| char::from(b'0' + s)).collect();
    println!("Steganography completed successfully!");
    println!(
        "Hidden message ({} symbols): {}",
        symbols.len().to_string().green().bold(),
        rendered
    );

    Ok(())
}

fn codec_options(length_prefixed: bool) -> CodecOptions {
    CodecOptions {
        termination: if length_prefixed {
            Termination::LengthPrefix
        } else {
            Termination::ZeroRun
        },
        ..CodecOptions::default()
    }
}

fn validated_extension(path: &Path) -> Result<&str> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    anyhow::ensure!(
        SUPPORTED_EXTENSIONS.contains(&extension),
        "Unsupported image extension: {}. \nExpected one of: {}",
        path.to_string_lossy().red().bold(),
        SUPPORTED_EXTENSIONS.join(", ").green().bold()
    );
    Ok(extension)
}

fn open_image(path: &Path) -> Result<RgbaImage> {
    log::debug!("opening image {}", path.display());
    let img = image::open(path).with_context(|| {
        format!(
            "Unable to decode image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    Ok(img.to_rgba8())
}

fn read_secret(args: &EncodeArgs) -> Result<Vec<u8>> {
    log::debug!("reading secret");
    if let Some(secret) = &args.secret {
        return Ok(secret.clone().into_bytes());
    }

    // clap guarantees exactly one of the two sources is present.
    let path = args
        .secret_path
        .as_ref()
        .context("Either --secret or --secret-path must be given")?;
    fs::read(path).with_context(|| {
        format!(
            "Unable to read secret file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}
