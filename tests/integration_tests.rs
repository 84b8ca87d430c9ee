use image::{Rgba, RgbaImage};
use rand::RngCore;
use redlsb::{
    cli::{DecodeArgs, EncodeArgs},
    handler::{handle_decode, handle_encode},
    steganography::{self, CodecOptions, Termination},
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Creates a test image with random pixels at the given path.
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut raw = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw);
    for pixel in raw.chunks_exact_mut(4) {
        pixel[3] = 255;
    }

    let img = RgbaImage::from_raw(width, height, raw).expect("buffer matches dimensions");
    img.save(path).expect("Failed to create test image.");
}

fn symbols_of(payload: &[u8]) -> Vec<u8> {
    payload.iter().map(|b| b & 1).collect()
}

/// Full encode-then-decode flow through the handlers, verifying the hidden
/// symbols survive the trip through a PNG file on disk.
#[test]
fn test_encode_and_decode_round_trip() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let cover_path = dir.path().join("cover.png");
    let encoded_path = dir.path().join("encoded.png");

    create_test_image(&cover_path, 100, 100);
    let secret = "hello";

    let encode_args = EncodeArgs {
        image_path: cover_path.clone(),
        secret: Some(secret.to_owned()),
        secret_path: None,
        output: Some(encoded_path.clone()),
        length_prefixed: false,
    };
    handle_encode(encode_args)?;
    assert!(encoded_path.exists(), "Encoded image should be created.");

    // The handler prints the recovered symbols; verify them via the codec.
    let encoded = image::open(&encoded_path)?.to_rgba8();
    let recovered = steganography::extract(&encoded, &CodecOptions::default())?;
    assert_eq!(
        recovered,
        symbols_of(secret.as_bytes()),
        "Recovered symbols must match the secret's bit stream."
    );

    let decode_args = DecodeArgs {
        image_path: encoded_path,
        length_prefixed: false,
    };
    handle_decode(decode_args)?;

    Ok(())
}

/// The secret can also be supplied through a file.
#[test]
fn test_encode_with_secret_file() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let cover_path = dir.path().join("cover.png");
    let secret_path = dir.path().join("secret.txt");
    let encoded_path = dir.path().join("encoded.png");

    create_test_image(&cover_path, 64, 64);
    fs::write(&secret_path, "a file-borne secret!")?;

    let encode_args = EncodeArgs {
        image_path: cover_path,
        secret: None,
        secret_path: Some(secret_path),
        output: Some(encoded_path.clone()),
        length_prefixed: false,
    };
    handle_encode(encode_args)?;

    let encoded = image::open(&encoded_path)?.to_rgba8();
    let recovered = steganography::extract(&encoded, &CodecOptions::default())?;
    assert_eq!(recovered, symbols_of(b"a file-borne secret!"));

    Ok(())
}

/// The length-prefixed protocol survives the same round trip, including
/// secrets the zero-run protocol cannot represent.
#[test]
fn test_length_prefixed_round_trip() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let cover_path = dir.path().join("cover.png");
    let encoded_path = dir.path().join("encoded.png");

    create_test_image(&cover_path, 64, 64);
    // All-even bytes: pure zero symbols, rejected by the zero-run protocol.
    let secret = "\x02\x04\x06\x08";

    let encode_args = EncodeArgs {
        image_path: cover_path,
        secret: Some(secret.to_owned()),
        secret_path: None,
        output: Some(encoded_path.clone()),
        length_prefixed: true,
    };
    handle_encode(encode_args)?;

    let options = CodecOptions {
        termination: Termination::LengthPrefix,
        ..CodecOptions::default()
    };
    let encoded = image::open(&encoded_path)?.to_rgba8();
    let recovered = steganography::extract(&encoded, &options)?;
    assert_eq!(recovered, vec![0, 0, 0, 0]);

    let decode_args = DecodeArgs {
        image_path: encoded_path,
        length_prefixed: true,
    };
    handle_decode(decode_args)?;

    Ok(())
}

/// A secret larger than the image's capacity is rejected before any codec
/// work happens.
#[test]
fn test_encode_not_enough_space() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let cover_path = dir.path().join("small.png");
    let encoded_path = dir.path().join("encoded.png");

    // 10x10 -> capacity of 37 bytes.
    create_test_image(&cover_path, 10, 10);
    let large_secret = "a".repeat(5000);

    let encode_args = EncodeArgs {
        image_path: cover_path,
        secret: Some(large_secret),
        secret_path: None,
        output: Some(encoded_path.clone()),
        length_prefixed: false,
    };
    let result = handle_encode(encode_args);

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Not enough space"));
    }
    assert!(!encoded_path.exists(), "No output should be written.");

    Ok(())
}

/// Image paths must end in a supported extension.
#[test]
fn test_unsupported_extension_is_rejected() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let cover_path = dir.path().join("cover.bmp");

    let encode_args = EncodeArgs {
        image_path: cover_path.clone(),
        secret: Some("irrelevant".to_owned()),
        secret_path: None,
        output: None,
        length_prefixed: false,
    };
    let result = handle_encode(encode_args);
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Unsupported image extension"));
    }

    let decode_args = DecodeArgs {
        image_path: cover_path,
        length_prefixed: false,
    };
    let result = handle_decode(decode_args);
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Unsupported image extension"));
    }

    Ok(())
}

/// Decoding an image that never carried a message fails with a clear error
/// when its red LSBs happen to contain no zero run.
#[test]
fn test_decode_without_hidden_message() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("plain.png");

    // All red LSBs set, so no terminator window can exist.
    let img = RgbaImage::from_pixel(16, 16, Rgba([201, 50, 60, 255]));
    img.save(&image_path)?;

    let decode_args = DecodeArgs {
        image_path,
        length_prefixed: false,
    };
    let result = handle_decode(decode_args);
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Failed to recover a hidden message"));
    }

    Ok(())
}
