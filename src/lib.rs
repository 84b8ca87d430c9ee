//! # redlsb
//!
//! Core logic for hiding a text message in the red-channel least significant
//! bits of an image and recovering it again.

pub mod cli;
pub mod constants;
pub mod handler;
pub mod steganography;
