//! # Vault Errors
//!
//! This module defines the [`VaultError`] enum used throughout the vault crate for
//! reporting key derivation, cryptographic, encoding and configuration failures.

use std::borrow::Cow;

/// A specialized [`VaultError`] enum for vault-related failures.
#[charachat_derive::charachat_error]
pub enum VaultError {
    /// Failure during the encryption process.
    #[error("Encryption error{}: {message}", format_context(.context))]
    Encryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure during the decryption process.
    ///
    /// This usually indicates an incorrect key, a mismatched cryptographic
    /// context (AAD), or tampered data.
    #[error("Decryption error{}: {message}", format_context(.context))]
    Decryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure during data decompression.
    #[error("Decompression error{}: {message}", format_context(.context))]
    Decompression { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure deriving key material from a password or a session key.
    #[error("Key derivation error{}: {message}", format_context(.context))]
    KeyDerivation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The supplied key is not a hex-encoded 32-byte key.
    #[error("Invalid key{}: {message}", format_context(.context))]
    InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure when the cipher or builder is incorrectly configured.
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The value is not a well-formed sealed field.
    #[error("Invalid payload{}: {message}", format_context(.context))]
    InvalidPayload { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal vault error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
