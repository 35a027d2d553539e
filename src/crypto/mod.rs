/// Cryptography module for cache-update signing
///
/// Handles RSA key loading and RSASSA-PKCS1-v1_5 / SHA-256 signatures

pub mod signer;

pub use signer::CacheSigner;
