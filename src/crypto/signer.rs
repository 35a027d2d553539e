/// Cache-update signer
///
/// Loads the RSA private key registered with the AMP caches and signs
/// update-cache request paths with it.

use crate::error::{AmpError, AmpResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rsa::{
    pkcs1::DecodeRsaPrivateKey,
    pkcs1v15::{Signature, SigningKey, VerifyingKey},
    pkcs8::DecodePrivateKey,
    signature::{SignatureEncoding, Signer, Verifier},
    RsaPrivateKey, RsaPublicKey,
};
use sha2::Sha256;
use std::fmt;
use std::path::Path;

/// Signer holding an RSA private key
#[derive(Clone)]
pub struct CacheSigner {
    signing_key: SigningKey<Sha256>,
    verifying_key: VerifyingKey<Sha256>,
}

impl fmt::Debug for CacheSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheSigner").finish_non_exhaustive()
    }
}

impl CacheSigner {
    /// Create a signer from a decoded private key
    pub fn new(private_key: RsaPrivateKey) -> Self {
        let verifying_key = VerifyingKey::<Sha256>::new(private_key.to_public_key());
        let signing_key = SigningKey::<Sha256>::new(private_key);

        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Decode a PEM private key, PKCS#1 (`RSA PRIVATE KEY`) or PKCS#8 (`PRIVATE KEY`)
    pub fn from_pem(pem: &str) -> AmpResult<Self> {
        let private_key = RsaPrivateKey::from_pkcs1_pem(pem)
            .or_else(|pkcs1_err| {
                RsaPrivateKey::from_pkcs8_pem(pem).map_err(|pkcs8_err| {
                    format!("not a PKCS#1 ({}) or PKCS#8 ({}) RSA key", pkcs1_err, pkcs8_err)
                })
            })
            .map_err(|reason| AmpError::Signing(format!("Invalid RSA private key: {}", reason)))?;

        Ok(Self::new(private_key))
    }

    /// Read and decode a PEM private key file
    pub fn from_file(path: impl AsRef<Path>) -> AmpResult<Self> {
        let path = path.as_ref();
        let pem = std::fs::read_to_string(path).map_err(|e| AmpError::KeyLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_pem(&pem).map_err(|e| AmpError::KeyLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Sign raw bytes, returning the signature bytes
    pub fn sign(&self, data: &[u8]) -> AmpResult<Vec<u8>> {
        let signature: Signature = self
            .signing_key
            .try_sign(data)
            .map_err(|e| AmpError::Signing(e.to_string()))?;
        Ok(signature.to_vec())
    }

    /// Sign raw bytes, returning the base64url (unpadded) signature
    pub fn sign_base64url(&self, data: &[u8]) -> AmpResult<String> {
        Ok(URL_SAFE_NO_PAD.encode(self.sign(data)?))
    }

    /// Verify a signature produced by this key
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        match Signature::try_from(signature) {
            Ok(signature) => self.verifying_key.verify(data, &signature).is_ok(),
            Err(_) => false,
        }
    }

    /// Public half of the key
    pub fn public_key(&self) -> RsaPublicKey {
        self.verifying_key.as_ref().clone()
    }
}

/// Verify a base64url signature against a public key
pub fn verify_base64url(public_key: &RsaPublicKey, data: &[u8], signature: &str) -> bool {
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(signature) else {
        return false;
    };
    let Ok(signature) = Signature::try_from(bytes.as_slice()) else {
        return false;
    };

    VerifyingKey::<Sha256>::new(public_key.clone())
        .verify(data, &signature)
        .is_ok()
}
