//! 토큰 암호화 코덱
//!
//! 토큰 값은 프로세스를 떠나기 직전에 암호화되고, 응답에서 읽은 직후
//! 복호화됩니다. 코덱은 대칭이어야 하며 `decode(encode(x)) == x`를
//! 보장해야 합니다.

use base64::{engine::general_purpose, Engine as _};
use chacha20poly1305::{aead::Aead, aead::KeyInit, ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;

use crate::error::{Error, Result};

/// 대칭 토큰 코덱
pub trait TokenCipher: Send + Sync {
    /// 평문 토큰을 암호화합니다.
    fn encode(&self, plain: &str) -> Result<String>;

    /// 암호화된 토큰을 복호화합니다.
    fn decode(&self, cipher: &str) -> Result<String>;
}

/// ChaCha20-Poly1305 토큰 코덱
///
/// nonce(12바이트) + ciphertext를 base64url(no padding)로 감쌉니다.
pub struct ChaChaTokenCipher {
    key: [u8; 32],
}

impl ChaChaTokenCipher {
    /// 키 바이트로 생성
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// 키 문자열(hex / base64 / base64url / raw 32바이트)로 생성
    pub fn from_key_material(raw: &str) -> Result<Self> {
        let key = parse_key_material(raw).ok_or_else(|| Error::TokenCipher {
            message: "invalid key material".to_string(),
        })?;
        Ok(Self::new(key))
    }
}

impl TokenCipher for ChaChaTokenCipher {
    fn encode(&self, plain: &str) -> Result<String> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.key));
        let mut nonce_bytes = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plain.as_bytes())
            .map_err(|_| Error::TokenCipher {
                message: "encryption failed".to_string(),
            })?;

        let mut payload = Vec::with_capacity(12 + ciphertext.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&ciphertext);

        Ok(general_purpose::URL_SAFE_NO_PAD.encode(payload))
    }

    fn decode(&self, encoded: &str) -> Result<String> {
        let payload = general_purpose::URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| Error::TokenCipher {
                message: "invalid ciphertext".to_string(),
            })?;

        if payload.len() < 13 {
            return Err(Error::TokenCipher {
                message: "invalid ciphertext".to_string(),
            });
        }

        let (nonce_bytes, ciphertext) = payload.split_at(12);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.key));
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| Error::TokenCipher {
                message: "decryption failed".to_string(),
            })?;

        String::from_utf8(plaintext).map_err(|_| Error::TokenCipher {
            message: "plaintext is not valid utf-8".to_string(),
        })
    }
}

/// 항등 코덱
///
/// 평문 배포 및 테스트용입니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTokenCipher;

impl TokenCipher for NoopTokenCipher {
    fn encode(&self, plain: &str) -> Result<String> {
        Ok(plain.to_string())
    }

    fn decode(&self, cipher: &str) -> Result<String> {
        Ok(cipher.to_string())
    }
}

/// 키 문자열에서 32바이트 키 추출
pub fn parse_key_material(raw: &str) -> Option<[u8; 32]> {
    let trimmed = raw.trim();

    if trimmed.len() == 64 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        let bytes = decode_hex(trimmed)?;
        return bytes.as_slice().try_into().ok();
    }

    if let Ok(bytes) = general_purpose::URL_SAFE_NO_PAD.decode(trimmed) {
        if bytes.len() == 32 {
            return bytes.as_slice().try_into().ok();
        }
    }

    if let Ok(bytes) = general_purpose::STANDARD.decode(trimmed) {
        if bytes.len() == 32 {
            return bytes.as_slice().try_into().ok();
        }
    }

    let raw_bytes = trimmed.as_bytes();
    if raw_bytes.len() == 32 {
        return raw_bytes.try_into().ok();
    }

    None
}

fn decode_hex(input: &str) -> Option<Vec<u8>> {
    if input.len() % 2 != 0 {
        return None;
    }

    let mut bytes = Vec::with_capacity(input.len() / 2);
    let mut chars = input.chars();
    while let (Some(h), Some(l)) = (chars.next(), chars.next()) {
        let hi = h.to_digit(16)?;
        let lo = l.to_digit(16)?;
        bytes.push(((hi << 4) | lo) as u8);
    }
    Some(bytes)
}
