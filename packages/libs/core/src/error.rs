//! 공통 에러 타입
//!
//! ssk-core 전체에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Ssokit 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    #[error("access denied: {reason}")]
    AccessDenied { reason: String },

    #[error("token cipher error: {message}")]
    TokenCipher { message: String },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("config error: {message}")]
    Config { message: String },
}

impl Error {
    /// HTTP 상태 코드로 변환
    pub fn status_code(&self) -> u16 {
        match self {
            // 403 Forbidden
            Error::AccessDenied { .. } => 403,

            // 502 Bad Gateway
            Error::Transport { .. } => 502,

            // 500 Internal Server Error
            Error::TokenCipher { .. } | Error::Config { .. } => 500,
        }
    }

    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::AccessDenied { .. } => "ACCESS_DENIED",
            Error::TokenCipher { .. } => "TOKEN_CIPHER_ERROR",
            Error::Transport { .. } => "TRANSPORT_ERROR",
            Error::Config { .. } => "CONFIG_ERROR",
        }
    }
}
