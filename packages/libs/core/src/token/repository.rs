//! 저장소 인터페이스

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Passwordless 토큰
///
/// 메모리에서는 평문, 전송/저장 시에는 암호문으로 다뤄집니다.
/// 사용자 이름은 암호화하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordlessToken {
    /// 사용자 이름
    pub username: String,

    /// 토큰 값
    pub token: String,
}

impl PasswordlessToken {
    /// 새 토큰 생성
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    /// 지정한 길이의 토큰 값을 발급해 생성
    pub fn generate(username: impl Into<String>, size: usize) -> Self {
        Self {
            username: username.into(),
            token: super::generate_token(size),
        }
    }
}

/// Passwordless 토큰 저장소
///
/// 각 작업은 최대 한 번의 원격/저장소 호출로 완료되며, 호출이 끝나기
/// 전에 반환하지 않습니다. 재시도와 순서 재배열은 하지 않습니다.
#[async_trait]
pub trait PasswordlessTokenRepository: Send + Sync {
    /// 사용자 토큰 조회. 일치하는 레코드가 없으면 None.
    async fn find_token(&self, username: &str) -> Result<Option<String>>;

    /// 토큰 저장
    async fn save_token(&self, username: &str, token: &str) -> Result<()>;

    /// 특정 토큰 삭제
    async fn delete_token(&self, username: &str, token: &str) -> Result<()>;

    /// 사용자의 모든 토큰 삭제
    async fn delete_tokens(&self, username: &str) -> Result<()>;
}
