//! 인메모리 토큰 저장소

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::Result;

use super::repository::PasswordlessTokenRepository;

/// 저장된 토큰 (만료 시각 포함)
#[derive(Debug, Clone)]
struct StoredToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// 인메모리 토큰 저장소
///
/// 만료된 토큰은 조회 시 없는 것으로 취급됩니다. (테스트/단일 노드용)
pub struct MemoryTokenRepository {
    expire_in: Duration,
    tokens: RwLock<HashMap<String, StoredToken>>,
}

impl MemoryTokenRepository {
    /// 만료 시간(초)으로 생성
    pub fn new(expire_in_seconds: i64) -> Self {
        Self {
            expire_in: Duration::seconds(expire_in_seconds),
            tokens: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl PasswordlessTokenRepository for MemoryTokenRepository {
    async fn find_token(&self, username: &str) -> Result<Option<String>> {
        let tokens = self.tokens.read().unwrap();
        match tokens.get(username) {
            Some(stored) if stored.expires_at > Utc::now() => Ok(Some(stored.token.clone())),
            _ => Ok(None),
        }
    }

    async fn save_token(&self, username: &str, token: &str) -> Result<()> {
        let mut tokens = self.tokens.write().unwrap();
        tokens.insert(
            username.to_string(),
            StoredToken {
                token: token.to_string(),
                expires_at: Utc::now() + self.expire_in,
            },
        );
        Ok(())
    }

    async fn delete_token(&self, username: &str, token: &str) -> Result<()> {
        let mut tokens = self.tokens.write().unwrap();
        if let Some(stored) = tokens.get(username) {
            if stored.token == token {
                tokens.remove(username);
            }
        }
        Ok(())
    }

    async fn delete_tokens(&self, username: &str) -> Result<()> {
        let mut tokens = self.tokens.write().unwrap();
        tokens.remove(username);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = MemoryTokenRepository::new(60);
        repo.save_token("alice", "abc123").await.unwrap();

        assert_eq!(
            repo.find_token("alice").await.unwrap(),
            Some("abc123".to_string())
        );
        assert_eq!(repo.find_token("bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_token_is_absent() {
        let repo = MemoryTokenRepository::new(-1);
        repo.save_token("alice", "abc123").await.unwrap();

        assert_eq!(repo.find_token("alice").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_token_matches_value() {
        let repo = MemoryTokenRepository::new(60);
        repo.save_token("alice", "abc123").await.unwrap();

        // 값이 다르면 삭제되지 않는다
        repo.delete_token("alice", "other").await.unwrap();
        assert!(repo.find_token("alice").await.unwrap().is_some());

        repo.delete_token("alice", "abc123").await.unwrap();
        assert!(repo.find_token("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_tokens() {
        let repo = MemoryTokenRepository::new(60);
        repo.save_token("alice", "abc123").await.unwrap();

        repo.delete_tokens("alice").await.unwrap();
        assert!(repo.find_token("alice").await.unwrap().is_none());
    }
}
