//! 원격 REST 토큰 저장소
//!
//! 토큰의 저장/조회/폐기를 원격 HTTP 엔드포인트에 위임합니다.
//! 원격 엔드포인트가 유일한 소스 오브 트루스이며, 토큰 값은 전송 직전에
//! 암호화되고 응답에서 읽은 직후 복호화됩니다.

use std::env;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};

use crate::crypto::TokenCipher;
use crate::error::{Error, Result};
use crate::http;

use super::repository::PasswordlessTokenRepository;

/// 전송 실패 처리 정책
///
/// `Suppress`(기본값)는 실패를 로그로 남기고 빈 결과로 변환합니다.
/// 이 경우 호출자는 저장/삭제가 성공했다고 가정할 수 없고, 조회 결과
/// None이 "없음"인지 "실패"인지 구분할 수 없습니다. `Propagate`는
/// 실패를 에러로 그대로 올립니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorPolicy {
    /// 실패를 흡수하고 빈 결과로 처리 (가용성 우선)
    #[default]
    Suppress,

    /// 실패를 호출자에게 전파
    Propagate,
}

/// REST 토큰 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestTokenConfig {
    /// 엔드포인트 URL
    pub url: String,

    /// Basic auth 사용자 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth_username: Option<String>,

    /// Basic auth 비밀번호
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth_password: Option<String>,

    /// 전송 실패 처리 정책
    #[serde(default)]
    pub on_transport_error: TransportErrorPolicy,
}

impl RestTokenConfig {
    /// URL만으로 생성 (나머지는 기본값)
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            basic_auth_username: None,
            basic_auth_password: None,
            on_transport_error: TransportErrorPolicy::default(),
        }
    }

    /// Basic auth 설정
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_auth_username = Some(username.into());
        self.basic_auth_password = Some(password.into());
        self
    }

    /// 전송 실패 처리 정책 설정
    pub fn with_transport_error_policy(mut self, policy: TransportErrorPolicy) -> Self {
        self.on_transport_error = policy;
        self
    }

    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        let url = env::var("SSK_TOKEN_REST_URL").map_err(|_| Error::Config {
            message: "SSK_TOKEN_REST_URL is not set".to_string(),
        })?;

        let on_transport_error = match env::var("SSK_TOKEN_REST_ON_TRANSPORT_ERROR")
            .ok()
            .as_deref()
        {
            Some("propagate") => TransportErrorPolicy::Propagate,
            _ => TransportErrorPolicy::Suppress,
        };

        Ok(Self {
            url,
            basic_auth_username: env::var("SSK_TOKEN_REST_BASIC_USERNAME").ok(),
            basic_auth_password: env::var("SSK_TOKEN_REST_BASIC_PASSWORD").ok(),
            on_transport_error,
        })
    }

    fn basic_auth(&self) -> Option<(&str, &str)> {
        match (&self.basic_auth_username, &self.basic_auth_password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }
}

/// 원격 REST 토큰 저장소
///
/// 호출 사이에 상태를 두지 않으며, 작업당 한 번의 원격 호출만
/// 수행합니다.
pub struct RestTokenRepository<C> {
    config: RestTokenConfig,
    cipher: C,
    client: Client,
}

impl<C: TokenCipher> RestTokenRepository<C> {
    /// 새 저장소 생성
    pub fn new(config: RestTokenConfig, cipher: C) -> Self {
        Self {
            config,
            cipher,
            client: Client::new(),
        }
    }

    /// 타임아웃 등 클라이언트 설정이 필요한 경우
    pub fn with_client(config: RestTokenConfig, cipher: C, client: Client) -> Self {
        Self {
            config,
            cipher,
            client,
        }
    }

    async fn fetch_token(&self, username: &str) -> Result<Option<String>> {
        let resp = http::execute(
            &self.client,
            Method::GET,
            &self.config.url,
            self.config.basic_auth(),
            &[("username", username)],
        )
        .await?;

        let body = http::read_body(resp).await?;
        if body.is_empty() {
            return Ok(None);
        }

        // 본문은 암호문이므로 읽은 직후 복호화한다
        let token = self.cipher.decode(&body)?;
        Ok(Some(token))
    }

    /// 토큰 값을 암호화해 함께 전송합니다.
    async fn send_encoded(
        &self,
        operation: &'static str,
        method: Method,
        username: &str,
        token: &str,
    ) -> Result<()> {
        let result = match self.cipher.encode(token) {
            Ok(encoded) => {
                self.send(method, &[("username", username), ("token", encoded.as_str())])
                    .await
            }
            Err(err) => Err(err),
        };
        result.or_else(|err| self.absorb(operation, err))
    }

    async fn send(&self, method: Method, params: &[(&str, &str)]) -> Result<()> {
        http::execute(
            &self.client,
            method,
            &self.config.url,
            self.config.basic_auth(),
            params,
        )
        .await?;
        Ok(())
    }

    /// 정책에 따라 실패를 흡수하거나 전파합니다.
    fn absorb(&self, operation: &'static str, err: Error) -> Result<()> {
        match self.config.on_transport_error {
            TransportErrorPolicy::Suppress => {
                tracing::error!(operation, error = %err, "passwordless token operation failed");
                Ok(())
            }
            TransportErrorPolicy::Propagate => Err(err),
        }
    }
}

#[async_trait]
impl<C: TokenCipher> PasswordlessTokenRepository for RestTokenRepository<C> {
    async fn find_token(&self, username: &str) -> Result<Option<String>> {
        match self.fetch_token(username).await {
            Ok(token) => Ok(token),
            Err(err) => self.absorb("find_token", err).map(|_| None),
        }
    }

    async fn save_token(&self, username: &str, token: &str) -> Result<()> {
        self.send_encoded("save_token", Method::POST, username, token)
            .await
    }

    async fn delete_token(&self, username: &str, token: &str) -> Result<()> {
        self.send_encoded("delete_token", Method::DELETE, username, token)
            .await
    }

    async fn delete_tokens(&self, username: &str) -> Result<()> {
        match self.send(Method::DELETE, &[("username", username)]).await {
            Ok(()) => Ok(()),
            Err(err) => self.absorb("delete_tokens", err),
        }
    }
}
