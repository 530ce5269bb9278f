//! 서비스 접근 제어
//!
//! 등록 서비스에 대한 접근 허용/거부를 평가합니다.

use crate::error::{Error, Result};

use super::context::{Authentication, RegisteredService, Service};

/// 접근 평가 컨텍스트
///
/// 요청마다 새로 만들어지고 평가기에서 정확히 한 번 소비됩니다.
#[derive(Debug, Clone)]
pub struct AccessContext {
    /// 요청된 서비스
    pub service: Option<Service>,

    /// 현재 인증 결과
    pub authentication: Option<Authentication>,

    /// 평가 대상 등록 서비스
    pub registered_service: RegisteredService,

    /// release policy를 통해 주체 속성을 조회할지 여부
    pub release_principal_attributes: bool,
}

impl AccessContext {
    /// 새 평가 컨텍스트 생성
    pub fn new(registered_service: RegisteredService) -> Self {
        Self {
            service: None,
            authentication: None,
            registered_service,
            release_principal_attributes: false,
        }
    }

    /// 요청 서비스 설정
    pub fn with_service(mut self, service: Option<Service>) -> Self {
        self.service = service;
        self
    }

    /// 인증 결과 설정
    pub fn with_authentication(mut self, authentication: Option<Authentication>) -> Self {
        self.authentication = authentication;
        self
    }

    /// 주체 속성 조회 여부 설정
    pub fn release_principal_attributes(mut self, release: bool) -> Self {
        self.release_principal_attributes = release;
        self
    }
}

/// 접근 평가 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// 허용
    Allow,

    /// 거부 (사유 포함)
    Deny { reason: String },
}

impl AccessDecision {
    /// 거부 결과 생성
    pub fn deny(reason: impl Into<String>) -> Self {
        AccessDecision::Deny {
            reason: reason.into(),
        }
    }

    /// 허용 여부
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// 거부라면 치명적 에러로 변환합니다.
    ///
    /// 거부는 소프트 결과가 아니라 요청을 중단시키는
    /// `Error::AccessDenied`로 전파됩니다.
    pub fn into_result(self) -> Result<()> {
        match self {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Deny { reason } => Err(Error::AccessDenied { reason }),
        }
    }
}

/// 접근 평가기
pub trait AccessEnforcer: Send + Sync {
    /// 접근 컨텍스트를 평가합니다.
    fn execute(&self, context: &AccessContext) -> Result<AccessDecision>;
}

/// 등록 서비스 접근 평가기
///
/// 서비스의 `access_enabled` 플래그가 꺼져 있으면 거부합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisteredServiceAccessEnforcer;

impl AccessEnforcer for RegisteredServiceAccessEnforcer {
    fn execute(&self, context: &AccessContext) -> Result<AccessDecision> {
        let service = &context.registered_service;
        if !service.access_enabled() {
            return Ok(AccessDecision::deny(format!(
                "service {} is not allowed to use the login flow",
                service.name
            )));
        }
        Ok(AccessDecision::Allow)
    }
}
