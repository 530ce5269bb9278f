//! 요청 컨텍스트와 플로우 스코프
//!
//! 검증 게이트가 요청 단위로 읽고 쓰는 값들을 정의합니다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::status::AupAcceptance;

/// AUP 적용 여부 속성 키 (없으면 false)
pub const PROPERTY_AUP_ENABLED: &str = "aup_enabled";

/// 서비스 접근 허용 여부 속성 키 (없으면 true)
pub const PROPERTY_ACCESS_ENABLED: &str = "access_enabled";

/// 인증 자격 증명
///
/// 인증 요청에서 전달된 사용자 식별자입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// 사용자 ID
    pub id: String,
}

impl Credential {
    /// 새 자격 증명 생성
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// 해석된 주체
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Principal {
    /// 주체 ID
    pub id: String,

    /// 속성 맵
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

impl Principal {
    /// 새 주체 생성
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: HashMap::new(),
        }
    }

    /// 속성 추가
    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

/// 접근 대상 서비스
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// 서비스 ID (보통 redirect URL)
    pub id: String,
}

impl Service {
    /// 새 서비스 참조 생성
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// 현재 인증 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Authentication {
    /// 인증된 주체
    pub principal: Principal,
}

impl Authentication {
    /// 새 인증 결과 생성
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }
}

/// 등록된 서비스
///
/// 서비스 레지스트리에서 해석된 서비스 정의입니다.
/// 정책 플래그는 `properties` 맵의 boolean 값으로 표현됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisteredService {
    /// 서비스 ID
    pub id: String,

    /// 이름
    pub name: String,

    /// 서비스 속성 (정책 플래그 포함)
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl RegisteredService {
    /// 새 등록 서비스 생성
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties: HashMap::new(),
        }
    }

    /// 속성 설정
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// boolean 속성 조회 (없으면 기본값)
    pub fn bool_property(&self, name: &str, default: bool) -> bool {
        match self.properties.get(name) {
            Some(value) => matches!(value.trim(), "true" | "TRUE" | "True" | "1"),
            None => default,
        }
    }

    /// 이 서비스에 AUP 검사가 적용되는지 여부
    ///
    /// 속성이 없으면 false입니다. 서비스 단위 opt-out이 전역 검사보다
    /// 우선합니다.
    pub fn aup_enabled(&self) -> bool {
        self.bool_property(PROPERTY_AUP_ENABLED, false)
    }

    /// 이 서비스에 대한 접근이 허용되는지 여부 (없으면 true)
    pub fn access_enabled(&self) -> bool {
        self.bool_property(PROPERTY_ACCESS_ENABLED, true)
    }
}

/// 플로우 스코프
///
/// 게이트가 다운스트림 단계를 위해 기록하는 요청 단위 출력입니다.
/// 요청이 거부되더라도 이미 기록된 값은 유지됩니다.
#[derive(Debug, Clone, Default)]
pub struct FlowScope {
    principal: Option<Principal>,
    aup_status: Option<AupAcceptance>,
}

impl FlowScope {
    /// 해석된 주체 기록
    pub fn put_principal(&mut self, principal: Principal) {
        self.principal = Some(principal);
    }

    /// 수락 레코드 기록
    pub fn put_aup_status(&mut self, status: AupAcceptance) {
        self.aup_status = Some(status);
    }

    /// 기록된 주체
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// 기록된 수락 레코드
    pub fn aup_status(&self) -> Option<&AupAcceptance> {
        self.aup_status.as_ref()
    }
}

/// 검증 요청 컨텍스트
///
/// 요청마다 새로 만들어지며, 게이트는 플로우 스코프 외의 필드를
/// 읽기만 합니다.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// 요청된 서비스
    pub service: Option<Service>,

    /// 현재 인증 결과
    pub authentication: Option<Authentication>,

    /// 해석된 등록 서비스 (없으면 서비스 없는 요청, 예: 직접 로그인)
    pub registered_service: Option<RegisteredService>,

    /// 플로우 스코프
    pub flow: FlowScope,
}

impl RequestContext {
    /// 새 컨텍스트 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 서비스 설정
    pub fn with_service(mut self, service: Service) -> Self {
        self.service = Some(service);
        self
    }

    /// 인증 결과 설정
    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    /// 등록 서비스 설정
    pub fn with_registered_service(mut self, registered_service: RegisteredService) -> Self {
        self.registered_service = Some(registered_service);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_property_defaults() {
        let service = RegisteredService::new("svc_1", "My App");

        assert!(!service.aup_enabled());
        assert!(service.access_enabled());
    }

    #[test]
    fn test_bool_property_parsing() {
        let service = RegisteredService::new("svc_1", "My App")
            .with_property(PROPERTY_AUP_ENABLED, "true")
            .with_property(PROPERTY_ACCESS_ENABLED, "0");

        assert!(service.aup_enabled());
        assert!(!service.access_enabled());

        let service = RegisteredService::new("svc_2", "Other App")
            .with_property(PROPERTY_AUP_ENABLED, "yes");
        assert!(!service.aup_enabled()); // "yes"는 true로 취급하지 않음
    }

    #[test]
    fn test_flow_scope_records() {
        let mut flow = FlowScope::default();
        assert!(flow.principal().is_none());
        assert!(flow.aup_status().is_none());

        let principal =
            Principal::new("alice").with_attribute("email", Value::from("alice@example.com"));
        flow.put_principal(principal.clone());
        flow.put_aup_status(AupAcceptance::accepted(principal));

        assert_eq!(flow.principal().unwrap().id, "alice");
        assert_eq!(
            flow.principal().unwrap().attributes.get("email"),
            Some(&Value::from("alice@example.com"))
        );
        assert!(flow.aup_status().unwrap().accepted);
    }
}
