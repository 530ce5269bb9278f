//! 수락 정책(AUP) 검증 게이트
//!
//! # 개요
//!
//! 주체가 Acceptable Use Policy 체크포인트를 통과할 수 있는지 결정합니다.
//! 수락 상태는 저장소(`AupRepository`)가, 서비스 접근 제어는
//! 평가기(`AccessEnforcer`)가 담당하며, 게이트는 두 결과를
//! {Accepted, MustAccept} 중 하나로 매핑합니다.
//!
//! # 모듈 구조
//!
//! - `context`: 요청 컨텍스트와 플로우 스코프
//! - `status`: 수락 레코드와 저장소
//! - `access`: 서비스 접근 제어
//! - `verify`: 검증 게이트

mod access;
mod context;
mod status;
mod verify;

pub use access::{AccessContext, AccessDecision, AccessEnforcer, RegisteredServiceAccessEnforcer};
pub use context::{
    Authentication, Credential, FlowScope, Principal, RegisteredService, RequestContext, Service,
    PROPERTY_ACCESS_ENABLED, PROPERTY_AUP_ENABLED,
};
pub use status::{AupAcceptance, AupRepository, MemoryAupRepository};
pub use verify::{AupOutcome, AupVerifyGate};
