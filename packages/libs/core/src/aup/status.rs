//! 수락 레코드와 저장소
//!
//! 주체의 정책 수락 상태를 검증하고 기록합니다.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::context::{Credential, Principal, RequestContext};

/// 수락 레코드
///
/// 주체의 수락 검사 결과입니다. 게이트는 이 레코드를 읽기만 하고,
/// 플로우 스코프로 전달합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AupAcceptance {
    /// 해석된 주체
    pub principal: Principal,

    /// 수락 여부
    pub accepted: bool,

    /// 수락한 정책 버전 (opaque)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_version: Option<String>,
}

impl AupAcceptance {
    /// 수락된 레코드 생성
    pub fn accepted(principal: Principal) -> Self {
        Self {
            principal,
            accepted: true,
            policy_version: None,
        }
    }

    /// 미수락 레코드 생성
    pub fn must_accept(principal: Principal) -> Self {
        Self {
            principal,
            accepted: false,
            policy_version: None,
        }
    }

    /// 정책 버전 설정
    pub fn with_policy_version(mut self, version: impl Into<String>) -> Self {
        self.policy_version = Some(version.into());
        self
    }
}

/// 수락 상태 저장소
///
/// `verify`는 게이트에서 요청당 최대 한 번 호출되며, 구현에 따라
/// 검사 결과를 저장소에 남길 수 있습니다.
pub trait AupRepository: Send + Sync {
    /// 자격 증명의 수락 상태를 검증합니다.
    fn verify(&self, context: &RequestContext, credential: &Credential) -> Result<AupAcceptance>;

    /// 주체의 수락을 기록합니다.
    fn record_acceptance(&self, credential: &Credential) -> Result<bool>;
}

/// 인메모리 수락 저장소
///
/// 프로세스 내에서만 유지됩니다. (테스트/단일 노드용)
#[derive(Debug, Default)]
pub struct MemoryAupRepository {
    /// principal id → 수락한 정책 버전
    accepted: RwLock<HashMap<String, Option<String>>>,

    /// 현재 적용 중인 정책 버전
    policy_version: Option<String>,
}

impl MemoryAupRepository {
    /// 새 저장소 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 적용할 정책 버전을 지정해 생성
    pub fn with_policy_version(version: impl Into<String>) -> Self {
        Self {
            accepted: RwLock::new(HashMap::new()),
            policy_version: Some(version.into()),
        }
    }
}

impl AupRepository for MemoryAupRepository {
    fn verify(&self, _context: &RequestContext, credential: &Credential) -> Result<AupAcceptance> {
        let principal = Principal::new(credential.id.clone());

        let accepted = self.accepted.read().unwrap();
        match accepted.get(&credential.id) {
            Some(version) => {
                let mut record = AupAcceptance::accepted(principal);
                record.policy_version = version.clone();
                Ok(record)
            }
            None => Ok(AupAcceptance::must_accept(principal)),
        }
    }

    fn record_acceptance(&self, credential: &Credential) -> Result<bool> {
        let mut accepted = self.accepted.write().unwrap();
        accepted.insert(credential.id.clone(), self.policy_version.clone());
        Ok(true)
    }
}
