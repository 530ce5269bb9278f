//! 검증 게이트
//!
//! 수락 상태와 서비스 접근 제어를 평가해 인증 플로우의 다음 단계를
//! 결정합니다.

use crate::error::Result;

use super::access::{AccessContext, AccessEnforcer};
use super::context::{Credential, RequestContext};
use super::status::AupRepository;

/// 검증 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AupOutcome {
    /// 수락됨. 플로우 계속 진행
    Accepted,

    /// 수락 필요. 수락 화면으로 라우팅
    MustAccept,
}

impl AupOutcome {
    /// 문자열로 변환
    pub fn as_str(&self) -> &'static str {
        match self {
            AupOutcome::Accepted => "accepted",
            AupOutcome::MustAccept => "must_accept",
        }
    }
}

/// 검증 게이트
///
/// 요청마다 한 번 호출되며, 호출 사이에 상태를 두지 않습니다.
/// 모든 수락 상태는 저장소에 있습니다.
pub struct AupVerifyGate<R, E> {
    repository: R,
    access_enforcer: E,
}

impl<R: AupRepository, E: AccessEnforcer> AupVerifyGate<R, E> {
    /// 새 게이트 생성
    pub fn new(repository: R, access_enforcer: E) -> Self {
        Self {
            repository,
            access_enforcer,
        }
    }

    /// 주체의 수락 여부를 검증합니다.
    ///
    /// 해석된 주체와 수락 레코드는 결과와 무관하게 먼저 플로우
    /// 스코프에 기록됩니다. 다운스트림 에러 핸들러가 거부된 요청에서도
    /// 이 값을 읽을 수 있어야 합니다. 등록 서비스의 접근이 거부되면
    /// `Error::AccessDenied`로 중단됩니다.
    pub fn verify(
        &self,
        context: &mut RequestContext,
        credential: &Credential,
    ) -> Result<AupOutcome> {
        let outcome = self.evaluate(context, credential)?;

        if let Some(principal) = context.flow.principal() {
            tracing::info!(
                action = "aup_verify",
                principal = %principal.id,
                outcome = outcome.as_str(),
                "acceptable use policy verified"
            );
        }

        Ok(outcome)
    }

    fn evaluate(
        &self,
        context: &mut RequestContext,
        credential: &Credential,
    ) -> Result<AupOutcome> {
        let acceptance = self.repository.verify(context, credential)?;
        context.flow.put_principal(acceptance.principal.clone());
        context.flow.put_aup_status(acceptance.clone());

        if let Some(registered_service) = context.registered_service.clone() {
            let access = AccessContext::new(registered_service.clone())
                .with_service(context.service.clone())
                .with_authentication(context.authentication.clone())
                .release_principal_attributes(true);
            self.access_enforcer.execute(&access)?.into_result()?;

            // 서비스 단위 opt-out이 전역 검사보다 우선한다
            if !registered_service.aup_enabled() {
                tracing::debug!(
                    service = %registered_service.name,
                    "acceptable use policy not enabled for service"
                );
                return Ok(AupOutcome::Accepted);
            }
        }

        if acceptance.accepted {
            Ok(AupOutcome::Accepted)
        } else {
            Ok(AupOutcome::MustAccept)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aup::access::{AccessDecision, RegisteredServiceAccessEnforcer};
    use crate::aup::context::{
        Authentication, Principal, RegisteredService, Service, PROPERTY_ACCESS_ENABLED,
        PROPERTY_AUP_ENABLED,
    };
    use crate::aup::status::AupAcceptance;
    use crate::error::Error;

    /// 항상 같은 수락 상태를 돌려주는 저장소
    struct FixedRepository {
        accepted: bool,
    }

    impl AupRepository for FixedRepository {
        fn verify(
            &self,
            _context: &RequestContext,
            credential: &Credential,
        ) -> Result<AupAcceptance> {
            let principal = Principal::new(credential.id.clone());
            Ok(if self.accepted {
                AupAcceptance::accepted(principal)
            } else {
                AupAcceptance::must_accept(principal)
            })
        }

        fn record_acceptance(&self, _credential: &Credential) -> Result<bool> {
            Ok(false)
        }
    }

    struct DenyAll;

    impl AccessEnforcer for DenyAll {
        fn execute(&self, _context: &AccessContext) -> Result<AccessDecision> {
            Ok(AccessDecision::deny("denied by test"))
        }
    }

    fn service_context(aup_enabled: Option<&str>) -> RequestContext {
        let mut registered = RegisteredService::new("svc_1", "My App");
        if let Some(value) = aup_enabled {
            registered = registered.with_property(PROPERTY_AUP_ENABLED, value);
        }
        RequestContext::new()
            .with_service(Service::new("https://app.example.com/login"))
            .with_authentication(Authentication::new(Principal::new("alice")))
            .with_registered_service(registered)
    }

    #[test]
    fn test_serviceless_request_follows_acceptance() {
        let gate = AupVerifyGate::new(
            FixedRepository { accepted: true },
            RegisteredServiceAccessEnforcer,
        );
        let mut context = RequestContext::new();
        let outcome = gate.verify(&mut context, &Credential::new("alice")).unwrap();
        assert_eq!(outcome, AupOutcome::Accepted);

        let gate = AupVerifyGate::new(
            FixedRepository { accepted: false },
            RegisteredServiceAccessEnforcer,
        );
        let mut context = RequestContext::new();
        let outcome = gate.verify(&mut context, &Credential::new("alice")).unwrap();
        assert_eq!(outcome, AupOutcome::MustAccept);
    }

    #[test]
    fn test_aup_disabled_service_short_circuits() {
        // 플래그가 없으면 기본값 false → 레코드와 무관하게 accepted
        let gate = AupVerifyGate::new(
            FixedRepository { accepted: false },
            RegisteredServiceAccessEnforcer,
        );
        let mut context = service_context(None);
        let outcome = gate.verify(&mut context, &Credential::new("alice")).unwrap();
        assert_eq!(outcome, AupOutcome::Accepted);

        let mut context = service_context(Some("false"));
        let outcome = gate.verify(&mut context, &Credential::new("alice")).unwrap();
        assert_eq!(outcome, AupOutcome::Accepted);
    }

    #[test]
    fn test_aup_enabled_service_follows_acceptance() {
        let gate = AupVerifyGate::new(
            FixedRepository { accepted: false },
            RegisteredServiceAccessEnforcer,
        );
        let mut context = service_context(Some("true"));
        let outcome = gate.verify(&mut context, &Credential::new("alice")).unwrap();
        assert_eq!(outcome, AupOutcome::MustAccept);

        let gate = AupVerifyGate::new(
            FixedRepository { accepted: true },
            RegisteredServiceAccessEnforcer,
        );
        let mut context = service_context(Some("true"));
        let outcome = gate.verify(&mut context, &Credential::new("alice")).unwrap();
        assert_eq!(outcome, AupOutcome::Accepted);
    }

    #[test]
    fn test_denied_access_aborts_after_flow_scope_writes() {
        let gate = AupVerifyGate::new(FixedRepository { accepted: true }, DenyAll);
        let mut context = service_context(Some("true"));

        let err = gate
            .verify(&mut context, &Credential::new("alice"))
            .unwrap_err();
        assert!(matches!(err, Error::AccessDenied { .. }));

        // 거부되어도 플로우 스코프는 이미 기록되어 있어야 한다
        assert_eq!(context.flow.principal().unwrap().id, "alice");
        assert!(context.flow.aup_status().is_some());
    }

    #[test]
    fn test_disabled_service_is_denied_by_default_enforcer() {
        let gate = AupVerifyGate::new(
            FixedRepository { accepted: true },
            RegisteredServiceAccessEnforcer,
        );
        let mut context = RequestContext::new().with_registered_service(
            RegisteredService::new("svc_1", "My App")
                .with_property(PROPERTY_ACCESS_ENABLED, "false"),
        );

        let err = gate
            .verify(&mut context, &Credential::new("alice"))
            .unwrap_err();
        assert!(matches!(err, Error::AccessDenied { .. }));
    }

    #[test]
    fn test_serviceless_request_skips_access_control() {
        // 서비스 없는 요청은 DenyAll이어도 거부되지 않는다
        let gate = AupVerifyGate::new(FixedRepository { accepted: true }, DenyAll);
        let mut context = RequestContext::new();
        let outcome = gate.verify(&mut context, &Credential::new("alice")).unwrap();
        assert_eq!(outcome, AupOutcome::Accepted);
    }
}
