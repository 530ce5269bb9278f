//! Passwordless 인증 토큰
//!
//! # 개요
//!
//! 비밀번호를 대신하는 단기 불투명 토큰의 발급/조회/폐기를 다룹니다.
//! 저장소 구현은 상태를 자신의 뒤편에만 두며, 호출 사이에 클라이언트
//! 캐시를 유지하지 않습니다.
//!
//! # 모듈 구조
//!
//! - `repository`: 저장소 인터페이스
//! - `memory`: 인메모리 저장소 (만료 지원)
//! - `rest`: 원격 REST 엔드포인트 저장소

mod memory;
mod repository;
mod rest;

pub use memory::MemoryTokenRepository;
pub use repository::{PasswordlessToken, PasswordlessTokenRepository};
pub use rest::{RestTokenConfig, RestTokenRepository, TransportErrorPolicy};

/// 영숫자 토큰 생성
pub fn generate_token(size: usize) -> String {
    use rand::Rng;

    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

    let mut rng = rand::thread_rng();
    (0..size)
        .map(|_| {
            let idx = rng.gen_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}
