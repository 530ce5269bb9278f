//! 원격 엔드포인트 호출 헬퍼
//!
//! 쿼리 파라미터와 basic auth를 적용한 단발 HTTP 교환을 제공합니다.
//! 재시도와 타임아웃은 호출자가 `reqwest::Client` 설정으로 제어합니다.

use reqwest::{Client, Method, Response};

use crate::error::{Error, Result};

/// 요청을 보내고 2xx 응답을 돌려줍니다.
///
/// 전송 실패와 2xx가 아닌 응답은 모두 `Error::Transport`로 변환됩니다.
/// 커넥션은 호출 범위를 벗어나지 않습니다. 응답이 소비되거나 드롭되는
/// 시점에 반납됩니다.
pub async fn execute(
    client: &Client,
    method: Method,
    url: &str,
    basic_auth: Option<(&str, &str)>,
    params: &[(&str, &str)],
) -> Result<Response> {
    let mut req = client.request(method, url).query(params);
    if let Some((username, password)) = basic_auth {
        req = req.basic_auth(username, Some(password));
    }

    let resp = req.send().await.map_err(|e| Error::Transport {
        message: format!("request failed: {}", e),
    })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Transport {
            message: format!("request failed ({})", status),
        });
    }

    Ok(resp)
}

/// 응답 본문을 문자열로 읽습니다.
pub async fn read_body(resp: Response) -> Result<String> {
    resp.text().await.map_err(|e| Error::Transport {
        message: format!("failed to read response body: {}", e),
    })
}
