use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// 세션 식별 쿠키 이름
pub const SESSION_COOKIE: &str = "seoga_session";

/// 요청의 세션 식별자
///
/// 쿠키에서 읽고, 없으면 새로 발급합니다. 로그인 개념이 없는 익명
/// 세션이므로 거부(rejection)가 일어나지 않습니다. `is_new`가 참이면
/// 핸들러가 응답에 Set-Cookie를 붙여야 합니다.
#[derive(Debug, Clone)]
pub struct SessionId {
    pub id: String,
    pub is_new: bool,
}

impl SessionId {
    /// 새 세션에 응답으로 심을 쿠키 값
    pub fn set_cookie_value(&self) -> String {
        format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id)
    }
}

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let existing = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(find_session_cookie);

        Ok(match existing {
            Some(id) => SessionId { id, is_new: false },
            None => SessionId {
                // UUIDv7: 시간순으로 정렬 가능한 ID
                id: uuid::Uuid::now_v7().to_string(),
                is_new: true,
            },
        })
    }
}

/// Cookie 헤더에서 세션 쿠키 값을 찾습니다.
fn find_session_cookie(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_session_cookie_among_others() {
        let header = "theme=dark; seoga_session=abc-123; lang=ko";
        assert_eq!(find_session_cookie(header), Some("abc-123".to_string()));
    }

    #[test]
    fn missing_cookie_yields_none() {
        assert_eq!(find_session_cookie("theme=dark"), None);
        assert_eq!(find_session_cookie(""), None);
    }

    #[test]
    fn set_cookie_value_is_scoped_to_the_whole_site() {
        let session = SessionId {
            id: "abc".to_string(),
            is_new: true,
        };
        assert_eq!(
            session.set_cookie_value(),
            "seoga_session=abc; Path=/; HttpOnly; SameSite=Lax"
        );
    }
}
