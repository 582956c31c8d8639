//! # 검색 이력 라우트 핸들러
//!
//! 현재 세션의 최근 검색 목록을 돌려줍니다.
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /api/v1/history | 세션의 최근 검색 (최신순, 최대 12건) |

use crate::{
    db,
    error::AppError,
    middleware::SessionId,
    routes::search::{json_with_session, AppState},
};
use axum::{extract::State, response::Response};
use serde_json::json;

/// 현재 세션의 검색 이력을 조회합니다.
///
/// `GET /api/v1/history` → `{ "searches": [{id, query_params, total, created_at}] }`
pub async fn search_history(
    State(state): State<AppState>,
    session: SessionId,
) -> Result<Response, AppError> {
    let searches = db::searches_for_session(&state.pool, &session.id)
        .await
        .map_err(|err| err.maybe_debug(state.debug))?;

    let entries: Vec<_> = searches
        .iter()
        .map(|search| {
            json!({
                "id": search.id,
                "query_params": search.params(),
                "total": search.total,
                "created_at": search.created_at,
            })
        })
        .collect();

    Ok(json_with_session(
        &session,
        json!({ "searches": entries }),
    ))
}
