//! # OpenSearch 자동완성 라우트 핸들러
//!
//! 브라우저 검색창 자동완성(OpenSearch Suggestions) 형식의 응답입니다.
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /api/v1/opensearch?q=접두어 | `["접두어", [제목들]]` |

use crate::{error::AppError, routes::search::AppState, solr::UserParams};
use axum::{
    extract::{RawQuery, State},
    Json,
};
use serde_json::{json, Value};

/// 검색어 자동완성 후보를 조회합니다.
///
/// 응답은 OpenSearch Suggestions 규약대로
/// `[질의, [대표 필드 값 목록]]` 두 원소짜리 배열입니다.
pub async fn opensearch(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, AppError> {
    let user = UserParams::from_query(query.as_deref().unwrap_or_default());

    let (q, titles) = state
        .searcher
        .get_opensearch_response(&user)
        .await
        .map_err(|err| err.maybe_debug(state.debug))?;

    Ok(Json(json!([q, titles])))
}
