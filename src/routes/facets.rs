//! # 패싯 값 목록 라우트 핸들러
//!
//! 한 패싯 필드의 전체 값 목록을 페이지 단위로 탐색하는 엔드포인트입니다.
//! ("더 보기" 화면 — 검색 결과 옆의 잘린 패싯 목록을 끝까지 넘겨볼 때)
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /api/v1/facets/{field}?q=... | 패싯 값 목록 한 페이지 |
//!
//! 검색 컨텍스트(q, 필터)를 쿼리 스트링으로 같이 넘기면 그 검색의
//! 패싯이 집계됩니다. `facet.offset`/`facet.sort`로 페이지를 넘깁니다.

use crate::{
    error::AppError,
    routes::search::AppState,
    solr::{SolrParams, UserParams},
};
use axum::{
    extract::{Path, RawQuery, State},
    Json,
};
use serde_json::{json, Value};

/// 패싯 필드 하나의 값 목록을 조회합니다.
///
/// `GET /api/v1/facets/genre_facet?q=history&facet.offset=20&facet.sort=index`
pub async fn facet_list(
    State(state): State<AppState>,
    Path(field): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, AppError> {
    let user = UserParams::from_query(query.as_deref().unwrap_or_default());

    let paginator = state
        .searcher
        .get_facet_pagination(&field, &user, &SolrParams::new())
        .await
        .map_err(|err| err.maybe_debug(state.debug))?;

    Ok(Json(json!({
        "field": field,
        "items": paginator.items,
        "offset": paginator.offset,
        "limit": paginator.limit,
        "sort": paginator.sort,
        "has_next": paginator.has_next,
        "has_previous": paginator.has_previous,
        "next_offset": paginator.next_offset(),
        "previous_offset": paginator.previous_offset(),
    })))
}
