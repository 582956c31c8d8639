//! # 검색 API 라우트 핸들러
//!
//! 질의/필터/패싯/페이지를 받아 Solr 검색을 실행하고,
//! 결과를 세션 검색 이력에 기록합니다.
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /api/v1/search?q=키워드 | 문서 검색 + 패싯 집계 |
//!
//! ## 사용 예시
//! ```text
//! GET /api/v1/search?q=history&search_field=title
//! GET /api/v1/search?q=history&f[genre_facet][]=Biography   ← 패싯 필터
//! GET /api/v1/search?q=history&page=2&per_page=20&sort=pub_date_sort+desc
//! ```

use crate::{
    config::SearchConfig,
    error::{AppError, QUERY_ERROR_NOTICE},
    middleware::SessionId,
    services::{save_current_search, ExportRegistry, Searcher},
    solr::{
        pipeline::raw_params_map,
        FacetItem, SolrParams, SolrResponse, UserParams,
    },
};
use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 모든 핸들러가 공유하는 애플리케이션 상태
///
/// Axum의 `State` 추출자로 각 핸들러에 복제되어 전달됩니다.
/// 풀과 서비스는 내부적으로 참조 카운팅되므로 Clone이 저렴합니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub searcher: Arc<Searcher>,
    pub exports: Arc<ExportRegistry>,
    /// 참이면 에러를 가공하지 않고 원문 그대로 돌려줍니다
    pub debug: bool,
}

/// 원시 쿼리 스트링을 `(키, 값)` 페어로 파싱합니다.
///
/// Axum의 `Query` 추출자는 반복 키(`facet.field=a&facet.field=b`)와
/// Rails식 중첩 키(`f[genre][]=x`)를 표현할 수 없으므로, 검색 계열
/// 핸들러는 원시 스트링을 직접 받습니다. 깨진 스트링은 빈 목록입니다.
pub fn query_pairs(query: Option<&str>) -> Vec<(String, String)> {
    query
        .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
        .unwrap_or_default()
}

/// 세션 쿠키가 새로 발급됐으면 응답에 Set-Cookie를 붙입니다.
pub fn json_with_session(session: &SessionId, body: Value) -> Response {
    let mut response = Json(body).into_response();
    if session.is_new {
        if let Ok(value) = HeaderValue::from_str(&session.set_cookie_value()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

/// 문서 검색을 수행합니다.
///
/// `GET /api/v1/search?q=키워드` → 결과 문서 + 패싯 집계 + 이력 레코드
///
/// ## 에러 처리
/// - Solr가 질의를 거부하면(문법 오류 등) **한 번만** 빈 검색으로
///   대체 실행하고 안내 문구를 함께 돌려줍니다. 빈 검색마저 실패하면
///   에러를 그대로 반환합니다 (무한 반복 방지).
/// - 디버그 모드에서는 대체 실행 없이 원문 에러를 반환합니다.
pub async fn search(
    State(state): State<AppState>,
    session: SessionId,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let pairs = query_pairs(query.as_deref());
    let user = UserParams::from_pairs(&pairs);
    let raw_params = raw_params_map(&pairs);

    let result = run_search(&state, &session, &user, &raw_params).await;

    let body = match result {
        Ok(body) => body,
        // 이해할 수 없는 질의: 빈 검색으로 한 번만 대체 실행합니다
        Err(AppError::QueryError(detail)) if !state.debug && user != UserParams::default() => {
            tracing::error!("Solr rejected the query, falling back to a blank search: {detail}");

            let blank = UserParams::default();
            // 거부당한 질의도, 대체 실행된 빈 검색도 이력에는 남기지 않습니다
            let mut body = run_search(&state, &session, &blank, &BTreeMap::new()).await?;
            body["notice"] = json!(QUERY_ERROR_NOTICE);
            body
        }
        Err(err) => return Err(err.maybe_debug(state.debug)),
    };

    Ok(json_with_session(&session, body))
}

/// 검색 실행 + 이력 기록 + 응답 JSON 조립
async fn run_search(
    state: &AppState,
    session: &SessionId,
    user: &UserParams,
    raw_params: &BTreeMap<String, Value>,
) -> Result<Value, AppError> {
    let (response, documents) = state
        .searcher
        .get_search_results(user, &SolrParams::new())
        .await?;

    // 이 검색을 세션 이력에 기록합니다 (같은 검색이면 기존 레코드 재사용)
    let saved = save_current_search(
        &state.pool,
        &session.id,
        raw_params,
        response.response.num_found as i64,
    )
    .await?;

    let facets = facet_payload(&response, state.searcher.config());

    Ok(json!({
        "response": {
            "num_found": response.response.num_found,
            "start": response.response.start,
            "docs": documents,
        },
        "facets": facets,
        "search": saved.map(|search| json!({ "id": search.id, "total": search.total })),
    }))
}

/// 응답의 패싯 집계를 `필드 → [{value, count}]` 맵으로 폅니다.
fn facet_payload(response: &SolrResponse, config: &SearchConfig) -> Value {
    let mut map = serde_json::Map::new();
    for field in response.facet_counts.facet_fields.keys() {
        let items: Vec<FacetItem> = response.facet_items(field);
        // +1 탐침이 섞여 있을 수 있으므로 설정 한도까지만 보여줍니다
        let limit = crate::solr::facet::facet_limit_for(config, field, Some(response));
        let shown: Vec<&FacetItem> = match limit.bound() {
            Some(n) => items.iter().take(n as usize).collect(),
            None => items.iter().collect(),
        };
        map.insert(field.clone(), json!(shown));
    }
    Value::Object(map)
}
