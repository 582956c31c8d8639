//! # 문서 조회/내보내기 라우트 핸들러
//!
//! 단일 문서 조회(이전/다음 탐색 포함)와 내보내기 엔드포인트입니다.
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /api/v1/documents/{id} | 문서 조회 (+탐색 컨텍스트) |
//! | GET | /api/v1/documents/{id}/export/{format} | 문서 하나 내보내기 |
//! | GET | /api/v1/export/{format}?id=a,b | 여러 문서 내보내기 |
//!
//! ## 탐색 컨텍스트
//! 검색 결과에서 문서로 들어올 때 `sc`(기억된 검색 id)와 `i`(결과 내
//! 1부터 시작하는 위치)를 붙이면, 그 검색을 재실행해 이전/다음 문서의
//! id를 함께 돌려줍니다. `sort`를 덧붙이면 재실행 시 정렬만 바꿉니다.

use crate::{
    db,
    error::AppError,
    middleware::SessionId,
    models::SearchContext,
    routes::search::{json_with_session, query_pairs, AppState},
    solr::UserParams,
};
use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};

/// 문서 하나를 조회합니다.
///
/// `GET /api/v1/documents/{id}?sc=...&i=3&sort=...`
pub async fn show_document(
    State(state): State<AppState>,
    session: SessionId,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let user = UserParams::from_query(query.as_deref().unwrap_or_default());

    let (_, document) = state
        .searcher
        .get_doc_by_id(&id)
        .await
        .map_err(|err| err.maybe_debug(state.debug))?;

    let context = navigation_context(&state, &user)
        .await
        .map_err(|err| err.maybe_debug(state.debug))?;

    Ok(json_with_session(
        &session,
        json!({
            "document": document,
            "context": context,
        }),
    ))
}

/// `sc`/`i`가 있으면 기억된 검색을 재실행해 이전/다음 문서를 찾습니다.
async fn navigation_context(state: &AppState, user: &UserParams) -> Result<Value, AppError> {
    let (Some(sc), Some(position)) = (&user.sc, user.i) else {
        return Ok(Value::Null);
    };
    let Some(search) = db::get_search(&state.pool, sc).await? else {
        // 만료되거나 낯선 검색 id는 컨텍스트 없이 문서만 보여줍니다
        return Ok(Value::Null);
    };

    let context = SearchContext {
        search,
        position,
        sort: user.sort.clone(),
    };

    let mut remembered = UserParams::from_value_map(&context.search.params());
    // 문서 화면에서 정렬을 바꿔 탐색하는 경우
    if context.sort.is_some() {
        remembered.sort = context.sort.clone();
    }

    let previous = if context.position > 1 {
        state
            .searcher
            .get_single_doc_via_search(context.position - 1, &remembered)
            .await?
    } else {
        None
    };
    let next = state
        .searcher
        .get_single_doc_via_search(context.position + 1, &remembered)
        .await?;

    let unique_key = &state.searcher.config().unique_key;
    Ok(json!({
        "search_id": context.search.id,
        "position": context.position,
        "total": context.search.total,
        "previous_id": previous.as_ref().and_then(|doc| doc.id(unique_key)),
        "next_id": next.as_ref().and_then(|doc| doc.id(unique_key)),
        "previous": previous,
        "next": next,
    }))
}

/// 문서 하나를 지정 형식으로 내보냅니다.
///
/// `GET /api/v1/documents/{id}/export/{format}`
/// 모르는 형식 이름은 404입니다.
pub async fn export_document(
    State(state): State<AppState>,
    Path((id, format)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let (_, document) = state
        .searcher
        .get_doc_by_id(&id)
        .await
        .map_err(|err| err.maybe_debug(state.debug))?;

    let (body, content_type) = state
        .exports
        .render(&format, &document, state.searcher.config())?;

    Ok(rendered_response(body, content_type))
}

/// 여러 문서를 한 번에 내보냅니다.
///
/// `GET /api/v1/export/{format}?id=a,b,c`
pub async fn export_documents(
    State(state): State<AppState>,
    Path(format): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let pairs = query_pairs(query.as_deref());
    let ids: Vec<String> = pairs
        .iter()
        .filter(|(key, _)| key == "id")
        .flat_map(|(_, value)| value.split(','))
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();

    if ids.is_empty() {
        return Err(AppError::BadRequest(
            "At least one document id is required".to_string(),
        ));
    }

    // 형식 이름부터 검증합니다 (모르는 형식에 Solr 왕복을 낭비하지 않도록)
    let export_format = state.exports.get(&format)?;

    let config = state.searcher.config();
    let (_, documents) = state
        .searcher
        .get_docs_for_field_values(&config.unique_key, &ids, &crate::solr::SolrParams::new())
        .await
        .map_err(|err| err.maybe_debug(state.debug))?;

    let parts: Vec<String> = documents
        .iter()
        .map(|document| (export_format.render)(document, config))
        .collect();

    Ok(rendered_response(parts.join("\n"), export_format.content_type))
}

/// 렌더링된 본문을 형식의 Content-Type으로 돌려줍니다.
fn rendered_response(body: String, content_type: &'static str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(content_type))],
        body,
    )
        .into_response()
}
