//! # 검색 레코드 데이터베이스 쿼리 모듈
//!
//! 검색(Search) 레코드와 세션별 검색 이력의 SQL 쿼리 함수들입니다.
//!
//! ## 이력 구조
//! ```text
//! searches          — 검색 하나를 정의하는 파라미터 맵 + 결과 건수
//! session_searches  — 세션 → 검색의 순서 있는 연결 (최신이 앞)
//! ```
//!
//! 이력 조회는 항상 세션에 연결된 행만 읽습니다. 전체 테이블을 뒤져
//! 같은 파라미터의 검색을 찾는 일은 없습니다 — 중복 판정은 서비스 계층이
//! 세션 이력으로 로딩된 레코드 안에서만 수행합니다.

use crate::error::AppError;
use crate::models::Search;
use serde_json::Value;
use sqlx::SqlitePool;

/// 새 검색 레코드를 생성합니다.
///
/// ## 매개변수
/// - `query_params`: 정규화된 파라미터 맵 (JSON으로 저장)
/// - `total`: 이 검색의 결과 건수 (생성 시점에 한 번 기록)
pub async fn create_search(
    pool: &SqlitePool,
    query_params: &Value,
    total: i64,
) -> Result<Search, AppError> {
    // UUIDv7: 시간순으로 정렬 가능한 ID
    let id = uuid::Uuid::now_v7().to_string();
    let params_json = serde_json::to_string(query_params)?;
    // RFC 3339 UTC 타임스탬프 (예: 2026-08-31T09:30:00Z)
    let created_at = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO searches (id, query_params, total, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&params_json)
    .bind(total)
    .bind(&created_at)
    .execute(pool)
    .await?;

    get_search(pool, &id).await?.ok_or(AppError::Internal(
        "Failed to retrieve created search".to_string(),
    ))
}

/// ID로 검색 레코드 하나를 조회합니다.
pub async fn get_search(pool: &SqlitePool, id: &str) -> Result<Option<Search>, AppError> {
    let search = sqlx::query_as::<_, Search>(
        r#"
        SELECT id, query_params, total, created_at
        FROM searches
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(search)
}

/// 한 세션의 검색 이력을 최신순으로 조회합니다.
///
/// session_searches의 rowid가 삽입 순서이므로 id DESC가 곧 최신순입니다.
pub async fn searches_for_session(
    pool: &SqlitePool,
    session_id: &str,
) -> Result<Vec<Search>, AppError> {
    let searches = sqlx::query_as::<_, Search>(
        r#"
        SELECT s.id, s.query_params, s.total, s.created_at
        FROM session_searches ss
        JOIN searches s ON s.id = ss.search_id
        WHERE ss.session_id = ?
        ORDER BY ss.id DESC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(searches)
}

/// 세션 이력의 맨 앞에 검색을 추가합니다.
pub async fn push_session_search(
    pool: &SqlitePool,
    session_id: &str,
    search_id: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO session_searches (session_id, search_id)
        VALUES (?, ?)
        "#,
    )
    .bind(session_id)
    .bind(search_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// 세션 이력을 최신 `window`건만 남기고 잘라냅니다.
pub async fn truncate_session_history(
    pool: &SqlitePool,
    session_id: &str,
    window: i64,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        DELETE FROM session_searches
        WHERE session_id = ?
          AND id NOT IN (
            SELECT id FROM session_searches
            WHERE session_id = ?
            ORDER BY id DESC
            LIMIT ?
          )
        "#,
    )
    .bind(session_id)
    .bind(session_id)
    .bind(window)
    .execute(pool)
    .await?;

    Ok(())
}
