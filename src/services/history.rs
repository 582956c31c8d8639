//! # 검색 이력 서비스
//!
//! 세션마다 최근 검색을 중복 없이, 최신순으로, 고정 개수까지만 보관합니다.
//!
//! ## 규칙
//! - 요청 파라미터에서 부기용 키(controller/action/total/counter/commit)를
//!   제외하고도 남는 것이 없으면 검색으로 치지 않습니다.
//! - `page`는 항상 버립니다. 이력 항목은 "그 검색"이지 "그 검색의 3페이지"가
//!   아니기 때문입니다.
//! - 같은 파라미터 맵의 검색이 이미 세션 이력에 있으면 그 레코드를 재사용합니다.
//!   판정은 세션 이력으로 로딩된 레코드 안에서만 합니다 (전체 테이블 스캔 없음).
//! - 새로 만들면 결과 건수를 함께 기록하고 이력 맨 앞에 붙인 뒤,
//!   이력을 12건 창으로 잘라냅니다.

use crate::db;
use crate::error::AppError;
use crate::models::Search;
use serde_json::Value;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

/// 세션에 보관하는 최근 검색의 고정 창 크기
pub const SEARCH_HISTORY_WINDOW: i64 = 12;

/// 검색 판정에서 제외하는 부기용 키.
/// 이 키들만 있는 요청은 실제 검색이 아닙니다.
const EXCLUDED_KEYS: &[&str] = &["controller", "action", "total", "counter", "commit"];

/// 요청 파라미터 맵을 이력 저장용으로 정리합니다.
///
/// 부기용 키와 `page`를 제거한 깊은 복사본을 돌려줍니다.
/// 원본 요청 파라미터는 건드리지 않습니다.
pub fn history_params(raw: &BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    raw.iter()
        .filter(|(key, _)| !EXCLUDED_KEYS.contains(&key.as_str()) && key.as_str() != "page")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// 현재 검색을 세션 이력에 저장합니다.
///
/// 이미 같은 검색이 이력에 있으면 그 레코드를, 새로 만들었으면 새 레코드를
/// 돌려줍니다. 검색으로 칠 것이 없으면 `None`입니다.
pub async fn save_current_search(
    pool: &SqlitePool,
    session_id: &str,
    raw_params: &BTreeMap<String, Value>,
    total: i64,
) -> Result<Option<Search>, AppError> {
    let params = history_params(raw_params);
    if params.is_empty() {
        return Ok(None);
    }

    // 세션 이력으로 로딩된 레코드 안에서만 같은 검색을 찾습니다
    let loaded = db::searches_for_session(pool, session_id).await?;
    if let Some(existing) = loaded.into_iter().find(|search| search.params() == params) {
        return Ok(Some(existing));
    }

    let params_value = serde_json::to_value(&params)?;

    let search = db::create_search(pool, &params_value, total).await?;
    db::push_session_search(pool, session_id, &search.id).await?;
    db::truncate_session_history(pool, session_id, SEARCH_HISTORY_WINDOW).await?;

    Ok(Some(search))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    fn params(q: &str) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        map.insert("q".to_string(), json!(q));
        map
    }

    #[test]
    fn bookkeeping_keys_and_page_are_dropped() {
        let mut raw = params("dogs");
        raw.insert("page".to_string(), json!("3"));
        raw.insert("action".to_string(), json!("index"));
        raw.insert("controller".to_string(), json!("catalog"));
        raw.insert("commit".to_string(), json!("Search"));

        let cleaned = history_params(&raw);

        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned["q"], json!("dogs"));
    }

    #[tokio::test]
    async fn empty_after_exclusions_is_not_recorded() {
        let pool = test_pool().await;
        let mut raw = BTreeMap::new();
        raw.insert("action".to_string(), json!("index"));

        let saved = save_current_search(&pool, "session-1", &raw, 0).await.unwrap();

        assert!(saved.is_none());
        assert!(db::searches_for_session(&pool, "session-1")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn identical_search_is_deduplicated() {
        let pool = test_pool().await;

        let first = save_current_search(&pool, "session-1", &params("dogs"), 42)
            .await
            .unwrap()
            .unwrap();

        // 같은 검색의 다른 페이지 — page는 무시되어야 합니다
        let mut second_page = params("dogs");
        second_page.insert("page".to_string(), json!("2"));
        let second = save_current_search(&pool, "session-1", &second_page, 42)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.id, second.id);
        // 건수는 최초 생성 시점의 값이 유지됩니다
        assert_eq!(second.total, 42);

        let history = db::searches_for_session(&pool, "session-1").await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn history_is_capped_at_the_window_most_recent_first() {
        let pool = test_pool().await;

        // 서로 다른 검색 13건
        for n in 0..13 {
            save_current_search(&pool, "session-1", &params(&format!("query-{n}")), n)
                .await
                .unwrap();
        }

        let history = db::searches_for_session(&pool, "session-1").await.unwrap();

        assert_eq!(history.len(), SEARCH_HISTORY_WINDOW as usize);
        // 최신이 맨 앞: query-12, 가장 오래된 query-0은 밀려났습니다
        assert_eq!(history[0].params()["q"], json!("query-12"));
        assert_eq!(history[11].params()["q"], json!("query-1"));
    }

    #[tokio::test]
    async fn sessions_do_not_share_history() {
        let pool = test_pool().await;

        save_current_search(&pool, "session-a", &params("dogs"), 1)
            .await
            .unwrap();
        save_current_search(&pool, "session-b", &params("cats"), 1)
            .await
            .unwrap();

        let a = db::searches_for_session(&pool, "session-a").await.unwrap();
        let b = db::searches_for_session(&pool, "session-b").await.unwrap();

        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(a[0].params()["q"], json!("dogs"));
        assert_eq!(b[0].params()["q"], json!("cats"));
    }
}
