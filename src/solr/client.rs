//! # Solr HTTP 클라이언트
//!
//! `/select` 핸들러에 검색 요청을 보내는 얇은 클라이언트입니다.
//!
//! 앱 수준 파라미터 중 `page`/`per_page`는 Solr가 모르는 키이므로
//! 전송 직전에 `start`/`rows`로 번역합니다. 명시적으로 설정된
//! `start`/`rows`가 있으면 그쪽이 이깁니다.
//!
//! 재시도나 캐싱은 없습니다. 요청 하나당 동기적인(await) 왕복 한 번이며,
//! 연결 실패는 그대로 전파되고 Solr의 4xx/5xx 응답(잘못된 질의 구문 등)은
//! `AppError::QueryError`로 번역됩니다.

use crate::error::AppError;
use crate::solr::params::SolrParams;
use crate::solr::response::SolrResponse;

/// Solr 코어 하나를 가리키는 클라이언트
///
/// `reqwest::Client`는 내부적으로 커넥션 풀을 공유하므로 clone이 저렴합니다.
#[derive(Debug, Clone)]
pub struct SolrClient {
    http: reqwest::Client,
    base_url: String,
}

impl SolrClient {
    /// 코어 베이스 URL로 클라이언트를 만듭니다.
    /// 예: "http://localhost:8983/solr/seoga"
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `/select`에 검색 요청을 보내고 응답을 파싱합니다.
    pub async fn select(&self, params: &SolrParams) -> Result<SolrResponse, AppError> {
        let url = format!("{}/select", self.base_url);
        let pairs = select_pairs(params);

        let response = self.http.get(&url).query(&pairs).send().await?;

        let status = response.status();
        if !status.is_success() {
            // 잘못된 질의 구문 등으로 Solr가 요청을 거부한 경우입니다.
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Solr rejected the request: {}", body);
            return Err(AppError::QueryError(format!(
                "Solr returned {status}: {body}"
            )));
        }

        let parsed = response.json::<SolrResponse>().await?;
        Ok(parsed)
    }
}

/// 파라미터 집합을 전송용 페어 목록으로 펼칩니다.
///
/// - `wt=json`을 강제합니다 (응답 파서가 JSON을 전제).
/// - `per_page` → `rows`, `page` → `start = (page - 1) * rows`로 번역합니다.
fn select_pairs(params: &SolrParams) -> Vec<(String, String)> {
    let per_page = params.get_i64("per_page");
    let page = params.get_i64("page");

    let mut pairs = vec![("wt".to_string(), "json".to_string())];
    pairs.extend(
        params
            .to_query_pairs()
            .into_iter()
            .filter(|(key, _)| key != "page" && key != "per_page" && key != "wt"),
    );

    if let Some(per_page) = per_page {
        if !params.contains_key("rows") {
            pairs.push(("rows".to_string(), per_page.to_string()));
        }
    }

    if let Some(page) = page {
        if !params.contains_key("start") {
            let rows = params
                .get_i64("rows")
                .or(per_page)
                .unwrap_or(10)
                .max(0);
            let start = (page - 1).max(0) * rows;
            pairs.push(("start".to_string(), start.to_string()));
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(pairs: &[(String, String)], key: &str) -> Option<String> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    #[test]
    fn per_page_translates_to_rows() {
        let mut params = SolrParams::new();
        params.insert("per_page", 25i64);
        let pairs = select_pairs(&params);

        assert_eq!(pair(&pairs, "rows").as_deref(), Some("25"));
        assert!(pair(&pairs, "per_page").is_none());
    }

    #[test]
    fn page_translates_to_start_offset() {
        let mut params = SolrParams::new();
        params.insert("per_page", 20i64);
        params.insert("page", 3i64);
        let pairs = select_pairs(&params);

        // 3페이지, 페이지당 20건 → 오프셋 40
        assert_eq!(pair(&pairs, "start").as_deref(), Some("40"));
    }

    #[test]
    fn explicit_start_and_rows_win() {
        let mut params = SolrParams::new();
        params.insert("per_page", 20i64);
        params.insert("page", 3i64);
        params.insert("start", 2i64);
        params.insert("rows", 1i64);
        let pairs = select_pairs(&params);

        assert_eq!(pair(&pairs, "start").as_deref(), Some("2"));
        assert_eq!(pair(&pairs, "rows").as_deref(), Some("1"));
    }

    #[test]
    fn wt_json_is_always_present() {
        let pairs = select_pairs(&SolrParams::new());
        assert_eq!(pair(&pairs, "wt").as_deref(), Some("json"));
    }
}
