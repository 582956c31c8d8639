use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Search {
    pub id: String,
    /// 검색을 정의한 파라미터 맵의 JSON 텍스트 (저장 형식 그대로)
    pub query_params: String,
    pub total: i64,
    pub created_at: String,
}

impl Search {
    /// 저장된 파라미터 JSON을 맵으로 파싱합니다. 깨진 행은 빈 맵으로 강등됩니다.
    pub fn params(&self) -> BTreeMap<String, Value> {
        serde_json::from_str(&self.query_params).unwrap_or_default()
    }
}

/// 단일 문서 화면의 검색 컨텍스트: 어느 검색의 몇 번째 결과를 보고 있는가
///
/// 요청에 검색 레코드 참조(sc)와 1부터 시작하는 위치(i)가 모두 있을 때만
/// 구성되며, 이전/다음 문서 탐색의 기준이 됩니다.
#[derive(Debug, Clone)]
pub struct SearchContext {
    pub search: Search,
    pub position: u32,
    pub sort: Option<String>,
}
