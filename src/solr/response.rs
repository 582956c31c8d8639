//! # Solr 응답 타입
//!
//! `/select` 응답 JSON의 구조를 담는 타입들입니다.
//!
//! Solr의 패싯 결과는 `["fiction", 10, "history", 5]`처럼 값과 건수가
//! 번갈아 나오는 납작한 배열이라, `facet_items()`에서 (값, 건수) 쌍으로
//! 풀어서 돌려줍니다. `responseHeader.params`에는 우리가 보낸 요청
//! 파라미터가 메아리쳐 돌아오는데, 패싯 한도/정렬을 되짚을 때 사용합니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `/select` 응답 전체
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolrResponse {
    #[serde(rename = "responseHeader", default)]
    pub response_header: ResponseHeader,
    #[serde(default)]
    pub response: ResponseBody,
    #[serde(default)]
    pub facet_counts: FacetCounts,
}

/// 응답 헤더: 상태 코드와 메아리친 요청 파라미터
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseHeader {
    #[serde(default)]
    pub status: i32,
    /// Solr가 되돌려준 요청 파라미터. 값은 문자열 또는 문자열 배열입니다.
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

/// 매칭된 문서 묶음
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseBody {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub docs: Vec<serde_json::Map<String, Value>>,
}

/// 패싯 결과 묶음
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacetCounts {
    /// 패싯 필드 → 납작한 [값, 건수, 값, 건수, ...] 배열
    #[serde(default)]
    pub facet_fields: BTreeMap<String, Vec<Value>>,
}

/// 패싯 값 하나와 그 건수
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetItem {
    pub value: String,
    pub count: u64,
}

impl SolrResponse {
    /// 한 패싯 필드의 납작한 배열을 (값, 건수) 쌍으로 풀어냅니다.
    ///
    /// 필드가 응답에 없으면 빈 목록입니다.
    pub fn facet_items(&self, field: &str) -> Vec<FacetItem> {
        let Some(flat) = self.facet_counts.facet_fields.get(field) else {
            return Vec::new();
        };

        flat.chunks(2)
            .filter_map(|pair| match pair {
                [value, count] => Some(FacetItem {
                    value: value.as_str().map(str::to_string)?,
                    count: count.as_u64().unwrap_or(0),
                }),
                _ => None,
            })
            .collect()
    }

    /// 메아리친 요청 파라미터를 문자열로 읽습니다.
    pub fn echoed_str(&self, key: &str) -> Option<&str> {
        self.response_header.params.get(key).and_then(Value::as_str)
    }

    /// 메아리친 요청 파라미터를 정수로 읽습니다.
    ///
    /// Solr는 숫자 파라미터도 문자열로 돌려주는 일이 많아 둘 다 허용합니다.
    pub fn echoed_i64(&self, key: &str) -> Option<i64> {
        match self.response_header.params.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_fixture() -> SolrResponse {
        serde_json::from_value(json!({
            "responseHeader": {
                "status": 0,
                "params": {
                    "q": "dogs",
                    "facet.sort": "index",
                    "f.genre_facet.facet.limit": "11"
                }
            },
            "response": {
                "numFound": 2,
                "start": 0,
                "docs": [
                    {"id": "doc-1", "title_display": "Dogs"},
                    {"id": "doc-2", "title_display": "More Dogs"}
                ]
            },
            "facet_counts": {
                "facet_fields": {
                    "genre_facet": ["fiction", 10, "history", 5]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn facet_items_unflatten_value_count_pairs() {
        let response = response_fixture();

        assert_eq!(
            response.facet_items("genre_facet"),
            vec![
                FacetItem {
                    value: "fiction".to_string(),
                    count: 10
                },
                FacetItem {
                    value: "history".to_string(),
                    count: 5
                },
            ]
        );
    }

    #[test]
    fn missing_facet_field_yields_empty_items() {
        let response = response_fixture();
        assert!(response.facet_items("no_such_facet").is_empty());
    }

    #[test]
    fn echoed_params_parse_numeric_strings() {
        let response = response_fixture();

        assert_eq!(response.echoed_i64("f.genre_facet.facet.limit"), Some(11));
        assert_eq!(response.echoed_str("facet.sort"), Some("index"));
        assert_eq!(response.echoed_i64("missing"), None);
    }

    #[test]
    fn sparse_response_deserializes_with_defaults() {
        // 패싯 없는 응답도 기본값으로 채워져야 합니다
        let response: SolrResponse =
            serde_json::from_value(json!({"response": {"numFound": 0, "docs": []}})).unwrap();

        assert_eq!(response.response.num_found, 0);
        assert!(response.facet_counts.facet_fields.is_empty());
    }
}
