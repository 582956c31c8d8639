use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Solr 결과 문서 하나를 감싸는 래퍼
///
/// 스키마가 느슨한 Solr 문서를 그대로 들고 다니며, 필드 접근과
/// 내보내기 렌더링에 필요한 최소한의 뷰만 제공합니다.
/// 응답마다 새로 만들어지고 어디에도 저장되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolrDocument {
    pub fields: serde_json::Map<String, Value>,
}

impl SolrDocument {
    pub fn new(fields: serde_json::Map<String, Value>) -> Self {
        Self { fields }
    }

    /// 유일 키 필드의 값. 문자열/숫자 모두 문자열로 돌려줍니다.
    pub fn id(&self, unique_key: &str) -> Option<String> {
        match self.fields.get(unique_key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// 단일값 문자열 필드. 다중값(배열) 필드면 첫 원소를 돌려줍니다.
    pub fn first_str(&self, field: &str) -> Option<&str> {
        match self.fields.get(field)? {
            Value::String(s) => Some(s),
            Value::Array(items) => items.first().and_then(Value::as_str),
            _ => None,
        }
    }

    /// 필드의 모든 문자열 값 (단일값이면 길이 1)
    pub fn all_strs(&self, field: &str) -> Vec<&str> {
        match self.fields.get(field) {
            Some(Value::String(s)) => vec![s.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}
