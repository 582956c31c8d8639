//! # Solr 요청 파라미터 타입
//!
//! Solr에 보낼 파라미터 집합을 표현하는 타입들입니다.
//!
//! - `SolrValue`: 파라미터 값 하나 (문자열 / 정수 / 문자열 목록)
//! - `SolrParams`: 파라미터 이름 → 값의 정렬된 매핑
//! - `solr_param_quote()`: LocalParams 값의 인용 규칙
//!
//! `SolrParams`는 HTTP 요청 직전에 `(이름, 값)` 페어 목록으로 펼쳐지며,
//! 목록 값은 같은 키를 반복해서 내보냅니다 (Solr의 다중값 파라미터 규약).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Solr 파라미터 값 하나
///
/// `#[serde(untagged)]`: JSON에서 태그 없이 형태로 구분합니다.
/// 숫자 → Int, 문자열 → Str, 배열 → List
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SolrValue {
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl SolrValue {
    /// 문자열 값이면 &str로 반환합니다.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SolrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// 정수로 해석 가능하면 반환합니다. 숫자 문자열("100")도 허용합니다.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SolrValue::Int(n) => Some(*n),
            SolrValue::Str(s) => s.trim().parse().ok(),
            SolrValue::List(_) => None,
        }
    }
}

impl From<&str> for SolrValue {
    fn from(value: &str) -> Self {
        SolrValue::Str(value.to_string())
    }
}

impl From<String> for SolrValue {
    fn from(value: String) -> Self {
        SolrValue::Str(value)
    }
}

impl From<i64> for SolrValue {
    fn from(value: i64) -> Self {
        SolrValue::Int(value)
    }
}

impl From<Vec<String>> for SolrValue {
    fn from(value: Vec<String>) -> Self {
        SolrValue::List(value)
    }
}

/// Solr 요청 파라미터 매핑
///
/// BTreeMap 기반이라 키 순서가 항상 일정합니다 (테스트와 로그 판독에 유리).
/// 요청 생애주기 동안만 존재하며 별도의 식별자는 없습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolrParams(BTreeMap<String, SolrValue>);

impl SolrParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// 값을 설정합니다. 이미 있으면 덮어씁니다.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SolrValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&SolrValue> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(SolrValue::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(SolrValue::as_i64)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<SolrValue> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SolrValue)> {
        self.0.iter()
    }

    /// 목록 값에 원소를 추가합니다.
    ///
    /// 키가 없으면 새 목록을 만들고, 단일 문자열 값이면 그 값을 첫 원소로
    /// 하는 목록으로 승격시킵니다. 기존 목록 뒤에 덧붙이므로 먼저 들어온
    /// 값(예: 기본 파라미터의 fq)이 보존됩니다.
    pub fn push_list(&mut self, key: impl Into<String>, value: String) {
        let key = key.into();
        match self.0.remove(&key) {
            Some(SolrValue::List(mut list)) => {
                list.push(value);
                self.0.insert(key, SolrValue::List(list));
            }
            Some(SolrValue::Str(existing)) => {
                self.0.insert(key, SolrValue::List(vec![existing, value]));
            }
            Some(SolrValue::Int(existing)) => {
                self.0
                    .insert(key, SolrValue::List(vec![existing.to_string(), value]));
            }
            None => {
                self.0.insert(key, SolrValue::List(vec![value]));
            }
        }
    }

    /// `push_list`와 같지만 이미 목록에 있는 값은 다시 넣지 않습니다.
    pub fn push_list_unique(&mut self, key: impl Into<String>, value: String) {
        let key = key.into();
        let already = match self.0.get(&key) {
            Some(SolrValue::List(list)) => list.iter().any(|v| v == &value),
            Some(SolrValue::Str(existing)) => existing == &value,
            _ => false,
        };
        if !already {
            self.push_list(key, value);
        }
    }

    /// 다른 파라미터 집합을 병합합니다. 인자 쪽(`other`)이 이깁니다.
    ///
    /// 파이프라인 결과 위에 호출자 재정의를 얹을 때 사용합니다 (최고 우선순위).
    pub fn merge(&mut self, other: &SolrParams) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// HTTP 요청용 `(이름, 값)` 페어 목록으로 펼칩니다.
    ///
    /// 목록 값은 같은 키를 반복합니다: `facet.field=a&facet.field=b`
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in self.iter() {
            match value {
                SolrValue::Str(s) => pairs.push((key.clone(), s.clone())),
                SolrValue::Int(n) => pairs.push((key.clone(), n.to_string())),
                SolrValue::List(list) => {
                    for item in list {
                        pairs.push((key.clone(), item.clone()));
                    }
                }
            }
        }
        pairs
    }
}

impl FromIterator<(String, SolrValue)> for SolrParams {
    fn from_iter<T: IntoIterator<Item = (String, SolrValue)>>(iter: T) -> Self {
        SolrParams(iter.into_iter().collect())
    }
}

/// LocalParams 값의 인용 처리
///
/// 영문자/숫자/`$`/`_`/`-`/`^`만으로 이루어진 단순 단어(bare word)는 그대로 두고,
/// 그 외에는 지정한 인용 부호로 감싸며 내부의 인용 부호를 역슬래시로 이스케이프합니다.
pub fn solr_param_quote(value: &str, quote: char) -> String {
    if is_bare_word(value) {
        return value.to_string();
    }

    let escaped = value.replace('\'', "\\'").replace('"', "\\\"");
    format!("{quote}{escaped}{quote}")
}

fn is_bare_word(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '$' | '_' | '-' | '^'))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================
    // QUOTING TESTS - solr_param_quote
    // ============================================================

    #[test]
    fn bare_words_stay_unquoted() {
        assert_eq!(solr_param_quote("dismax", '\''), "dismax");
        assert_eq!(solr_param_quote("$title_qf", '\''), "$title_qf");
        assert_eq!(solr_param_quote("boost-2^10", '\''), "boost-2^10");
        assert_eq!(solr_param_quote("abc123", '\''), "abc123");
    }

    #[test]
    fn values_with_spaces_get_quoted() {
        assert_eq!(
            solr_param_quote("one two", '\''),
            "'one two'".to_string()
        );
    }

    #[test]
    fn embedded_quotes_are_escaped() {
        assert_eq!(
            solr_param_quote("it's \"quoted\"", '\''),
            "'it\\'s \\\"quoted\\\"'"
        );
    }

    #[test]
    fn empty_value_is_quoted() {
        assert_eq!(solr_param_quote("", '\''), "''");
    }

    // ============================================================
    // SOLR PARAMS TESTS
    // ============================================================

    #[test]
    fn push_list_promotes_scalar_to_list() {
        let mut params = SolrParams::new();
        params.insert("fq", "existing");
        params.push_list("fq", "added".to_string());

        assert_eq!(
            params.get("fq"),
            Some(&SolrValue::List(vec![
                "existing".to_string(),
                "added".to_string()
            ]))
        );
    }

    #[test]
    fn push_list_unique_skips_duplicates() {
        let mut params = SolrParams::new();
        params.push_list_unique("facet.field", "format".to_string());
        params.push_list_unique("facet.field", "format".to_string());
        params.push_list_unique("facet.field", "genre".to_string());

        assert_eq!(
            params.get("facet.field"),
            Some(&SolrValue::List(vec![
                "format".to_string(),
                "genre".to_string()
            ]))
        );
    }

    #[test]
    fn merge_prefers_other_side() {
        let mut base = SolrParams::new();
        base.insert("rows", 10i64);
        base.insert("q", "kept");

        let mut overrides = SolrParams::new();
        overrides.insert("rows", 0i64);

        base.merge(&overrides);

        assert_eq!(base.get_i64("rows"), Some(0));
        assert_eq!(base.get_str("q"), Some("kept"));
    }

    #[test]
    fn query_pairs_repeat_list_keys() {
        let mut params = SolrParams::new();
        params.insert(
            "facet.field",
            SolrValue::List(vec!["format".to_string(), "genre".to_string()]),
        );
        params.insert("rows", 10i64);

        let pairs = params.to_query_pairs();

        assert_eq!(
            pairs,
            vec![
                ("facet.field".to_string(), "format".to_string()),
                ("facet.field".to_string(), "genre".to_string()),
                ("rows".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn as_i64_reads_numeric_strings() {
        assert_eq!(SolrValue::from("100").as_i64(), Some(100));
        assert_eq!(SolrValue::Int(7).as_i64(), Some(7));
        assert_eq!(SolrValue::from("abc").as_i64(), None);
    }
}
