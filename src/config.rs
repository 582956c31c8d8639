//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 설정은 두 층으로 나뉩니다:
//!
//! 1. **`Config`**: 서버 구동에 필요한 환경변수 설정 (.env 또는 시스템 환경변수)
//! 2. **`SearchConfig`**: 검색 도메인 설정 — Solr 기본 파라미터, 검색 필드 정의,
//!    패싯 한도 등. JSON 파일에서 로딩하거나 내장 기본값을 사용합니다.
//!
//! `SearchConfig`는 전역 상태가 아니라 **명시적인 값**으로, 서버 시작 시 한 번
//! 만들어 `Searcher` 생성자에 주입합니다. 컴포넌트가 숨은 전역 설정에
//! 의존하지 않도록 하기 위함입니다.
//!
//! 환경변수 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `SOLR_URL`: Solr 코어의 베이스 URL (필수, 예: "http://localhost:8983/solr/seoga")
//! - `SEARCH_CONFIG_PATH`: 검색 설정 JSON 파일 경로 (선택)
//! - `HOST`: 서버 바인딩 주소 (기본값: "0.0.0.0")
//! - `PORT`: 서버 포트 번호 (기본값: 3000)
//! - `SEOGA_DEBUG`: 진단 모드. 켜면 친절한 안내문 대신 원본 에러를 그대로 노출

use crate::solr::SolrValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;

/// 서버 구동 환경 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 파일 경로 (예: "sqlite:data/seoga.db")
    pub database_url: String,
    /// Solr 코어의 베이스 URL. `/select` 요청이 이 아래로 나갑니다.
    pub solr_url: String,
    /// 검색 도메인 설정 JSON 파일 경로. 없으면 내장 기본값 사용
    pub search_config_path: Option<String>,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// 진단 모드. 켜면 검색 실패가 안내문으로 번역되지 않고 그대로 노출됩니다.
    pub debug: bool,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `SOLR_URL`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?, // 필수: 없으면 에러
            solr_url: env::var("SOLR_URL")?,         // 필수: 없으면 에러

            // .ok(): Result<String, VarError> → Option<String>
            search_config_path: env::var("SEARCH_CONFIG_PATH").ok(),

            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),

            // "1" 또는 "true"일 때만 진단 모드
            debug: env::var("SEOGA_DEBUG")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

/// 검색 필드 하나의 정의
///
/// 사용자가 `search_field=title`처럼 선택하는 검색 필드마다
/// Solr에 어떤 파라미터를 보낼지를 기술합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFieldConfig {
    /// 필드 식별 키 (HTTP 파라미터 `search_field`의 값)
    pub key: String,
    /// 이 필드 검색에 사용할 Solr 요청 핸들러(qt). 없으면 기본 핸들러 사용
    pub qt: Option<String>,
    /// 이 필드 검색 시 추가로 병합할 Solr 파라미터
    pub solr_parameters: BTreeMap<String, SolrValue>,
    /// `q` 앞에 붙일 Solr LocalParams (`{!key=value ...}` 구문)
    pub solr_local_parameters: BTreeMap<String, String>,
}

/// 패싯 필드별 한도 설정
///
/// - `Bounded(n)`: 고정 한도 n. 요청 시 `f.<field>.facet.limit = n + 1`을 보냅니다.
/// - `FromResponse(true)`: 한도를 설정하지 않고, Solr 응답에 메아리친
///   요청 파라미터에서 한도를 읽어옵니다. (JSON 설정에서는 `true`로 표기)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetLimitConfig {
    Bounded(u32),
    FromResponse(bool),
}

/// 검색 도메인 설정
///
/// Solr 파라미터 파이프라인과 패싯 페이지네이션이 참조하는 모든 정적 설정입니다.
/// JSON 파일로 배포 환경마다 달리 구성할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 모든 검색 요청에 깔리는 기본 Solr 파라미터 (가장 낮은 우선순위)
    pub default_solr_params: BTreeMap<String, SolrValue>,
    /// 검색 필드 정의 목록
    pub search_fields: Vec<SearchFieldConfig>,
    /// 패싯 필드 → 한도 설정
    pub facet_limits: BTreeMap<String, FacetLimitConfig>,
    /// 페이지당 결과 수의 상한. 초과 요청은 이 값으로 잘립니다.
    pub max_per_page: u32,
    /// 패싯 값 목록 조회의 한도 재정의. 설정하면 모든 패싯 목록에 우선 적용됩니다.
    pub facet_list_limit: Option<u32>,
    /// 문서를 유일하게 식별하는 Solr 필드 이름
    pub unique_key: String,
    /// 목록/자동완성에서 보여줄 대표 필드 이름
    pub display_field: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let mut default_solr_params = BTreeMap::new();
        default_solr_params.insert("qt".to_string(), SolrValue::from("search"));
        default_solr_params.insert("rows".to_string(), SolrValue::Int(10));
        default_solr_params.insert(
            "facet.field".to_string(),
            SolrValue::List(vec![
                "format".to_string(),
                "language_facet".to_string(),
                "genre_facet".to_string(),
            ]),
        );

        let mut facet_limits = BTreeMap::new();
        facet_limits.insert("genre_facet".to_string(), FacetLimitConfig::Bounded(10));
        facet_limits.insert("format".to_string(), FacetLimitConfig::Bounded(10));
        facet_limits.insert(
            "language_facet".to_string(),
            FacetLimitConfig::FromResponse(true),
        );

        let mut title_local = BTreeMap::new();
        title_local.insert("pf".to_string(), "$title_pf".to_string());
        title_local.insert("qf".to_string(), "$title_qf".to_string());

        let mut subject_params = BTreeMap::new();
        subject_params.insert("qf".to_string(), SolrValue::from("subject_t"));

        Self {
            default_solr_params,
            search_fields: vec![
                SearchFieldConfig {
                    key: "all_fields".to_string(),
                    ..Default::default()
                },
                SearchFieldConfig {
                    key: "title".to_string(),
                    qt: Some("search".to_string()),
                    solr_local_parameters: title_local,
                    ..Default::default()
                },
                SearchFieldConfig {
                    key: "subject".to_string(),
                    solr_parameters: subject_params,
                    ..Default::default()
                },
            ],
            facet_limits,
            max_per_page: 100,
            facet_list_limit: None,
            unique_key: "id".to_string(),
            display_field: "title_display".to_string(),
        }
    }
}

impl SearchConfig {
    /// JSON 파일에서 검색 설정을 로딩합니다. 경로가 없으면 내장 기본값을 반환합니다.
    pub async fn load(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path).await?;
                let config = serde_json::from_str(&raw)?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// 키로 검색 필드 정의를 찾습니다. 없으면 None (조용히 무시됩니다).
    pub fn search_field(&self, key: &str) -> Option<&SearchFieldConfig> {
        self.search_fields.iter().find(|f| f.key == key)
    }

    /// 패싯 필드의 한도 설정을 찾습니다.
    pub fn facet_limit(&self, field: &str) -> Option<FacetLimitConfig> {
        self.facet_limits.get(field).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facet_limit_config_parses_numbers_and_bools() {
        let raw = r#"{ "genre_facet": 10, "language_facet": true }"#;
        let limits: BTreeMap<String, FacetLimitConfig> = serde_json::from_str(raw).unwrap();

        assert_eq!(limits["genre_facet"], FacetLimitConfig::Bounded(10));
        assert_eq!(
            limits["language_facet"],
            FacetLimitConfig::FromResponse(true)
        );
    }

    #[test]
    fn search_field_lookup_misses_silently() {
        let config = SearchConfig::default();

        assert!(config.search_field("title").is_some());
        assert!(config.search_field("no_such_field").is_none());
    }
}
