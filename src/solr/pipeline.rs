//! # Solr 파라미터 파이프라인
//!
//! HTTP 요청 파라미터를 Solr 요청 파라미터로 변환하는 순서 있는 단계열입니다.
//!
//! ## 우선순위 (낮음 → 높음)
//! 1. 배포 설정의 기본 Solr 파라미터 (`SearchConfig::default_solr_params`)
//! 2. 선택된 검색 필드 정의의 파라미터 (`search_field` 파라미터로 결정)
//! 3. 허용된 HTTP 입력 파라미터 (아무 키나 받지 않고 `UserParams`로 걸러진 것만)
//! 4. 호출자가 넘기는 재정의 파라미터 (`SolrParams::merge`로 마지막에 병합)
//!
//! ## 단계 구성
//! 각 단계는 `(설정, 누적 파라미터, 사용자 파라미터)`를 받는 순수 함수이며,
//! `ParamsPipeline`이 **명시적인 순서 목록**으로 보관합니다. 호스트 애플리케이션은
//! 전역 가변 목록을 고치는 대신, 조립 시점에 단계를 더하거나 빼서 커스터마이즈합니다.

use crate::config::{FacetLimitConfig, SearchConfig};
use crate::solr::params::{solr_param_quote, SolrParams, SolrValue};
use serde_json::Value;
use std::collections::BTreeMap;

/// 허용된 HTTP 입력 파라미터의 타입 있는 뷰
///
/// 원시 쿼리 스트링 페어에서 파이프라인이 아는 키만 골라 담습니다.
/// 모르는 키는 여기서 버려지므로, 임의의 입력이 Solr로 새지 않습니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserParams {
    /// 자유 텍스트 질의
    pub q: Option<String>,
    /// 레거시: Solr 요청 핸들러 직접 지정 (검색 필드 정의가 있으면 덮어씌워짐)
    pub qt: Option<String>,
    /// 선택된 검색 필드 키
    pub search_field: Option<String>,
    /// 패싯 선택: 필드 → 선택된 값 목록 (`f[genre][]=fiction` 형태로 들어옴)
    pub f: BTreeMap<String, Vec<String>>,
    /// 원시 `facet.field` 재정의 (배열 또는 단일값)
    pub facet_field: Vec<String>,
    /// 원시 `facets` 재정의 (레거시 별칭)
    pub facets: Vec<String>,
    /// 정렬 지시자
    pub sort: Option<String>,
    /// 1부터 시작하는 결과 페이지 번호
    pub page: Option<u32>,
    /// 페이지당 결과 수 (상한 초과 시 잘림)
    pub per_page: Option<u32>,
    /// 패싯 값 목록 페이지네이션의 오프셋 (`facet.offset` 요청 키)
    pub facet_offset: Option<u64>,
    /// 패싯 값 목록의 정렬 (`facet.sort` 요청 키)
    pub facet_sort: Option<String>,
    /// 검색 컨텍스트: 기억된 검색 레코드의 id
    pub sc: Option<String>,
    /// 검색 컨텍스트: 결과 목록 내 1부터 시작하는 위치
    pub i: Option<u32>,
}

impl UserParams {
    /// 원시 쿼리 스트링에서 파싱합니다.
    pub fn from_query(query: &str) -> Self {
        match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
            Ok(pairs) => Self::from_pairs(&pairs),
            // 깨진 쿼리 스트링은 빈 파라미터로 조용히 강등됩니다
            Err(_) => Self::default(),
        }
    }

    /// `(키, 값)` 페어 목록에서 타입 있는 뷰를 만듭니다.
    ///
    /// 반복 키(`facet.field=a&facet.field=b`)와 Rails식 중첩 키
    /// (`f[genre][]=fiction`)를 모두 지원합니다. 스칼라 키는 마지막 값이 이깁니다.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut user = UserParams::default();

        for (key, value) in pairs {
            match key.as_str() {
                "q" => user.q = Some(value.clone()),
                "qt" => user.qt = Some(value.clone()),
                "search_field" => user.search_field = Some(value.clone()),
                "sort" => user.sort = Some(value.clone()),
                "sc" => user.sc = Some(value.clone()),
                "page" => user.page = value.trim().parse().ok(),
                "per_page" => user.per_page = value.trim().parse().ok(),
                "i" => user.i = value.trim().parse().ok(),
                "facet.offset" => user.facet_offset = value.trim().parse().ok(),
                "facet.sort" => user.facet_sort = Some(value.clone()),
                "facet.field" | "facet.field[]" => user.facet_field.push(value.clone()),
                "facets" | "facets[]" => user.facets.push(value.clone()),
                other => {
                    // f[genre][] 또는 f[genre] → 패싯 선택
                    if let Some(field) = facet_selection_field(other) {
                        user.f.entry(field).or_default().push(value.clone());
                    }
                    // 그 외의 키는 타입 뷰에 싣지 않습니다 (이력 저장은 원시 맵이 담당)
                }
            }
        }

        user
    }

    /// 이력에 저장된 JSON 파라미터 맵에서 복원합니다.
    ///
    /// 기억된 검색을 재실행할 때(다음/이전 문서 탐색) 사용합니다.
    pub fn from_value_map(map: &BTreeMap<String, Value>) -> Self {
        let mut user = UserParams::default();

        for (key, value) in map {
            match key.as_str() {
                "q" => user.q = value_as_string(value),
                "qt" => user.qt = value_as_string(value),
                "search_field" => user.search_field = value_as_string(value),
                "sort" => user.sort = value_as_string(value),
                "sc" => user.sc = value_as_string(value),
                "page" => user.page = value_as_u32(value),
                "per_page" => user.per_page = value_as_u32(value),
                "i" => user.i = value_as_u32(value),
                "facet.offset" => user.facet_offset = value_as_u32(value).map(u64::from),
                "facet.sort" => user.facet_sort = value_as_string(value),
                "facet.field" => user.facet_field = value_as_string_list(value),
                "facets" => user.facets = value_as_string_list(value),
                "f" => {
                    if let Value::Object(fields) = value {
                        for (field, values) in fields {
                            user.f.insert(field.clone(), value_as_string_list(values));
                        }
                    }
                }
                _ => {}
            }
        }

        user
    }
}

/// `f[genre][]`/`f[genre]` 형태의 키에서 패싯 필드 이름을 뽑아냅니다.
fn facet_selection_field(key: &str) -> Option<String> {
    let inner = key.strip_prefix("f[")?;
    let inner = inner.strip_suffix("[]").unwrap_or(inner);
    let field = inner.strip_suffix(']')?;
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}

/// 원시 페어 목록을 이력 저장용 JSON 맵으로 정규화합니다.
///
/// - `f[field][]` 중첩 키는 `{"f": {"field": [...]}}` 객체로 모읍니다.
/// - 같은 키가 반복되면 배열이 됩니다.
/// - 단일 키는 문자열 그대로 둡니다.
///
/// 같은 검색은 항상 같은 맵으로 정규화되므로, 이 맵의 동등성이
/// 이력 중복 판정의 기준이 됩니다.
pub fn raw_params_map(pairs: &[(String, String)]) -> BTreeMap<String, Value> {
    let mut map: BTreeMap<String, Value> = BTreeMap::new();

    for (key, value) in pairs {
        if let Some(field) = facet_selection_field(key) {
            let entry = map
                .entry("f".to_string())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
            if let Value::Object(fields) = entry {
                let list = fields
                    .entry(field)
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(items) = list {
                    items.push(Value::String(value.clone()));
                }
            }
            continue;
        }

        let key = key.strip_suffix("[]").unwrap_or(key).to_string();
        match map.remove(&key) {
            None => {
                map.insert(key, Value::String(value.clone()));
            }
            Some(Value::Array(mut items)) => {
                items.push(Value::String(value.clone()));
                map.insert(key, Value::Array(items));
            }
            Some(existing) => {
                map.insert(key, Value::Array(vec![existing, Value::String(value.clone())]));
            }
        }
    }

    map
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().filter_map(value_as_string).collect(),
        _ => Vec::new(),
    }
}

/// 파이프라인 단계 하나: 누적 파라미터를 제자리에서 변환하는 순수 함수
pub type ParamStep = fn(&SearchConfig, &mut SolrParams, &UserParams);

/// 이름 붙은 파이프라인 단계
#[derive(Clone, Copy)]
pub struct PipelineStep {
    pub name: &'static str,
    pub run: ParamStep,
}

/// 명시적인 순서 목록으로 보관되는 변환 단계열
///
/// 기본 구성은 `standard()`이며, 호스트는 빌더 메서드로 조립 시점에
/// 단계를 추가/제거/삽입할 수 있습니다.
#[derive(Clone)]
pub struct ParamsPipeline {
    steps: Vec<PipelineStep>,
}

impl ParamsPipeline {
    /// 기본 단계열: 기본값 → 질의 → 패싯 필터 → 패싯 지시자 → 페이징/정렬
    pub fn standard() -> Self {
        Self {
            steps: vec![
                PipelineStep {
                    name: "default_params",
                    run: default_params_step,
                },
                PipelineStep {
                    name: "query",
                    run: query_step,
                },
                PipelineStep {
                    name: "facet_filters",
                    run: facet_filters_step,
                },
                PipelineStep {
                    name: "faceting",
                    run: faceting_step,
                },
                PipelineStep {
                    name: "sorting_paging",
                    run: sorting_paging_step,
                },
            ],
        }
    }

    /// 단계가 없는 빈 파이프라인 (테스트나 전면 재구성용)
    pub fn empty() -> Self {
        Self { steps: Vec::new() }
    }

    /// 끝에 단계를 추가합니다.
    pub fn with_step(mut self, name: &'static str, run: ParamStep) -> Self {
        self.steps.push(PipelineStep { name, run });
        self
    }

    /// 이름으로 단계를 제거합니다. 없는 이름이면 그대로 둡니다.
    pub fn without_step(mut self, name: &str) -> Self {
        self.steps.retain(|step| step.name != name);
        self
    }

    /// 지정한 단계 바로 앞에 새 단계를 끼워 넣습니다.
    /// 기준 단계가 없으면 끝에 추가합니다.
    pub fn insert_before(mut self, anchor: &str, name: &'static str, run: ParamStep) -> Self {
        let position = self
            .steps
            .iter()
            .position(|step| step.name == anchor)
            .unwrap_or(self.steps.len());
        self.steps.insert(position, PipelineStep { name, run });
        self
    }

    /// 현재 단계 이름 목록 (순서대로)
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name).collect()
    }

    /// 모든 단계를 순서대로 실행해 Solr 파라미터를 만듭니다.
    pub fn build(&self, config: &SearchConfig, user: &UserParams) -> SolrParams {
        let mut solr = SolrParams::new();
        for step in &self.steps {
            (step.run)(config, &mut solr, user);
        }
        solr
    }
}

/// 1단계: 배포 설정의 기본 Solr 파라미터 복사
///
/// 값을 복제해서 넣으므로, 이후 단계가 목록 값을 변형해도
/// 공유 설정 원본은 오염되지 않습니다.
pub fn default_params_step(config: &SearchConfig, solr: &mut SolrParams, _user: &UserParams) {
    for (key, value) in &config.default_solr_params {
        solr.insert(key.clone(), value.clone());
    }
}

/// 2단계: 사용자 질의를 Solr `q`로 변환
///
/// - 레거시 `qt` 입력은 먼저 적용되지만, 검색 필드 정의의 `qt`가 있으면 덮어씁니다.
/// - 검색 필드의 추가 파라미터를 병합합니다.
/// - 필드에 LocalParams가 정의되어 있으면 `q`를 `{!k=v ...}질의` 형태로 감쌉니다.
/// - `spellcheck.q`에는 LocalParams 없는 원본 질의를 넣습니다
///   (이미 설정돼 있으면 존중). LocalParams까지 맞춤법 검사를 하면 안 되기 때문입니다.
pub fn query_step(config: &SearchConfig, solr: &mut SolrParams, user: &UserParams) {
    if let Some(qt) = &user.qt {
        solr.insert("qt", qt.clone());
    }

    let field_def = user
        .search_field
        .as_deref()
        .and_then(|key| config.search_field(key));

    if let Some(def) = field_def {
        if let Some(qt) = &def.qt {
            solr.insert("qt", qt.clone());
        }
        for (key, value) in &def.solr_parameters {
            solr.insert(key.clone(), value.clone());
        }
    }

    match field_def.filter(|def| !def.solr_local_parameters.is_empty()) {
        Some(def) => {
            let local_params = def
                .solr_local_parameters
                .iter()
                .map(|(key, value)| format!("{}={}", key, solr_param_quote(value, '\'')))
                .collect::<Vec<_>>()
                .join(" ");
            let q = user.q.as_deref().unwrap_or_default();
            solr.insert("q", format!("{{!{local_params}}}{q}"));
        }
        None => {
            if let Some(q) = &user.q {
                solr.insert("q", q.clone());
            }
        }
    }

    if !solr.contains_key("spellcheck.q") {
        if let Some(q) = &user.q {
            solr.insert("spellcheck.q", q.clone());
        }
    }
}

/// 3단계: 패싯 선택을 Solr 필터 쿼리(`fq`)로 변환
///
/// 선택된 (필드, 값) 쌍 하나당 정확 일치 raw 구문의 `fq` 절 하나가 됩니다.
/// 기본 파라미터에 이미 `fq`가 있으면 그 뒤에 덧붙입니다.
pub fn facet_filters_step(_config: &SearchConfig, solr: &mut SolrParams, user: &UserParams) {
    for (field, values) in &user.f {
        for value in values {
            solr.push_list("fq", format!("{{!raw f={field}}}{value}"));
        }
    }
}

/// 4단계: 패싯 지시자(`facet.*`) 설정
///
/// - 원시 `facet.field`/`facets` 재정의를 기존 목록에 중복 없이 합칩니다.
/// - 고정 한도가 설정된 패싯 필드마다 `f.<field>.facet.limit = 한도 + 1`을
///   보냅니다. +1은 "더 보기" 링크를 추가 왕복 없이 판단하기 위한 탐침입니다.
pub fn faceting_step(config: &SearchConfig, solr: &mut SolrParams, user: &UserParams) {
    for value in user.facet_field.iter().chain(user.facets.iter()) {
        solr.push_list_unique("facet.field", value.clone());
    }

    for (field, limit) in &config.facet_limits {
        if let FacetLimitConfig::Bounded(n) = limit {
            solr.insert(format!("f.{field}.facet.limit"), i64::from(n + 1));
        }
    }
}

/// 5단계: 페이징/정렬 파라미터 복사
///
/// 비어 있지 않은 값만 넘기고, `per_page`는 상한으로 잘라냅니다.
/// 잘린 경우에만 문자열로 표현하고, 그대로인 값은 타입을 바꾸지 않습니다.
pub fn sorting_paging_step(config: &SearchConfig, solr: &mut SolrParams, user: &UserParams) {
    if let Some(page) = user.page {
        solr.insert("page", i64::from(page));
    }

    if let Some(sort) = user.sort.as_deref().filter(|s| !s.trim().is_empty()) {
        solr.insert("sort", sort);
    }

    if let Some(per_page) = user.per_page {
        if per_page > config.max_per_page {
            solr.insert("per_page", config.max_per_page.to_string());
        } else {
            solr.insert("per_page", i64::from(per_page));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchFieldConfig;

    fn config() -> SearchConfig {
        SearchConfig::default()
    }

    fn build(user: &UserParams) -> SolrParams {
        ParamsPipeline::standard().build(&config(), user)
    }

    // ============================================================
    // QUERY STEP - q / qt / spellcheck.q
    // ============================================================

    #[test]
    fn plain_query_passes_through() {
        let user = UserParams {
            q: Some("war and peace".to_string()),
            ..Default::default()
        };
        let solr = build(&user);

        assert_eq!(solr.get_str("q"), Some("war and peace"));
        assert_eq!(solr.get_str("spellcheck.q"), Some("war and peace"));
    }

    #[test]
    fn absent_query_stays_absent() {
        let solr = build(&UserParams::default());

        assert!(solr.get("q").is_none());
        assert!(solr.get("spellcheck.q").is_none());
    }

    #[test]
    fn local_params_wrap_the_query() {
        // title 필드는 기본 설정에서 pf/qf LocalParams를 가집니다
        let user = UserParams {
            q: Some("war and peace".to_string()),
            search_field: Some("title".to_string()),
            ..Default::default()
        };
        let solr = build(&user);

        assert_eq!(
            solr.get_str("q"),
            Some("{!pf=$title_pf qf=$title_qf}war and peace")
        );
        // spellcheck.q는 LocalParams 없는 원본 질의여야 합니다
        assert_eq!(solr.get_str("spellcheck.q"), Some("war and peace"));
    }

    #[test]
    fn local_params_quote_non_bare_values() {
        let mut config = config();
        let mut local = std::collections::BTreeMap::new();
        local.insert("qf".to_string(), "two words".to_string());
        config.search_fields.push(SearchFieldConfig {
            key: "custom".to_string(),
            solr_local_parameters: local,
            ..Default::default()
        });

        let user = UserParams {
            q: Some("x".to_string()),
            search_field: Some("custom".to_string()),
            ..Default::default()
        };
        let solr = ParamsPipeline::standard().build(&config, &user);

        assert_eq!(solr.get_str("q"), Some("{!qf='two words'}x"));
    }

    #[test]
    fn search_field_qt_overrides_legacy_qt_param() {
        // title 필드 정의는 qt=search를 가지므로, 입력 qt는 밀려납니다
        let user = UserParams {
            q: Some("x".to_string()),
            qt: Some("legacy_handler".to_string()),
            search_field: Some("title".to_string()),
            ..Default::default()
        };
        let solr = build(&user);

        assert_eq!(solr.get_str("qt"), Some("search"));
    }

    #[test]
    fn legacy_qt_survives_without_field_definition() {
        let mut config = config();
        config.default_solr_params.remove("qt");

        let user = UserParams {
            qt: Some("legacy_handler".to_string()),
            ..Default::default()
        };
        let solr = ParamsPipeline::standard().build(&config, &user);

        assert_eq!(solr.get_str("qt"), Some("legacy_handler"));
    }

    #[test]
    fn unknown_search_field_degrades_silently() {
        let user = UserParams {
            q: Some("x".to_string()),
            search_field: Some("no_such_field".to_string()),
            ..Default::default()
        };
        let solr = build(&user);

        assert_eq!(solr.get_str("q"), Some("x"));
    }

    #[test]
    fn search_field_extra_parameters_are_merged() {
        let user = UserParams {
            q: Some("cats".to_string()),
            search_field: Some("subject".to_string()),
            ..Default::default()
        };
        let solr = build(&user);

        assert_eq!(solr.get_str("qf"), Some("subject_t"));
    }

    // ============================================================
    // FACET FILTER STEP - f → fq
    // ============================================================

    #[test]
    fn facet_selections_become_one_fq_per_value() {
        let mut user = UserParams::default();
        user.f.insert(
            "genre".to_string(),
            vec!["fiction".to_string(), "history".to_string()],
        );
        let solr = build(&user);

        assert_eq!(
            solr.get("fq"),
            Some(&SolrValue::List(vec![
                "{!raw f=genre}fiction".to_string(),
                "{!raw f=genre}history".to_string(),
            ]))
        );
    }

    #[test]
    fn facet_filters_append_to_existing_fq() {
        let mut config = config();
        config
            .default_solr_params
            .insert("fq".to_string(), SolrValue::from("type:book"));

        let mut user = UserParams::default();
        user.f
            .insert("genre".to_string(), vec!["fiction".to_string()]);
        let solr = ParamsPipeline::standard().build(&config, &user);

        assert_eq!(
            solr.get("fq"),
            Some(&SolrValue::List(vec![
                "type:book".to_string(),
                "{!raw f=genre}fiction".to_string(),
            ]))
        );
    }

    // ============================================================
    // FACETING STEP - facet.field / 한도 +1
    // ============================================================

    #[test]
    fn bounded_facet_limits_get_plus_one() {
        let solr = build(&UserParams::default());

        // 기본 설정: genre_facet 한도 10 → 11 전송
        assert_eq!(solr.get_i64("f.genre_facet.facet.limit"), Some(11));
        // FromResponse 필드에는 per-field 한도를 보내지 않습니다
        assert!(solr.get("f.language_facet.facet.limit").is_none());
    }

    #[test]
    fn raw_facet_field_overrides_are_unioned_and_deduped() {
        let user = UserParams {
            facet_field: vec!["era_facet".to_string(), "format".to_string()],
            facets: vec!["era_facet".to_string()],
            ..Default::default()
        };
        let solr = build(&user);

        // 기본 목록(format, language_facet, genre_facet) 뒤에 era_facet만 추가됩니다
        assert_eq!(
            solr.get("facet.field"),
            Some(&SolrValue::List(vec![
                "format".to_string(),
                "language_facet".to_string(),
                "genre_facet".to_string(),
                "era_facet".to_string(),
            ]))
        );
    }

    // ============================================================
    // SORTING/PAGING STEP - per_page 상한
    // ============================================================

    #[test]
    fn per_page_over_max_is_clamped_to_string() {
        let user = UserParams {
            per_page: Some(500),
            ..Default::default()
        };
        let solr = build(&user);

        // 잘린 값은 문자열 "100"
        assert_eq!(solr.get("per_page"), Some(&SolrValue::from("100")));
    }

    #[test]
    fn per_page_under_max_keeps_its_type() {
        let user = UserParams {
            per_page: Some(50),
            ..Default::default()
        };
        let solr = build(&user);

        // 그대로인 값은 정수 50
        assert_eq!(solr.get("per_page"), Some(&SolrValue::Int(50)));
    }

    #[test]
    fn blank_sort_is_omitted() {
        let user = UserParams {
            sort: Some("   ".to_string()),
            page: Some(3),
            ..Default::default()
        };
        let solr = build(&user);

        assert!(solr.get("sort").is_none());
        assert_eq!(solr.get_i64("page"), Some(3));
    }

    // ============================================================
    // DEFAULTS STEP - 깊은 복사
    // ============================================================

    #[test]
    fn defaults_are_copied_not_aliased() {
        let config = config();
        let mut user = UserParams::default();
        user.facet_field.push("extra".to_string());

        // 같은 설정으로 두 번 빌드해도 첫 빌드의 변형이 새어 들어가지 않습니다
        let first = ParamsPipeline::standard().build(&config, &user);
        let second = ParamsPipeline::standard().build(&config, &UserParams::default());

        assert_eq!(
            first.get("facet.field"),
            Some(&SolrValue::List(vec![
                "format".to_string(),
                "language_facet".to_string(),
                "genre_facet".to_string(),
                "extra".to_string(),
            ]))
        );
        assert_eq!(
            second.get("facet.field"),
            Some(&SolrValue::List(vec![
                "format".to_string(),
                "language_facet".to_string(),
                "genre_facet".to_string(),
            ]))
        );
    }

    // ============================================================
    // PIPELINE COMPOSITION
    // ============================================================

    fn noop_step(_config: &SearchConfig, solr: &mut SolrParams, _user: &UserParams) {
        solr.insert("custom", "yes");
    }

    #[test]
    fn steps_can_be_removed_and_added_at_composition_time() {
        let pipeline = ParamsPipeline::standard()
            .without_step("faceting")
            .with_step("custom", noop_step);

        assert_eq!(
            pipeline.step_names(),
            vec![
                "default_params",
                "query",
                "facet_filters",
                "sorting_paging",
                "custom"
            ]
        );

        let solr = pipeline.build(&config(), &UserParams::default());
        assert_eq!(solr.get_str("custom"), Some("yes"));
        assert!(solr.get("f.genre_facet.facet.limit").is_none());
    }

    #[test]
    fn insert_before_places_step_at_anchor() {
        let pipeline = ParamsPipeline::standard().insert_before("query", "custom", noop_step);

        assert_eq!(pipeline.step_names()[1], "custom");
    }

    // ============================================================
    // USER PARAMS PARSING
    // ============================================================

    #[test]
    fn from_pairs_collects_nested_facet_selections() {
        let pairs = vec![
            ("q".to_string(), "dogs".to_string()),
            ("f[genre][]".to_string(), "fiction".to_string()),
            ("f[genre][]".to_string(), "history".to_string()),
            ("f[format]".to_string(), "book".to_string()),
            ("page".to_string(), "2".to_string()),
        ];
        let user = UserParams::from_pairs(&pairs);

        assert_eq!(user.q.as_deref(), Some("dogs"));
        assert_eq!(
            user.f["genre"],
            vec!["fiction".to_string(), "history".to_string()]
        );
        assert_eq!(user.f["format"], vec!["book".to_string()]);
        assert_eq!(user.page, Some(2));
    }

    #[test]
    fn malformed_numbers_are_ignored() {
        let pairs = vec![
            ("page".to_string(), "abc".to_string()),
            ("per_page".to_string(), "-3".to_string()),
        ];
        let user = UserParams::from_pairs(&pairs);

        assert_eq!(user.page, None);
        assert_eq!(user.per_page, None);
    }

    #[test]
    fn raw_params_map_groups_facets_and_repeats() {
        let pairs = vec![
            ("q".to_string(), "dogs".to_string()),
            ("f[genre][]".to_string(), "fiction".to_string()),
            ("f[genre][]".to_string(), "history".to_string()),
            ("facet.field".to_string(), "a".to_string()),
            ("facet.field".to_string(), "b".to_string()),
        ];
        let map = raw_params_map(&pairs);

        assert_eq!(map["q"], Value::String("dogs".to_string()));
        assert_eq!(
            map["f"],
            serde_json::json!({"genre": ["fiction", "history"]})
        );
        assert_eq!(map["facet.field"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn from_value_map_round_trips_a_saved_search() {
        let pairs = vec![
            ("q".to_string(), "dogs".to_string()),
            ("search_field".to_string(), "title".to_string()),
            ("f[genre][]".to_string(), "fiction".to_string()),
        ];
        let map = raw_params_map(&pairs);
        let restored = UserParams::from_value_map(&map);

        assert_eq!(restored.q.as_deref(), Some("dogs"));
        assert_eq!(restored.search_field.as_deref(), Some("title"));
        assert_eq!(restored.f["genre"], vec!["fiction".to_string()]);
    }
}
