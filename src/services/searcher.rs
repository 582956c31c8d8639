//! # 검색 오케스트레이션 서비스
//!
//! 파라미터 파이프라인, Solr 클라이언트, 검색 설정을 한데 묶어
//! 라우트 핸들러가 쓰는 검색 연산들을 제공합니다.
//!
//! `Searcher`는 생성 시점에 설정과 클라이언트를 주입받는 평범한 값입니다.
//! 전역 연결 핸들이나 전역 설정에 기대지 않으므로, 테스트에서는 다른
//! 설정/파이프라인으로 얼마든지 따로 조립할 수 있습니다.

use crate::config::SearchConfig;
use crate::error::AppError;
use crate::models::SolrDocument;
use crate::solr::facet::{DEFAULT_FACET_LIST_LIMIT, FACET_OFFSET_KEY, FACET_SORT_KEY};
use crate::solr::{
    FacetLimit, FacetPaginator, FacetSort, ParamsPipeline, SolrClient, SolrParams, SolrResponse,
    UserParams,
};
use std::time::Instant;

/// 검색 연산의 진입점
pub struct Searcher {
    config: SearchConfig,
    pipeline: ParamsPipeline,
    client: SolrClient,
}

impl Searcher {
    /// 기본 파이프라인으로 Searcher를 만듭니다.
    pub fn new(config: SearchConfig, client: SolrClient) -> Self {
        Self::with_pipeline(config, client, ParamsPipeline::standard())
    }

    /// 단계 구성을 직접 지정해서 만듭니다 (호스트 커스터마이즈 지점).
    pub fn with_pipeline(config: SearchConfig, client: SolrClient, pipeline: ParamsPipeline) -> Self {
        Self {
            config,
            pipeline,
            client,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// HTTP 입력을 Solr 파라미터로 변환합니다 (파이프라인 전체 실행).
    pub fn solr_search_params(&self, user: &UserParams) -> SolrParams {
        self.pipeline.build(&self.config, user)
    }

    /// 검색을 실행해 응답과 문서 래퍼 목록을 돌려줍니다.
    ///
    /// `extra`는 호출자 재정의 파라미터로, 파이프라인 결과보다 우선합니다.
    pub async fn get_search_results(
        &self,
        user: &UserParams,
        extra: &SolrParams,
    ) -> Result<(SolrResponse, Vec<SolrDocument>), AppError> {
        let started = Instant::now();

        let mut solr_params = self.solr_search_params(user);
        solr_params.merge(extra);

        let response = self.client.select(&solr_params).await?;
        let documents = wrap_docs(&response);

        tracing::debug!(
            "Solr fetch: get_search_results ({:.1}ms, {} hits)",
            started.elapsed().as_secs_f64() * 1000.0,
            response.response.num_found
        );

        Ok((response, documents))
    }

    /// 단일 문서 조회용 파라미터: 문서 전용 핸들러 + 유일 키 질의
    pub fn solr_doc_params(&self, id: &str) -> SolrParams {
        let mut params = SolrParams::new();
        params.insert("qt", "document");
        params.insert("id", id);
        params
    }

    /// 유일 키로 문서 하나를 가져옵니다. 없으면 `NotFound`입니다.
    pub async fn get_doc_by_id(
        &self,
        id: &str,
    ) -> Result<(SolrResponse, SolrDocument), AppError> {
        let response = self.client.select(&self.solr_doc_params(id)).await?;

        let Some(first) = response.response.docs.first() else {
            return Err(AppError::NotFound);
        };
        let document = SolrDocument::new(first.clone());

        Ok((response, document))
    }

    /// `position`(1부터)번째 결과 한 건만 가져오는 파라미터를 만듭니다.
    ///
    /// 검색을 그대로 재실행하되 해당 오프셋의 한 건으로 좁힙니다.
    pub fn solr_single_doc_params(&self, position: u32, user: &UserParams) -> SolrParams {
        let mut solr_params = self.solr_search_params(user);
        // 1번째 문서 = 오프셋 0
        solr_params.insert("start", i64::from(position) - 1);
        solr_params.insert("rows", 1i64);
        solr_params.remove("page");
        solr_params.remove("per_page");
        solr_params.insert("fl", "*");
        solr_params
    }

    /// 기억된 검색의 결과 순서에서 `position`(1부터)번째 문서 하나만 가져옵니다.
    ///
    /// 범위를 벗어나면 `None`입니다. 이전/다음 문서 탐색의 기초 연산입니다.
    pub async fn get_single_doc_via_search(
        &self,
        position: u32,
        user: &UserParams,
    ) -> Result<Option<SolrDocument>, AppError> {
        if position == 0 {
            return Ok(None);
        }

        let solr_params = self.solr_single_doc_params(position, user);
        let response = self.client.select(&solr_params).await?;
        Ok(response
            .response
            .docs
            .first()
            .map(|doc| SolrDocument::new(doc.clone())))
    }

    /// 한 필드가 주어진 값들 중 하나와 일치하는 문서들을 가져옵니다.
    ///
    /// 여러 문서의 내보내기(인용/EndNote)를 한 번에 처리할 때 사용합니다.
    /// OR 불리언이 필요하므로 lucene 파서를 강제하고, 패싯과 맞춤법 검사는 끕니다.
    pub async fn get_docs_for_field_values(
        &self,
        field: &str,
        values: &[String],
        extra: &SolrParams,
    ) -> Result<(SolrResponse, Vec<SolrDocument>), AppError> {
        let value_str = format!("(\"{}\")", values.join("\" OR \""));

        let mut overrides = SolrParams::new();
        overrides.insert("defType", "lucene");
        overrides.insert("q", format!("{field}:{value_str}"));
        overrides.insert("fl", "*");
        overrides.insert("facet", "false");
        overrides.insert("spellcheck", "false");
        overrides.merge(extra);

        let mut solr_params = self.solr_search_params(&UserParams::default());
        solr_params.merge(&overrides);

        let response = self.client.select(&solr_params).await?;
        let documents = wrap_docs(&response);
        Ok((response, documents))
    }

    /// 한 패싯 필드의 값 목록 조회용 파라미터를 만듭니다.
    ///
    /// 검색 컨텍스트(질의/필터)를 보존하기 위해 전체 파이프라인 위에
    /// 얹은 다음, 패싯 목록 전용 재정의를 덮습니다:
    /// 대상 필드 고정, per-field 한도(+1 탐침), 오프셋/정렬, `rows = 0`
    /// (값 목록에는 문서 행이 필요 없습니다).
    pub fn solr_facet_params(
        &self,
        facet_field: &str,
        user: &UserParams,
        extra: &SolrParams,
    ) -> SolrParams {
        let mut solr_params = self.solr_search_params(user);
        solr_params.merge(extra);

        solr_params.insert("facet.field", facet_field);

        // 한도 우선순위: 요청의 facet.limit + 1 → 설정 재정의 + 1 → 기본 20 + 1
        let limit = if let Some(limit) = solr_params.get_i64("facet.limit") {
            limit + 1
        } else if let Some(limit) = self.config.facet_list_limit {
            i64::from(limit) + 1
        } else {
            i64::from(DEFAULT_FACET_LIST_LIMIT) + 1
        };
        // 요청 핸들러의 필드별 기본값을 확실히 덮으려면 per-field 키여야 합니다
        solr_params.insert(format!("f.{facet_field}.facet.limit"), limit);

        // 오프셋/정렬 우선순위: 호출자 재정의(extra) → 요청 키 → 기본값
        let offset = extra
            .get_i64(FACET_OFFSET_KEY)
            .or_else(|| user.facet_offset.map(|offset| offset as i64))
            .unwrap_or(0);
        solr_params.insert(FACET_OFFSET_KEY, offset);
        if !extra.contains_key(FACET_SORT_KEY) {
            if let Some(sort) = &user.facet_sort {
                solr_params.insert(FACET_SORT_KEY, sort.clone());
            }
        }
        solr_params.insert("rows", 0i64);

        solr_params
    }

    /// 한 패싯 필드의 값들을 페이지 단위로 가져옵니다.
    pub async fn get_facet_pagination(
        &self,
        facet_field: &str,
        user: &UserParams,
        extra: &SolrParams,
    ) -> Result<FacetPaginator, AppError> {
        let solr_params = self.solr_facet_params(facet_field, user, extra);
        let response = self.client.select(&solr_params).await?;

        // 유효 한도: 설정 재정의 → 전송한 per-field 한도에서 +1 탐침 되돌리기 → 무제한
        let limit = if let Some(limit) = self.config.facet_list_limit {
            FacetLimit::Bounded(limit)
        } else if let Some(submitted) =
            solr_params.get_i64(&format!("f.{facet_field}.facet.limit"))
        {
            FacetLimit::from_echoed(submitted)
        } else {
            FacetLimit::Unlimited
        };

        // 정렬은 응답에 메아리친 파라미터에서 되짚습니다 (필드별 → 전역 순)
        let sort = response
            .echoed_str(&format!("f.{facet_field}.facet.sort"))
            .or_else(|| response.echoed_str("facet.sort"))
            .and_then(FacetSort::parse)
            .unwrap_or(match limit {
                // Solr 기본: 한도가 있으면 건수순, 없으면 사전순
                FacetLimit::Bounded(_) => FacetSort::Count,
                _ => FacetSort::Index,
            });

        let offset = solr_params.get_i64(FACET_OFFSET_KEY).unwrap_or(0).max(0) as u64;

        Ok(FacetPaginator::new(
            response.facet_items(facet_field),
            offset,
            limit,
            sort,
        ))
    }

    /// 자동완성(OpenSearch)용 파라미터: 대표 필드만, 10건
    pub fn solr_opensearch_params(&self, user: &UserParams) -> SolrParams {
        let mut solr_params = self.solr_search_params(user);
        solr_params.insert("per_page", 10i64);
        solr_params.insert("fl", self.config.display_field.clone());
        solr_params
    }

    /// 질의와 각 문서의 대표 필드 값 목록을 돌려줍니다.
    pub async fn get_opensearch_response(
        &self,
        user: &UserParams,
    ) -> Result<(String, Vec<String>), AppError> {
        let solr_params = self.solr_opensearch_params(user);
        let q = solr_params.get_str("q").unwrap_or_default().to_string();

        let response = self.client.select(&solr_params).await?;
        let titles = response
            .response
            .docs
            .iter()
            .map(|doc| {
                SolrDocument::new(doc.clone())
                    .first_str(&self.config.display_field)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect();

        Ok((q, titles))
    }
}

/// 응답의 문서들을 래퍼로 감쌉니다.
fn wrap_docs(response: &SolrResponse) -> Vec<SolrDocument> {
    response
        .response
        .docs
        .iter()
        .map(|doc| SolrDocument::new(doc.clone()))
        .collect()
}
