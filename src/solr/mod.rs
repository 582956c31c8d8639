//! # Solr 백엔드 모듈
//!
//! 외부 Solr 검색 서버와의 접점을 모아둔 모듈입니다.
//! 검색 자체(랭킹, 색인, 패싯 집계)는 전부 Solr가 수행하고,
//! 이 모듈은 파라미터 변환과 HTTP 왕복, 응답 해석만 담당합니다.
//!
//! 각 하위 모듈:
//! - `params`: Solr 파라미터 값/매핑 타입과 LocalParams 인용 규칙
//! - `pipeline`: HTTP 파라미터 → Solr 파라미터 변환 단계열
//! - `client`: `/select` HTTP 클라이언트
//! - `response`: 응답 JSON 구조와 패싯 결과 해석
//! - `facet`: 패싯 한도 삼상태와 값 목록 페이지네이터

pub mod client;
pub mod facet;
pub mod params;
pub mod pipeline;
pub mod response;

pub use client::SolrClient;
pub use facet::{FacetLimit, FacetPaginator, FacetSort};
pub use params::{SolrParams, SolrValue};
pub use pipeline::{ParamsPipeline, UserParams};
pub use response::{FacetItem, SolrResponse};
