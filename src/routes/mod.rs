//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `search`: 검색 실행 + 패싯 집계 (공유 상태 `AppState`도 여기)
//! - `documents`: 문서 조회, 이전/다음 탐색, 내보내기
//! - `facets`: 패싯 값 목록 페이지네이션
//! - `history`: 세션별 검색 이력
//! - `opensearch`: 검색어 자동완성
//! - `health`: 서버 상태 확인 (헬스체크)

pub mod documents;
pub mod facets;
pub mod health;
pub mod history;
pub mod opensearch;
pub mod search;

// 각 모듈의 핸들러 함수들을 재공개하여
// main.rs에서 `routes::search`처럼 바로 접근 가능하게 합니다.
pub use documents::*;
pub use facets::*;
pub use health::*;
pub use history::*;
pub use opensearch::*;
pub use search::*;
