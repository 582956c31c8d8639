//! # 서비스 계층 (Business Logic Layer)
//!
//! 라우트 핸들러와 데이터 계층 사이의 비즈니스 로직을 담당합니다.
//!
//! 각 하위 모듈:
//! - `searcher`: 파이프라인 + Solr 클라이언트를 묶은 검색 오케스트레이션
//! - `history`: 세션별 검색 이력 (중복 제거, 12건 창)
//! - `export`: 문서 내보내기 형식 레지스트리

pub mod export;
pub mod history;
pub mod searcher;

pub use export::*;
pub use history::*;
pub use searcher::*;
