//! # 미들웨어 모듈
//!
//! 요청 전처리 단계에서 쓰는 추출자(extractor)들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `session`: 익명 세션 쿠키 추출자 (`SessionId`)

pub mod session;

pub use session::*;
