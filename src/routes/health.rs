//! # 헬스체크(Health Check) 핸들러
//!
//! 서버가 정상적으로 동작하는지 확인하는 엔드포인트입니다.
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "ok", "service": "seoga" }`
//!
//! 주로 다음 용도로 사용됩니다:
//! - 로드밸런서의 서버 상태 확인
//! - 컨테이너 오케스트레이터의 헬스체크
//! - 모니터링 시스템의 가동 시간 추적

use axum::Json;
use serde_json::{json, Value};

/// `GET /health` — 서버 상태를 확인합니다.
///
/// Extractor 없이 작동하는 가장 단순한 핸들러입니다. Solr나 DB를
/// 건드리지 않으므로, 외부 의존성이 죽어 있어도 프로세스 자체의
/// 생존 여부는 이 응답으로 판별할 수 있습니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "seoga"
    }))
}
