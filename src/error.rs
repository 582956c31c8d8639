//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 검색 서비스가 구분해서 다루는 실패는 두 가지입니다:
//!
//! 1. `NotFound`: 단일 문서 조회가 아무것도 찾지 못한 경우.
//!    "존재하지 않는 자료" 안내(404)로 번역됩니다.
//! 2. `QueryError`: Solr가 요청을 거부한 경우(잘못된 질의 구문 등).
//!    "검색을 이해하지 못했습니다" 안내(500)로 번역됩니다.
//!
//! 그 외의 연결 실패/DB 오류는 특별히 다루지 않고 일반 오류 응답으로
//! 흘려보냅니다. 진단 모드(`SEOGA_DEBUG`)에서는 라우트가 에러를
//! `Debug`로 감싸 원본 내용을 그대로 노출합니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 자료가 없을 때 사용자에게 보여줄 안내문
pub const NOT_FOUND_NOTICE: &str = "Sorry, you have requested a record that doesn't exist.";
/// Solr가 질의를 거부했을 때 사용자에게 보여줄 안내문
pub const QUERY_ERROR_NOTICE: &str = "Sorry, I don't understand your search.";

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 문서가 검색 인덱스에 없음 (HTTP 404)
    #[error("Record not found")]
    NotFound,

    /// 알 수 없는 내보내기 형식 (HTTP 404)
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Solr가 질의를 거부함 — 보통 잘못된 질의 구문 (HTTP 500)
    #[error("Solr rejected the query: {0}")]
    QueryError(String),

    /// Solr 연결 자체의 실패 (HTTP 502)
    /// #[from]: reqwest::Error에 `?`를 쓰면 자동으로 이 variant가 됩니다.
    #[error("Solr connection error: {0}")]
    Solr(#[from] reqwest::Error),

    /// 데이터베이스 오류 (HTTP 500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON 직렬화/역직렬화 오류 (HTTP 500)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 진단 모드 전용: 번역 없이 원본 에러 내용을 그대로 노출 (HTTP 500)
    #[error("{0}")]
    Debug(String),
}

impl AppError {
    /// 진단 모드라면 에러를 `Debug`로 감싸 원본을 노출시킵니다.
    ///
    /// 운영 모드(debug=false)에서는 그대로 통과시켜
    /// 안내문 번역(`IntoResponse`)을 타게 합니다.
    pub fn maybe_debug(self, debug: bool) -> AppError {
        if debug {
            AppError::Debug(format!("{self:?}"))
        } else {
            self
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Solr, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            // 존재하지 않는 자료 요청 → 친절한 404 안내문
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "not_found",
                NOT_FOUND_NOTICE.to_string(),
            ),

            AppError::UnknownFormat(ref format) => {
                (StatusCode::NOT_FOUND, "unknown_format", format!("Unknown export format: {format}"))
            }

            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),

            // 잘못된 질의 → "검색을 이해하지 못했습니다" 안내문.
            // 실제 Solr 에러는 로그에만 남깁니다.
            AppError::QueryError(ref detail) => {
                tracing::warn!("Query error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "query_error",
                    QUERY_ERROR_NOTICE.to_string(),
                )
            }

            AppError::Solr(ref e) => {
                tracing::error!("Solr connection error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "solr_unreachable",
                    "The search service is unavailable".to_string(),
                )
            }

            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }

            AppError::Serialization(ref e) => {
                tracing::error!("Serialization error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "serialization_error",
                    "A serialization error occurred".to_string(),
                )
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }

            // 진단 모드: 원본 에러를 그대로 보여줍니다
            AppError::Debug(ref detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "debug",
                detail.clone(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maybe_debug_wraps_only_in_debug_mode() {
        let err = AppError::NotFound.maybe_debug(false);
        assert!(matches!(err, AppError::NotFound));

        let err = AppError::NotFound.maybe_debug(true);
        assert!(matches!(err, AppError::Debug(_)));
    }
}
