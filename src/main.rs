//! # Seoga 웹 서버 진입점
//!
//! 이 파일은 Seoga(서가) 검색 서버의 **시작점(entry point)**입니다.
//! Rust 프로그램은 항상 `main()` 함수에서 실행이 시작됩니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성 (검색 이력 저장용)
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 검색 설정 로딩과 Solr 클라이언트/검색 서비스 조립
//! 6. API 라우터 설정
//! 7. HTTP 서버 시작

// ── 모듈 선언 ──
// `mod` 키워드는 다른 파일을 모듈로 가져옵니다.
// 예: `mod config;`는 같은 디렉토리의 `config.rs` 또는 `config/mod.rs`를 가져옵니다.
// Rust에서는 파일 시스템 구조가 곧 모듈 구조입니다.
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod solr;

// ── 외부 크레이트 및 모듈에서 필요한 항목 가져오기 ──
use anyhow::Result; // anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use axum::{
    routing::get, // HTTP 메서드별 라우팅 함수
    Router,       // 라우터: URL 경로와 핸들러를 연결하는 구조체
};
use config::{Config, SearchConfig};
use routes::{search::AppState, *};
use services::{ExportRegistry, Searcher};
use solr::SolrClient;
use sqlx::sqlite::SqlitePoolOptions; // SQLite 연결 풀 설정 옵션
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer}, // CORS(Cross-Origin Resource Sharing) 설정
    trace::TraceLayer,      // HTTP 요청/응답 로깅 미들웨어
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티

// #[tokio::main]: 비동기 런타임을 시작하는 어트리뷰트 매크로.
// async/await를 사용하려면 비동기 런타임(Tokio)이 필요합니다.
#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일에서 환경변수를 읽어옵니다. (예: DATABASE_URL, SOLR_URL 등)
    // .ok()는 Result를 Option으로 변환하여, .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // registry(): 로그 수집기를 만들고
    // .with(): 필터와 포맷터를 레이어처럼 쌓아올립니다
    tracing_subscriber::registry()
        .with(
            // EnvFilter: RUST_LOG 환경변수로 로그 레벨을 제어합니다.
            // 환경변수가 없으면 기본값으로 seoga, tower_http, axum 모듈을 debug 레벨로 설정
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seoga=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer()) // 로그를 터미널에 출력하는 포맷터 레이어
        .init(); // 전역 로거로 등록

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting Seoga server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    // 검색 이력 저장에만 씁니다. 문서 본문은 전부 Solr에 있습니다.
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    // sqlx::migrate!는 컴파일 타임에 ./migrations 폴더의 SQL 파일들을 포함시키는 매크로
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 6단계: 검색 서비스 조립 ──
    // 검색 설정은 파일에서, 없으면 내장 기본값을 사용합니다.
    let search_config = SearchConfig::load(config.search_config_path.as_deref()).await?;
    let client = SolrClient::new(&config.solr_url);
    tracing::info!("Using Solr at {}", client.base_url());

    let searcher = Arc::new(Searcher::new(search_config, client));
    let exports = Arc::new(ExportRegistry::with_defaults());

    // ── 7단계: 애플리케이션 상태(State) 생성 ──
    // Axum에서는 State를 통해 핸들러에 의존성을 주입합니다.
    // SqlitePool과 Arc는 clone해도 같은 대상을 가리킵니다.
    let state = AppState {
        pool: pool.clone(),
        searcher,
        exports,
        debug: config.debug,
    };

    // ── 8단계: API 라우터 설정 ──
    // {id}는 URL 경로 파라미터 (Path<String>으로 핸들러에서 추출)
    let api_routes = Router::new()
        // 검색 API
        .route("/search", get(search))
        // 문서 조회/내보내기 API
        .route("/documents/{id}", get(show_document))
        .route("/documents/{id}/export/{format}", get(export_document))
        .route("/export/{format}", get(export_documents))
        // 패싯 값 목록 API
        .route("/facets/{field}", get(facet_list))
        // 세션 검색 이력 API
        .route("/history", get(search_history))
        // 검색어 자동완성 API
        .route("/opensearch", get(opensearch))
        // 헬스체크 API (서버 상태 확인용)
        .route("/health", get(health_check))
        // .with_state(): 이 라우터의 모든 핸들러에서 AppState를 사용할 수 있게 합니다.
        .with_state(state);

    // ── 9단계: CORS 미들웨어 설정 ──
    // 개발 환경에서는 Any(모두 허용)로 설정합니다.
    // 프로덕션에서는 특정 도메인만 허용해야 합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // .nest(): API 라우트를 /api/v1 경로 아래에 중첩시킵니다.
        // 예: /search → /api/v1/search
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http()); // HTTP 요청/응답 자동 로깅

    // ── 10단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
