//! # Core Module
//!
//! 요청 처리 전반에서 공유되는 애플리케이션 컨텍스트를 제공합니다.
//!
//! 전역 싱글톤 대신 `main` 에서 [`AppContext`] 를 한 번 만들고
//! `web::Data` 로 핸들러와 미들웨어에 전달합니다.
//!
//! ```rust,ignore
//! let config = AppConfig::from_env()?;
//! let ctx = web::Data::new(AppContext::new(config)?);
//!
//! HttpServer::new(move || App::new().app_data(ctx.clone()).configure(configure_all_routes))
//! ```

pub mod context;

pub use context::*;
