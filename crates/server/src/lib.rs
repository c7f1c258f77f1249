//! adforecast server - HTTP API for campaign estimates
//!
//! Exposes the estimator and the export surfaces over axum:
//!
//! - **Estimates**: spend, revenue and ROI from live or fallback keyword metrics
//! - **Exports**: one-row Google Sheets append and a CSV download
//! - **Health & Metrics**: liveness/readiness probes and Prometheus metrics
//!
//! Configuration comes from `server.{toml,yaml,json}` and `ADFORECAST_SERVER__*`
//! variables; credentials for Google Ads and Sheets use their own
//! `GOOGLE_*` variables.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe with configured sources
//! - `GET /metrics` - Prometheus metrics
//! - `POST /api/estimate` - Campaign estimate
//! - `POST /api/export` - Append an estimate to the configured sheet
//! - `POST /api/export/csv` - Estimate as CSV download
//! - `GET /api/analytics` - UI event counters
//! - `GET /api/metadata` - Server metadata

pub mod analytics;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
