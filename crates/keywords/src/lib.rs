//! Google Ads keyword metrics for the estimator.
//!
//! [`GoogleAdsProvider`] implements [`forecast::KeywordMetricsProvider`] over
//! the Google Ads REST API. It is only considered available when all six
//! `GOOGLE_ADS_*` variables are present (see [`REQUIRED_ENV`]); otherwise the
//! estimator never calls it and goes straight to the fallback table.
//!
//! ```no_run
//! use keywords::{GoogleAdsConfig, GoogleAdsProvider};
//! use forecast::KeywordMetricsProvider;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = GoogleAdsProvider::from_env(GoogleAdsConfig::default())?;
//! if provider.is_available() {
//!     let ideas = provider.keyword_ideas(&["shoes".to_string()]).await?;
//!     println!("{} ideas", ideas.len());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod credentials;
mod error;
mod serde_int64;

pub use crate::client::GoogleAdsProvider;
pub use crate::config::GoogleAdsConfig;
pub use crate::credentials::{
    has_google_ads_env, GoogleAdsCredentials, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_CUSTOMER_ID,
    ENV_DEVELOPER_TOKEN, ENV_LOGIN_CUSTOMER_ID, ENV_REFRESH_TOKEN, REQUIRED_ENV,
};
pub use crate::error::GoogleAdsError;
