//! Export surfaces for computed estimates.
//!
//! - [`render_csv`] produces the two-section CSV download.
//! - [`ExportSink`] is the append-only destination seam; [`GoogleSheetsSink`]
//!   appends one row per export to a spreadsheet as a service account.
//! - [`decode_payload_str`] / [`decode_payload_value`] turn request bodies
//!   back into an [`forecast::EstimateResult`].
//!
//! ```
//! use export::{render_csv, ExportRow};
//! use forecast::EstimateResult;
//!
//! let result = EstimateResult {
//!     total_spend: 3000.0,
//!     total_revenue: 12000.0,
//!     roi_pct: 300.0,
//!     estimated_cpc: 2.0,
//!     estimated_cpm: 4.0,
//!     monthly_breakdown: Vec::new(),
//!     used_api: false,
//!     notes: None,
//! };
//! assert!(render_csv(&result).starts_with("Metric,Value\n"));
//! assert_eq!(ExportRow::from_result(&result, chrono::Utc::now()).to_values().len(), 6);
//! ```

mod csv;
mod error;
mod payload;
mod sheets;
mod sink;

pub use crate::csv::{render_csv, CSV_CONTENT_TYPE, CSV_FILE_NAME};
pub use crate::error::ExportError;
pub use crate::payload::{decode_payload_str, decode_payload_value};
pub use crate::sheets::{
    GoogleSheetsSink, SheetsConfig, ENV_SERVICE_ACCOUNT_EMAIL, ENV_SERVICE_ACCOUNT_PRIVATE_KEY,
    ENV_SHEETS_ID,
};
pub use crate::sink::{ExportRow, ExportSink};
