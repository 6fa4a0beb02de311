//! Core types and traits for the Informar campaign analytics dashboard.
//!
//! The crate is organized around one idea: analytics computation happens
//! server-side, and each analysis is addressed by a stable string id. The
//! client side of the system only has to do four things well:
//!
//! 1. Look the id up in a [`ModuleRegistry`] of [`AnalyticsModule`]s.
//! 2. Hand the opaque results payload to that module's render contract.
//! 3. Keep tables sortable and charts mounted without leaking instances.
//! 4. Avoid refetching what a short-lived [`ResponseCache`] already holds.
//!
//! Everything else (HTTP, polling, page orchestration) lives in
//! `informar-client`.

pub mod cache;
pub mod chart;
pub mod container;
pub mod error;
pub mod format;
pub mod module;
pub mod registry;
pub mod results;
pub mod severity;
pub mod storage;
pub mod table;

pub use cache::{Clock, ManualClock, ResponseCache, SystemClock, DEFAULT_TTL_MS};
pub use chart::{ChartMounts, ChartSpec, ChartType, Dataset};
pub use container::{escape_html, Container, HtmlBuilder};
pub use error::CoreError;
pub use module::{translate, translate_param, AnalyticsModule};
pub use registry::ModuleRegistry;
pub use results::{ResultAlert, ResultsPayload};
pub use severity::Severity;
pub use storage::{ScopedStorage, Storage};
pub use table::{
    sort_rows, toggle_sort, CellValue, ColumnKind, SortDirection, SortState, TableColumn, TableRow,
};
