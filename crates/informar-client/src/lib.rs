//! Client-side orchestration for the Informar dashboard.
//!
//! `informar-core` defines the rendering contract and the stores; this
//! crate drives them: a blocking HTTP [`Api`], cache-through fetching,
//! step-driven pollers for long-running server work, client-side alert and
//! preference state, and one controller per page.

pub mod alerts;
pub mod api;
pub mod controller;
pub mod filter;
pub mod poll;
pub mod prefs;

pub use alerts::{Alert, AlertStore};
pub use api::{Api, ApiError, HttpApi};
pub use controller::{fetch_cached, AlertsPage, DashboardPage, ModulePage, ModulesPage};
pub use filter::{ModuleEntry, ModuleFilter, ModuleStatus};
pub use poll::{
    drive_run, HealthMonitor, PollConfig, RunOutcome, RunPoller, RunState, TaskOutcome,
    TaskPoller, TaskProgress,
};
pub use prefs::{PreferenceStore, Theme};
