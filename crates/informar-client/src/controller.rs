//! Page controllers.
//!
//! Each page owns its output [`Container`]s and a render method that fully
//! replaces them from current state. Event handlers (sort clicks, filter
//! edits, alert actions) mutate state and re-render everything; nothing
//! patches a container in place.

use crate::alerts::{Alert, AlertStore};
use crate::api::{Api, ApiError};
use crate::filter::{ModuleEntry, ModuleFilter, ModuleStatus};
use crate::poll::RunPoller;
use crate::prefs::PreferenceStore;
use informar_core::format::{format_count, format_currency, format_percent};
use informar_core::{
    escape_html, toggle_sort, translate, translate_param, AnalyticsModule, ChartMounts, Container,
    ModuleRegistry, ResponseCache, ResultsPayload, SortState,
};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Fetch a GET endpoint through the response cache.
///
/// A cache hit skips the network entirely; a miss fetches and stores the
/// body under the request path with the default TTL. Cache write failures
/// degrade to uncached operation rather than failing the fetch.
pub fn fetch_cached(
    api: &dyn Api,
    cache: &ResponseCache,
    path: &str,
) -> Result<Value, ApiError> {
    if let Some(hit) = cache.get(path) {
        return Ok(hit);
    }
    let body = api.get_json(path)?;
    if let Err(e) = cache.set_default(path, body.clone()) {
        warn!(path, error = %e, "response not cached");
    }
    Ok(body)
}

/// The landing page: account-level summary cards plus an alert preview.
pub struct DashboardPage {
    /// Summary-card region.
    pub summary: Container,
    /// Recent-alerts region.
    pub alerts_preview: Container,
    /// Unread count for the navigation badge.
    pub unread: usize,
}

impl DashboardPage {
    /// Create an empty page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            summary: Container::new(),
            alerts_preview: Container::new(),
            unread: 0,
        }
    }

    /// Load summary and alert data and render both regions.
    pub fn load(
        &mut self,
        api: &dyn Api,
        cache: &ResponseCache,
        alerts: &AlertStore,
    ) -> Result<(), ApiError> {
        let summary = fetch_cached(api, cache, "/api/dashboard/summary")?;
        self.render_summary(&summary);

        let alert_body = fetch_cached(api, cache, "/api/alerts")?;
        let parsed = parse_alerts(&alert_body);
        self.unread = alerts.unread_count(&parsed);
        self.render_alert_preview(alerts, &parsed);
        Ok(())
    }

    fn render_summary(&mut self, summary: &Value) {
        let campaigns = summary.get("active_campaigns").and_then(Value::as_u64);
        let spend = summary.get("total_cost").and_then(Value::as_f64);
        let revenue = summary.get("total_revenue").and_then(Value::as_f64);
        let roi = summary.get("roi").and_then(Value::as_f64);

        let mut html = String::from("<div class=\"summary-cards\">");
        for (label, value) in [
            ("Active campaigns", format_count(campaigns)),
            ("Spend", format_currency(spend)),
            ("Revenue", format_currency(revenue)),
            ("ROI", format_percent(roi)),
        ] {
            html.push_str(&format!(
                "<div class=\"card\"><span class=\"card-label\">{label}</span>\
                 <span class=\"card-value\">{}</span></div>",
                escape_html(&value)
            ));
        }
        html.push_str("</div>");
        self.summary.replace(html);
    }

    fn render_alert_preview(&mut self, store: &AlertStore, alerts: &[Alert]) {
        let visible = store.visible(alerts);
        if visible.is_empty() {
            self.alerts_preview.placeholder("No active alerts");
            return;
        }
        let mut html = String::from("<ul class=\"alert-preview\">");
        for alert in visible.iter().take(5) {
            html.push_str(&format!(
                "<li class=\"{}\">{}</li>",
                alert.severity.css_class(),
                escape_html(&alert.message)
            ));
        }
        html.push_str("</ul>");
        self.alerts_preview.replace(html);
    }
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self::new()
    }
}

/// A single module's result page: table, optional charts, optional stats,
/// plus a run-info region for the payload's metadata.
pub struct ModulePage {
    module_id: String,
    registry: Arc<ModuleRegistry>,
    results: ResultsPayload,
    sort: SortState,
    mounts: ChartMounts,
    /// Tabular region.
    pub table: Container,
    /// Chart region, empty for modules without charts.
    pub charts: Container,
    /// Summary-stats region, empty for modules without stats.
    pub stats: Container,
    /// Run-info region: start time, summary metrics, run parameters and
    /// severity-tagged run alerts. Empty when the payload carries none.
    pub meta: Container,
}

impl ModulePage {
    /// Create a page for one module id.
    #[must_use]
    pub fn new(module_id: impl Into<String>, registry: Arc<ModuleRegistry>) -> Self {
        Self {
            module_id: module_id.into(),
            registry,
            results: ResultsPayload::default(),
            sort: SortState::default(),
            mounts: ChartMounts::new(),
            table: Container::new(),
            charts: Container::new(),
            stats: Container::new(),
            meta: Container::new(),
        }
    }

    /// The module id this page shows.
    #[must_use]
    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    fn results_path(&self) -> String {
        format!("/api/modules/{}/results", self.module_id)
    }

    /// Fetch results (through the cache) and render all regions.
    pub fn load(&mut self, api: &dyn Api, cache: &ResponseCache) -> Result<(), ApiError> {
        let body = fetch_cached(api, cache, &self.results_path())?;
        self.results = ResultsPayload::from_value(body);
        self.render();
        Ok(())
    }

    /// Drop the cached copy and refetch, used after a run completes.
    pub fn reload(&mut self, api: &dyn Api, cache: &ResponseCache) -> Result<(), ApiError> {
        if let Err(e) = cache.remove(&self.results_path()) {
            warn!(module = %self.module_id, error = %e, "stale cache entry not removed");
        }
        self.load(api, cache)
    }

    /// Kick off a server-side run and hand back the poller that tracks it.
    pub fn start_run(&self, api: &dyn Api) -> Result<RunPoller, ApiError> {
        let path = format!("/api/modules/{}/run", self.module_id);
        api.post_json(&path, &Value::Null)?;
        info!(module = %self.module_id, "run started");
        Ok(RunPoller::new(self.module_id.clone()))
    }

    /// Sort-header click: toggle the state and re-render everything.
    pub fn sort_by(&mut self, column: &str) {
        toggle_sort(&mut self.sort, column);
        self.render();
    }

    /// Current sort state.
    #[must_use]
    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Front-end init configuration for the currently mounted charts,
    /// keyed by canvas id.
    #[must_use]
    pub fn chart_config(&self) -> Value {
        self.mounts.init_config()
    }

    fn render(&mut self) {
        let Some(module) = self.registry.get(&self.module_id) else {
            error!(module = %self.module_id, "module not registered");
            self.table
                .error(&format!("Unknown module: {}", self.module_id));
            self.charts.clear();
            self.stats.clear();
            self.meta.clear();
            for id in self.mounts.canvas_ids() {
                let _ = self.mounts.unmount(&id);
            }
            return;
        };
        module.render_table_sorted(&self.results, &mut self.table, &self.sort);
        self.render_charts_region(module.as_ref());
        if module.has_stats() {
            module.render_stats(&self.results, &mut self.stats);
        } else {
            self.stats.clear();
        }
        self.render_meta(module.as_ref());
    }

    /// Render the chart region and reconcile canvas mounts with the
    /// payload's chart specs. Mounting onto an occupied canvas destroys the
    /// previous instance first, so re-renders never stack charts; canvases
    /// the new payload no longer carries are unmounted.
    fn render_charts_region(&mut self, module: &dyn AnalyticsModule) {
        if module.has_charts() {
            module.render_charts(&self.results, &mut self.charts);
        } else if self.results.charts.is_empty() {
            self.charts.clear();
        } else {
            let mut html = String::from("<div class=\"charts\">");
            for spec in &self.results.charts {
                let _ = write!(html, "<canvas id=\"{}\"></canvas>", escape_html(&spec.canvas_id));
            }
            html.push_str("</div>");
            self.charts.replace(html);
        }

        let live: BTreeSet<&str> = self
            .results
            .charts
            .iter()
            .map(|s| s.canvas_id.as_str())
            .collect();
        for id in self.mounts.canvas_ids() {
            if !live.contains(id.as_str()) {
                let _ = self.mounts.unmount(&id);
            }
        }
        for spec in &self.results.charts {
            let _ = self.mounts.mount(spec.clone());
        }
        if !self.mounts.is_empty() {
            let mut html = self.charts.html().to_string();
            let _ = write!(
                html,
                "<script type=\"application/json\" class=\"chart-init\">{}</script>",
                self.mounts.init_config()
            );
            self.charts.replace(html);
        }
    }

    /// Render the run-info region: start time, top-level scalar result
    /// fields labeled through the module's translation table, run
    /// parameters labeled through the parameter table, and run alerts.
    fn render_meta(&mut self, module: &dyn AnalyticsModule) {
        let mut html = String::new();
        if let Some(started) = &self.results.started_at {
            let _ = write!(
                html,
                "<div class=\"run-started\">Run started: {}</div>",
                escape_html(started)
            );
        }
        if let Value::Object(map) = &self.results.data {
            let scalars: Vec<_> = map
                .iter()
                .filter(|(_, v)| v.is_number() || v.is_string())
                .collect();
            if !scalars.is_empty() {
                html.push_str("<dl class=\"summary-metrics\">");
                for (key, value) in scalars {
                    let _ = write!(
                        html,
                        "<dt>{}</dt><dd>{}</dd>",
                        escape_html(translate(module, key)),
                        escape_html(&display_value(value))
                    );
                }
                html.push_str("</dl>");
            }
        }
        if !self.results.params.is_empty() {
            html.push_str("<dl class=\"run-params\">");
            for (key, value) in &self.results.params {
                let _ = write!(
                    html,
                    "<dt>{}</dt><dd>{}</dd>",
                    escape_html(translate_param(module, key)),
                    escape_html(&display_value(value))
                );
            }
            html.push_str("</dl>");
        }
        for alert in &self.results.alerts {
            let _ = write!(
                html,
                "<div class=\"run-alert {}\">{}</div>",
                alert.severity.css_class(),
                escape_html(&alert.message)
            );
        }
        if html.is_empty() {
            self.meta.clear();
        } else {
            self.meta.replace(html);
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The full alert list with read / hide actions.
pub struct AlertsPage {
    store: AlertStore,
    alerts: Vec<Alert>,
    /// Rendered alert list.
    pub list: Container,
    /// Unread count for the navigation badge.
    pub unread: usize,
}

impl AlertsPage {
    /// Create a page over an alert store.
    #[must_use]
    pub fn new(store: AlertStore) -> Self {
        Self {
            store,
            alerts: Vec::new(),
            list: Container::new(),
            unread: 0,
        }
    }

    /// Fetch the alert list, prune stale client state, render.
    ///
    /// Alerts are always fetched fresh; a stale unread badge is worse than
    /// the extra request.
    pub fn load(&mut self, api: &dyn Api) -> Result<(), ApiError> {
        let body = api.get_json("/api/alerts")?;
        self.alerts = parse_alerts(&body);
        let live: BTreeSet<String> = self.alerts.iter().map(|a| a.id.clone()).collect();
        if let Err(e) = self.store.prune(&live) {
            warn!(error = %e, "alert state not pruned");
        }
        self.render();
        Ok(())
    }

    /// Mark one alert read and re-render.
    pub fn mark_read(&mut self, alert_id: &str) {
        if let Err(e) = self.store.mark_read(alert_id) {
            warn!(alert = alert_id, error = %e, "read marker not saved");
        }
        self.render();
    }

    /// Mark all visible alerts read and re-render.
    pub fn mark_all_read(&mut self) {
        let ids: Vec<String> = self.alerts.iter().map(|a| a.id.clone()).collect();
        if let Err(e) = self.store.mark_all_read(ids.iter().map(String::as_str)) {
            warn!(error = %e, "read markers not saved");
        }
        self.render();
    }

    /// Hide one alert and re-render.
    pub fn hide(&mut self, alert_id: &str) {
        if let Err(e) = self.store.hide(alert_id) {
            warn!(alert = alert_id, error = %e, "hide marker not saved");
        }
        self.render();
    }

    fn render(&mut self) {
        self.unread = self.store.unread_count(&self.alerts);
        let visible = self.store.visible(&self.alerts);
        if visible.is_empty() {
            self.list.placeholder("No alerts");
            return;
        }
        let mut html = String::from("<ul class=\"alerts\">");
        for alert in visible {
            let read_class = if self.store.is_read(&alert.id) {
                "read"
            } else {
                "unread"
            };
            html.push_str(&format!(
                "<li class=\"{} {read_class}\" data-alert-id=\"{}\">\
                 <span class=\"alert-module\">{}</span>\
                 <span class=\"alert-message\">{}</span>\
                 <time>{}</time></li>",
                alert.severity.css_class(),
                escape_html(&alert.id),
                escape_html(&alert.module_id),
                escape_html(&alert.message),
                escape_html(&alert.created_at)
            ));
        }
        html.push_str("</ul>");
        self.list.replace(html);
    }
}

/// The module catalog page with search / category / status filtering.
pub struct ModulesPage {
    registry: Arc<ModuleRegistry>,
    /// Active filter; mutate through the setters so the list re-renders.
    pub filter: ModuleFilter,
    entries: Vec<ModuleEntry>,
    /// Rendered catalog.
    pub list: Container,
}

impl ModulesPage {
    /// Create a page over the registry.
    #[must_use]
    pub fn new(registry: Arc<ModuleRegistry>) -> Self {
        Self {
            registry,
            filter: ModuleFilter::default(),
            entries: Vec::new(),
            list: Container::new(),
        }
    }

    /// Build catalog entries from the registry plus backend run statuses
    /// and render the list. Modules the status endpoint does not mention
    /// show as pending.
    pub fn load(
        &mut self,
        api: &dyn Api,
        cache: &ResponseCache,
        prefs: &PreferenceStore,
    ) -> Result<(), ApiError> {
        let statuses = fetch_cached(api, cache, "/api/modules/status")?;
        let favorites = prefs.favorites();
        self.entries = self
            .registry
            .all()
            .iter()
            .map(|module| ModuleEntry {
                id: module.id().to_string(),
                label: module.label().to_string(),
                category: module.category().to_string(),
                status: statuses
                    .get(module.id())
                    .and_then(Value::as_str)
                    .and_then(parse_status)
                    .unwrap_or(ModuleStatus::Pending),
                favorite: favorites.contains(module.id()),
            })
            .collect();
        self.render();
        Ok(())
    }

    /// Update the search text and re-render.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.render();
    }

    /// Update the category filter and re-render.
    pub fn set_category(&mut self, category: Option<String>) {
        self.filter.category = category;
        self.render();
    }

    /// Update the status filter and re-render.
    pub fn set_status(&mut self, status: Option<ModuleStatus>) {
        self.filter.status = status;
        self.render();
    }

    /// Categories present in the catalog, for the filter dropdown.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.entries.iter().map(|e| e.category.as_str()).collect();
        set.into_iter().map(String::from).collect()
    }

    fn render(&mut self) {
        let matched = self.filter.apply(&self.entries);
        if matched.is_empty() {
            self.list.placeholder("No modules match the filter");
            return;
        }
        let mut html = String::from("<ul class=\"module-list\">");
        for entry in matched {
            html.push_str(&format!(
                "<li data-module-id=\"{}\" class=\"status-{:?}\">\
                 <span class=\"module-label\">{}{}</span>\
                 <span class=\"module-category\">{}</span></li>",
                escape_html(&entry.id),
                entry.status,
                if entry.favorite { "★ " } else { "" },
                escape_html(&entry.label),
                escape_html(&entry.category)
            ));
        }
        html.push_str("</ul>");
        self.list.replace(html);
    }
}

fn parse_alerts(body: &Value) -> Vec<Alert> {
    let items = body
        .get("alerts")
        .and_then(Value::as_array)
        .cloned()
        .or_else(|| body.as_array().cloned())
        .unwrap_or_default();
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Alert>(item) {
            Ok(alert) => Some(alert),
            Err(e) => {
                warn!(error = %e, "malformed alert skipped");
                None
            }
        })
        .collect()
}

fn parse_status(status: &str) -> Option<ModuleStatus> {
    match status {
        "pending" => Some(ModuleStatus::Pending),
        "running" => Some(ModuleStatus::Running),
        "completed" => Some(ModuleStatus::Completed),
        "error" => Some(ModuleStatus::Error),
        _ => None,
    }
}
