//! Informar CLI - demo API server and module inspection.

#![allow(
    clippy::needless_pass_by_value,
    clippy::uninlined_format_args,
    clippy::unwrap_used,
    clippy::too_many_lines,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

use clap::{Parser, Subcommand};
use informar_client::{HttpApi, ModulePage};
use informar_core::cache::SystemClock;
use informar_core::{Container, ResponseCache, ResultsPayload, ScopedStorage, Storage};
use serde_json::{json, Value};
use std::sync::Arc;
use tiny_http::{Response, Server};

#[derive(Parser)]
#[command(name = "informar")]
#[command(about = "Campaign analytics dashboard CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a demo API backend with canned module results
    Serve {
        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// List registered analytics modules
    Modules {
        /// Print the algorithm description for each module
        #[arg(long)]
        verbose: bool,
    },

    /// Render one module's table against a running backend
    Render {
        /// Module id
        module: String,

        /// Backend base URL
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,

        /// Render from the built-in demo payload, no network
        #[arg(long)]
        demo: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => serve(port),
        Commands::Modules { verbose } => list_modules(verbose),
        Commands::Render { module, url, demo } => render(&module, &url, demo),
    }
}

fn serve(port: u16) {
    let registry = informar_modules::default_registry();

    println!("Starting Informar demo backend...");
    println!("  URL: http://localhost:{}", port);
    println!("  Modules: {}", registry.len());
    println!();
    println!("Press Ctrl+C to stop");

    let addr = format!("0.0.0.0:{}", port);
    let server = Server::http(&addr).expect("Failed to start server");

    for request in server.incoming_requests() {
        let url = request.url().to_string();
        let body = route(&url, &registry);

        let response = match body {
            Some(value) => Response::from_string(value.to_string()).with_header(
                tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                    .expect("header"),
            ),
            None => Response::from_string("404 Not Found").with_status_code(404),
        };
        let _ = request.respond(response);
    }
}

/// Route a demo request path to a canned JSON body.
fn route(path: &str, registry: &informar_core::ModuleRegistry) -> Option<Value> {
    if path == "/api/health" {
        return Some(json!({"healthy": true}));
    }
    if path == "/api/dashboard/summary" {
        return Some(json!({
            "active_campaigns": 14,
            "total_cost": 12_480.0,
            "total_revenue": 18_930.0,
            "roi": 51.7
        }));
    }
    if path == "/api/alerts" {
        return Some(demo_alerts());
    }
    if path == "/api/modules/status" {
        let mut statuses = serde_json::Map::new();
        for id in registry.ids() {
            statuses.insert(id, Value::String("completed".to_string()));
        }
        return Some(Value::Object(statuses));
    }
    if let Some(rest) = path.strip_prefix("/api/modules/") {
        if let Some(id) = rest.strip_suffix("/results") {
            if registry.get(id).is_some() {
                return Some(demo_results(id));
            }
        }
        if let Some(id) = rest.strip_suffix("/status") {
            if registry.get(id).is_some() {
                return Some(json!({"status": "completed"}));
            }
        }
        if let Some(id) = rest.strip_suffix("/run") {
            if registry.get(id).is_some() {
                return Some(json!({"status": "started"}));
            }
        }
    }
    None
}

fn demo_alerts() -> Value {
    json!({"alerts": [
        {
            "id": "demo-1",
            "module_id": "zombie_campaign_detector",
            "message": "Campaign 'Legacy Search' spent $312 with zero leads this week",
            "severity": "high",
            "created_at": "2026-08-29T08:15:00Z"
        },
        {
            "id": "demo-2",
            "module_id": "creative_fatigue",
            "message": "Creative 'Summer Promo v3' fatigue score crossed 70",
            "severity": "medium",
            "created_at": "2026-08-28T17:40:00Z"
        }
    ]})
}

/// Canned results for each registered module, shaped like real backend
/// payloads.
fn demo_results(module_id: &str) -> Value {
    let data = match module_id {
        "zombie_campaign_detector" => json!({"campaigns": [
            {"name": "Legacy Search", "roi": -82.0, "cost": 312.0, "revenue": 56.0,
             "clicks": 410, "leads": 0},
            {"name": "Brand Display", "roi": -12.4, "cost": 930.0, "revenue": 815.0,
             "clicks": 2210, "leads": 18}
        ]}),
        "offer_lifecycle_tracker" => json!({"offers": [
            {"name": "Summer Promo", "stage": "decline", "age_days": 120,
             "revenue": 10_320.0, "wow_change": -14.2,
             "revenue_series": [1400.0, 1250.0, 1080.0, 910.0],
             "started_at": "2026-05-02"},
            {"name": "Back to School", "stage": "growth", "age_days": 29,
             "revenue": 4_890.0, "wow_change": 22.8,
             "revenue_series": [600.0, 980.0, 1500.0, 1810.0],
             "started_at": "2026-08-01"}
        ]}),
        "consistency_scorer" => json!({"campaigns": [
            {"name": "Brand Display", "score": 74.0,
             "components": {"stability": 80.0, "volume": 70.0, "margin": 72.0}},
            {"name": "Legacy Search", "score": 31.0,
             "components": {"stability": 25.0, "volume": 40.0, "margin": 28.0}}
        ]}),
        "campaign_clusters" => json!({"clusters": [
            {"label": "High-volume, low-margin", "avg_roi": 8.2, "total_cost": 6_400.0,
             "campaigns": [{"name": "Brand Display", "roi": 11.0},
                           {"name": "Retargeting A", "roi": 5.4}]},
            {"label": "Niche winners", "avg_roi": 96.0, "total_cost": 1_200.0,
             "campaigns": [{"name": "Back to School", "roi": 96.0}]}
        ]}),
        "performance_matrix" => json!({"rows": ["US", "DE"], "cols": ["mobile", "desktop"],
            "cells": [
                {"row": "US", "col": "mobile", "roi": 41.0},
                {"row": "US", "col": "desktop", "roi": -8.0},
                {"row": "DE", "col": "mobile", "roi": 17.5}
            ]}),
        "roi_forecast" => json!({"series": [
            {"date": "2026-08-27", "actual": 42.0},
            {"date": "2026-08-28", "actual": 39.5},
            {"date": "2026-08-29", "predicted": 41.2, "lower": 33.0, "upper": 49.0},
            {"date": "2026-08-30", "predicted": 42.8, "lower": 31.5, "upper": 52.0}
        ]}),
        "anomaly_detector" => json!({"anomalies": [
            {"campaign": "Retargeting A", "metric": "cpc", "observed": 4.1,
             "expected": 1.2, "severity": "high",
             "detected_at": "2026-08-29 06:00:00"}
        ]}),
        "creative_fatigue" => json!({"creatives": [
            {"name": "Summer Promo v3", "impressions": 184_000, "ctr": 0.8,
             "fatigue_score": 78.0},
            {"name": "Summer Promo v4", "impressions": 12_000, "ctr": 2.1,
             "fatigue_score": 12.0}
        ]}),
        _ => json!({}),
    };
    json!({
        "data": data,
        "params": {},
        "started_at": "2026-08-30T07:00:00Z"
    })
}

fn list_modules(verbose: bool) {
    let registry = informar_modules::default_registry();
    for module in registry.all() {
        println!("{:<28} {:<24} [{}]", module.id(), module.label(), module.category());
        if verbose {
            println!("    {}", module.algorithm());
            println!("    Metrics: {}", module.metrics());
        }
    }
}

fn render(module_id: &str, url: &str, demo: bool) {
    let registry = Arc::new(informar_modules::default_registry());

    if demo {
        let Some(module) = registry.get(module_id) else {
            eprintln!("Unknown module: {}", module_id);
            std::process::exit(1);
        };
        let results = ResultsPayload::from_value(demo_results(module_id));
        let mut out = Container::new();
        module.render_table(&results, &mut out);
        println!("{}", out.html());
        return;
    }

    let api = match HttpApi::new(url) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };
    let cache = ResponseCache::new(
        ScopedStorage::new(Arc::new(Storage::new()), "cache"),
        Arc::new(SystemClock),
    );
    let mut page = ModulePage::new(module_id, registry);
    if let Err(e) = page.load(&api, &cache) {
        eprintln!("Fetch failed: {}", e);
        std::process::exit(1);
    }
    println!("{}", page.table.html());
    if !page.stats.is_empty() {
        println!("{}", page.stats.html());
    }
    if !page.charts.is_empty() {
        println!("{}", page.charts.html());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_health() {
        let registry = informar_modules::default_registry();
        assert_eq!(
            route("/api/health", &registry),
            Some(json!({"healthy": true}))
        );
    }

    #[test]
    fn test_route_unknown_path_is_404() {
        let registry = informar_modules::default_registry();
        assert_eq!(route("/api/nope", &registry), None);
        assert_eq!(route("/api/modules/nope/results", &registry), None);
    }

    #[test]
    fn test_route_status_covers_all_modules() {
        let registry = informar_modules::default_registry();
        let statuses = route("/api/modules/status", &registry).unwrap();
        let map = statuses.as_object().unwrap();
        assert_eq!(map.len(), registry.len());
    }

    #[test]
    fn test_every_module_renders_its_demo_payload() {
        let registry = informar_modules::default_registry();
        for module in registry.all() {
            let results = ResultsPayload::from_value(demo_results(module.id()));
            assert!(results.has_data(), "{} demo payload empty", module.id());
            let mut out = Container::new();
            module.render_table(&results, &mut out);
            assert!(
                !out.html().contains("no-data"),
                "{} rendered placeholder from demo data",
                module.id()
            );
        }
    }

    #[test]
    fn test_demo_alerts_parse() {
        let alerts = demo_alerts();
        assert_eq!(alerts["alerts"].as_array().unwrap().len(), 2);
    }
}
