//! Analytics module implementations for the Informar dashboard.
//!
//! Each module lives in its own file and implements the
//! [`AnalyticsModule`](informar_core::AnalyticsModule) contract over its own
//! result shape. Registration is driven by the static list in
//! [`register_all`], assembled at application start; there is no
//! load-order-dependent self-registration.

pub mod anomalies;
pub mod clusters;
pub mod consistency;
pub mod creative_fatigue;
pub mod forecast;
pub mod matrix;
pub mod offer_lifecycle;
pub mod zombie;

use informar_core::ModuleRegistry;
use std::sync::Arc;

/// Register every built-in analytics module.
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(Arc::new(zombie::ZombieCampaignDetector));
    registry.register(Arc::new(offer_lifecycle::OfferLifecycleTracker));
    registry.register(Arc::new(consistency::ConsistencyScorer));
    registry.register(Arc::new(clusters::CampaignClusters));
    registry.register(Arc::new(matrix::PerformanceMatrix));
    registry.register(Arc::new(forecast::RoiForecast));
    registry.register(Arc::new(anomalies::AnomalyDetector));
    registry.register(Arc::new(creative_fatigue::CreativeFatigue));
}

/// A registry pre-loaded with every built-in module.
#[must_use]
pub fn default_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry);
    registry
}
