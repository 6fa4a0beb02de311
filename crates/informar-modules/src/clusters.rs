//! Campaign clusters.
//!
//! Groups campaigns by behavioral similarity so whole cohorts can be
//! paused, scaled, or rebid together instead of one by one.

use informar_core::container::escape_html;
use informar_core::format::{format_currency, format_percent};
use informar_core::{AnalyticsModule, Container, ResultsPayload};
use serde::Deserialize;
use std::fmt::Write as _;

const ALGORITHM: &str = "Campaigns are embedded as feature vectors (ROI, \
spend velocity, conversion rate, traffic mix) and clustered server-side \
with k-means; k is chosen by silhouette score over a small range. Each \
cluster is labeled by its dominant trait, and clusters whose centroid ROI \
is negative are flagged.";

const METRICS: &str = "Per cluster: label, member count, centroid ROI, and \
combined spend, with the member campaigns and their individual ROI listed \
in the expandable detail rows.";

#[derive(Debug, Clone, Deserialize)]
pub struct ClusterMember {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roi: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cluster {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub avg_roi: Option<f64>,
    #[serde(default)]
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub campaigns: Vec<ClusterMember>,
}

#[derive(Debug, Default, Deserialize)]
struct ClusterData {
    #[serde(default)]
    clusters: Vec<Cluster>,
}

/// Module descriptor for campaign clustering.
pub struct CampaignClusters;

impl AnalyticsModule for CampaignClusters {
    fn id(&self) -> &str {
        "campaign_clusters"
    }

    fn label(&self) -> &str {
        "Campaign Clusters"
    }

    fn category(&self) -> &str {
        "structure"
    }

    fn translations(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("cluster_count", "Clusters"),
            ("flagged_clusters", "Negative-ROI clusters"),
        ]
    }

    fn param_translations(&self) -> &'static [(&'static str, &'static str)] {
        &[("k_range", "Cluster count range"), ("features", "Feature set")]
    }

    fn algorithm(&self) -> &str {
        ALGORITHM
    }

    fn metrics(&self) -> &str {
        METRICS
    }

    fn render_table(&self, results: &ResultsPayload, out: &mut Container) {
        let clusters = results
            .typed_data::<ClusterData>()
            .map(|d| d.clusters)
            .unwrap_or_default();
        if clusters.is_empty() {
            out.placeholder("No clusters for the current window");
            return;
        }

        // One <details> block per cluster; the expandable member list is
        // this module's expand/collapse detail row equivalent.
        let mut html = String::from("<div class=\"cluster-list\">");
        for cluster in &clusters {
            let label = if cluster.label.is_empty() {
                "Unlabeled cluster"
            } else {
                &cluster.label
            };
            let _ = write!(
                html,
                "<details class=\"cluster\"><summary>{} \u{2014} {} campaigns, \
                 avg ROI {}, spend {}</summary><ul>",
                escape_html(label),
                cluster.campaigns.len(),
                format_percent(cluster.avg_roi),
                format_currency(cluster.total_cost),
            );
            for member in &cluster.campaigns {
                let name = if member.name.is_empty() { "N/A" } else { &member.name };
                let _ = write!(
                    html,
                    "<li>{}: {}</li>",
                    escape_html(name),
                    format_percent(member.roi)
                );
            }
            html.push_str("</ul></details>");
        }
        html.push_str("</div>");
        out.replace(html);
    }
}
