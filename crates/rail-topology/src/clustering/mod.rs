//! Grouping of raw station features into physical stations.
//!
//! The national GIS data has one feature per (station, railway) pair, and
//! sometimes several per pair where a platform is split into segments.
//! Features sharing a name and lying within a threshold distance of a
//! group's founding feature are merged into that group.
//!
//! Grouping is greedy and depends on input order: each feature joins the
//! first matching group recorded for its name, not the nearest one.

use std::collections::HashMap;
use std::sync::Arc;

use geo::Point;

use crate::models::types::StationFeature;
use crate::spatial::{mean_point, spherical_distance_km};

/// Names that are never merged, even when features are close together.
///
/// 堀田 exists twice in Nagoya (Meitetsu and the municipal subway) a few
/// hundred metres apart, and they are different stations.
pub const DEFAULT_EXCLUDED_NAMES: &[&str] = &["堀田"];

/// Tunables for [`StationClusterer`]
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterConfig {
    pub threshold_km: f64,
    pub excluded_names: Vec<Arc<str>>,
}

impl ClusterConfig {
    /// Threshold used when clustering the full station dataset
    pub const PRIMARY_THRESHOLD_KM: f64 = 0.45;
    /// Threshold used when clustering stations decoded from GeoJSON alone
    pub const GEOJSON_THRESHOLD_KM: f64 = 0.37;

    pub fn primary() -> Self {
        Self::with_default_exclusions(Self::PRIMARY_THRESHOLD_KM)
    }

    pub fn geojson() -> Self {
        Self::with_default_exclusions(Self::GEOJSON_THRESHOLD_KM)
    }

    fn with_default_exclusions(threshold_km: f64) -> Self {
        Self {
            threshold_km,
            excluded_names: DEFAULT_EXCLUDED_NAMES.iter().map(|&n| n.into()).collect(),
        }
    }

    pub fn with_threshold_km(mut self, threshold_km: f64) -> Self {
        self.threshold_km = threshold_km;
        self
    }

    pub fn with_excluded_name(mut self, name: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        if !self.excluded_names.contains(&name) {
            self.excluded_names.push(name);
        }
        self
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_names.iter().any(|n| n.as_ref() == name)
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self::primary()
    }
}

/// A set of station features judged to be the same physical station
#[derive(Clone, Debug, PartialEq)]
pub struct StationGroup {
    /// Index of the first member in input order
    pub code: usize,
    pub name: Arc<str>,
    /// Member indices in input order
    pub members: Vec<usize>,
    pub centroid: Point,
}

/// Result of clustering: one group code per input feature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clustering {
    codes: Vec<usize>,
}

impl Clustering {
    pub fn group_code(&self, feature: usize) -> Option<usize> {
        self.codes.get(feature).copied()
    }

    pub fn group_codes(&self) -> &[usize] {
        &self.codes
    }

    pub fn group_count(&self) -> usize {
        self.codes
            .iter()
            .enumerate()
            .filter(|&(i, &code)| i == code)
            .count()
    }

    /// Materialise groups, ordered by group code.
    ///
    /// `features` must be the slice that was clustered.
    pub fn groups(&self, features: &[StationFeature]) -> Vec<StationGroup> {
        let mut by_code: Vec<Option<StationGroup>> = vec![None; self.codes.len()];

        for (i, (&code, feature)) in self.codes.iter().zip(features).enumerate() {
            by_code[code]
                .get_or_insert_with(|| StationGroup {
                    code,
                    name: feature.name.clone(),
                    members: Vec::new(),
                    centroid: feature.location,
                })
                .members
                .push(i);
        }

        by_code
            .into_iter()
            .flatten()
            .map(|mut group| {
                let points: Vec<Point> = group.members.iter().map(|&m| features[m].location).collect();
                if let Some(centroid) = mean_point(&points) {
                    group.centroid = centroid;
                }
                group
            })
            .collect()
    }
}

/// Accumulator threaded through the clustering fold
struct ClusterState {
    /// Founder indices per station name; a founder's index is its group code
    founders: HashMap<Arc<str>, Vec<usize>>,
    codes: Vec<usize>,
}

impl ClusterState {
    fn absorb(
        mut self,
        index: usize,
        feature: &StationFeature,
        features: &[StationFeature],
        config: &ClusterConfig,
    ) -> Self {
        let matched = if config.is_excluded(&feature.name) {
            None
        } else {
            self.founders.get(&feature.name).and_then(|founders| {
                founders.iter().copied().find(|&founder| {
                    spherical_distance_km(features[founder].location, feature.location)
                        <= config.threshold_km
                })
            })
        };

        let code = match matched {
            Some(code) => code,
            None => {
                self.founders
                    .entry(feature.name.clone())
                    .or_default()
                    .push(index);
                index
            }
        };

        self.codes.push(code);
        self
    }
}

/// Greedy, single-pass station clusterer
#[derive(Clone, Debug, Default)]
pub struct StationClusterer {
    config: ClusterConfig,
}

impl StationClusterer {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Assign a group code to every feature, scanning in input order
    pub fn cluster(&self, features: &[StationFeature]) -> Clustering {
        let state = features.iter().enumerate().fold(
            ClusterState {
                founders: HashMap::new(),
                codes: Vec::with_capacity(features.len()),
            },
            |state, (index, feature)| state.absorb(index, feature, features, &self.config),
        );

        let clustering = Clustering { codes: state.codes };
        log::debug!(
            "Clustered {} station features into {} groups (threshold {} km)",
            features.len(),
            clustering.group_count(),
            self.config.threshold_km
        );
        clustering
    }
}
