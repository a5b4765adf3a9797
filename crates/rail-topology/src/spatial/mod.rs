//! Geographic helpers.

pub mod distance;

pub use distance::{mean_point, segment_centroid, spherical_distance_km, EARTH_RADIUS_KM};
