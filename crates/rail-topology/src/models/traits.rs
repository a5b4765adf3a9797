//! Read-only access to per-railway station tables.
//!
//! The path service only needs positions and adjacency for each railway.
//! Implementations can be in-memory or backed by the reference database.

use crate::identifiers::RailwayCode;
use crate::models::types::RailwayLine;

/// Provider of railway lines, keyed by railway code
pub trait RailNetwork: Send + Sync {
    /// All railway codes, in a stable order
    fn railway_codes(&self) -> Vec<RailwayCode>;

    fn line(&self, code: &RailwayCode) -> Option<&RailwayLine>;

    /// All lines, in `railway_codes` order
    fn lines(&self) -> Vec<&RailwayLine> {
        self.railway_codes()
            .iter()
            .filter_map(|code| self.line(code))
            .collect()
    }
}
