//! Configuration options for a picking session.

use serde::{Deserialize, Serialize};

use crate::error::{PickError, Result};
use crate::pick::BACKGROUND_COLOR;

/// Default screen-space tolerance, in pixels, for vertex and edge picks.
pub const DEFAULT_HIT_RESOLUTION: f32 = 15.0;

/// Squared length below which an edge counts as degenerate.
pub const DEFAULT_DEGENERATE_EDGE_EPSILON: f32 = 1e-10;

/// Options for a picking session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickOptions {
    /// Screen-space tolerance in pixels for accepting a vertex or edge.
    pub hit_resolution: f32,

    /// Whether to try the GPU color-id strategy first.
    pub use_gpu: bool,

    /// Edges whose endpoints are closer than this (squared) are skipped.
    pub degenerate_edge_epsilon: f32,

    /// Clear color of the offscreen pick target.
    pub background: [u8; 4],
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            hit_resolution: DEFAULT_HIT_RESOLUTION,
            use_gpu: true,
            degenerate_edge_epsilon: DEFAULT_DEGENERATE_EDGE_EPSILON,
            background: BACKGROUND_COLOR,
        }
    }
}

impl PickOptions {
    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Serializes the options to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the options are usable.
    pub fn validate(&self) -> Result<()> {
        if !self.hit_resolution.is_finite() || self.hit_resolution < 0.0 {
            return Err(PickError::InvalidOptions(format!(
                "hit_resolution must be a non-negative number, got {}",
                self.hit_resolution
            )));
        }
        if !self.degenerate_edge_epsilon.is_finite() || self.degenerate_edge_epsilon < 0.0 {
            return Err(PickError::InvalidOptions(format!(
                "degenerate_edge_epsilon must be a non-negative number, got {}",
                self.degenerate_edge_epsilon
            )));
        }
        // The background has to decode to "no triangle".
        if crate::pick::decode_triangle_id(self.background).is_some() {
            return Err(PickError::InvalidOptions(format!(
                "background {:?} decodes to a valid triangle index",
                self.background
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PickOptions::default();
        assert_eq!(options.hit_resolution, 15.0);
        assert!(options.use_gpu);
        assert_eq!(options.background, BACKGROUND_COLOR);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let options = PickOptions::from_json(r#"{ "hit_resolution": 4.5, "use_gpu": false }"#)
            .expect("valid options");
        assert_eq!(options.hit_resolution, 4.5);
        assert!(!options.use_gpu);
        assert_eq!(options.degenerate_edge_epsilon, DEFAULT_DEGENERATE_EDGE_EPSILON);
    }

    #[test]
    fn test_json_roundtrip() {
        let options = PickOptions {
            hit_resolution: 7.0,
            ..PickOptions::default()
        };
        let json = options.to_json().expect("serialize");
        assert_eq!(PickOptions::from_json(&json).expect("parse"), options);
    }

    #[test]
    fn test_rejects_negative_resolution() {
        let err = PickOptions::from_json(r#"{ "hit_resolution": -1.0 }"#).unwrap_err();
        assert!(matches!(err, PickError::InvalidOptions(_)));
    }

    #[test]
    fn test_rejects_background_that_decodes_to_a_triangle() {
        let err = PickOptions::from_json(r#"{ "background": [0, 0, 0, 0] }"#).unwrap_err();
        assert!(matches!(err, PickError::InvalidOptions(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            PickOptions::from_json("{ not json"),
            Err(PickError::JsonError(_))
        ));
    }
}
