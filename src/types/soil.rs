//! Soil materials and one-dimensional soil profiles.
//!
//! A [`SoilProfile`] is the vertical layer stack observed in a single boring,
//! either at the crest or at the inner toe of the dike. Layers are kept sorted
//! by top level descending, and a profile can be validated for contiguity
//! before it is used to assemble a cross-section.

use thiserror::Error;

/// Mechanical parameters of a soil material.
///
/// Referenced from profile layers by `name`.
#[derive(Clone, Debug, PartialEq)]
pub struct Soil {
    /// Soil code, e.g. "Klei" or "Veen"
    pub name: String,
    /// Dry unit weight [kN/m³]
    pub yd: f64,
    /// Saturated unit weight [kN/m³]
    pub ys: f64,
    /// Cohesion [kPa]
    pub c: f64,
    /// Friction angle [degrees]
    pub phi: f64,
}

/// A single layer in a soil profile.
#[derive(Clone, Debug, PartialEq)]
pub struct SoilProfileLayer {
    /// Top level of the layer [m, vertical datum]
    pub top: f64,
    /// Bottom level of the layer [m, vertical datum]
    pub bottom: f64,
    /// Code of the soil material filling this layer
    pub soil_name: String,
}

/// Error type for soil profile validation.
#[derive(Debug, Error, PartialEq)]
pub enum SoilProfileError {
    /// A layer's bottom lies at or above its top
    #[error("profile '{id}': layer {index} has top {top} at or below bottom {bottom}")]
    InvertedLayer {
        /// Profile id
        id: String,
        /// Zero-based layer index, counted from the top of the stack
        index: usize,
        /// Layer top level
        top: f64,
        /// Layer bottom level
        bottom: f64,
    },

    /// Two consecutive layers overlap or leave a gap
    #[error(
        "profile '{id}': layer {index} bottom {bottom} does not meet the next layer top {next_top}"
    )]
    NotContiguous {
        /// Profile id
        id: String,
        /// Zero-based index of the upper layer of the offending pair
        index: usize,
        /// Bottom level of the upper layer
        bottom: f64,
        /// Top level of the lower layer
        next_top: f64,
    },

    /// Profile contains no layers at all
    #[error("profile '{id}' has no layers")]
    Empty {
        /// Profile id
        id: String,
    },
}

/// Vertical soil layer stack at one boring location.
#[derive(Clone, Debug, PartialEq)]
pub struct SoilProfile {
    /// Profile id, referenced from scenario combinations
    pub id: String,
    /// Layers sorted by top level descending
    pub layers: Vec<SoilProfileLayer>,
}

/// Tolerance for layer contiguity checks [m].
const CONTIGUITY_TOL: f64 = 1e-6;

impl SoilProfile {
    /// Create a profile and sort its layers by top level descending.
    pub fn new(id: impl Into<String>, mut layers: Vec<SoilProfileLayer>) -> Self {
        layers.sort_by(|a, b| b.top.total_cmp(&a.top));
        Self {
            id: id.into(),
            layers,
        }
    }

    /// Top level of the uppermost layer.
    pub fn top(&self) -> Option<f64> {
        self.layers.first().map(|l| l.top)
    }

    /// Bottom level of the lowermost layer.
    pub fn bottom(&self) -> Option<f64> {
        self.layers.last().map(|l| l.bottom)
    }

    /// Check that the stack is non-empty, every layer has positive thickness,
    /// and consecutive layers meet without overlap or gap.
    pub fn validate(&self) -> Result<(), SoilProfileError> {
        if self.layers.is_empty() {
            return Err(SoilProfileError::Empty {
                id: self.id.clone(),
            });
        }

        for (i, layer) in self.layers.iter().enumerate() {
            if layer.top <= layer.bottom {
                return Err(SoilProfileError::InvertedLayer {
                    id: self.id.clone(),
                    index: i,
                    top: layer.top,
                    bottom: layer.bottom,
                });
            }
        }

        for (i, pair) in self.layers.windows(2).enumerate() {
            if (pair[0].bottom - pair[1].top).abs() > CONTIGUITY_TOL {
                return Err(SoilProfileError::NotContiguous {
                    id: self.id.clone(),
                    index: i,
                    bottom: pair[0].bottom,
                    next_top: pair[1].top,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(top: f64, bottom: f64, soil: &str) -> SoilProfileLayer {
        SoilProfileLayer {
            top,
            bottom,
            soil_name: soil.to_string(),
        }
    }

    #[test]
    fn test_layers_sorted_descending() {
        let profile = SoilProfile::new(
            "P1",
            vec![
                layer(-2.0, -5.0, "Zand"),
                layer(2.0, -2.0, "Klei"),
            ],
        );
        assert_eq!(profile.layers[0].soil_name, "Klei");
        assert_eq!(profile.top(), Some(2.0));
        assert_eq!(profile.bottom(), Some(-5.0));
    }

    #[test]
    fn test_validate_contiguous_stack() {
        let profile = SoilProfile::new(
            "P1",
            vec![
                layer(2.0, -1.0, "Klei"),
                layer(-1.0, -4.0, "Veen"),
                layer(-4.0, -10.0, "Zand"),
            ],
        );
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_gap() {
        let profile = SoilProfile::new(
            "P1",
            vec![layer(2.0, -1.0, "Klei"), layer(-1.5, -4.0, "Veen")],
        );
        assert!(matches!(
            profile.validate(),
            Err(SoilProfileError::NotContiguous { index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_layer() {
        let profile = SoilProfile::new("P1", vec![layer(-1.0, 2.0, "Klei")]);
        assert!(matches!(
            profile.validate(),
            Err(SoilProfileError::InvertedLayer { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty() {
        let profile = SoilProfile::new("P1", vec![]);
        assert!(matches!(
            profile.validate(),
            Err(SoilProfileError::Empty { .. })
        ));
    }
}
