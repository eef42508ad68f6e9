use serde::{Deserialize, Serialize};

use crate::error::MsdfError;

/// Which kind of field a bake produces.  Mirrors the flag stored next to the
/// bitmap in the asset container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Legacy one-channel true-distance field.
    SingleChannel,
    #[default]
    MultiChannel,
}

impl FieldKind {
    pub fn channels(self) -> usize {
        match self {
            Self::SingleChannel => 1,
            Self::MultiChannel => 3,
        }
    }
}

/// Configuración de la generación de campos de distancia.
///
/// Every field has a default, so a TOML table only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MsdfConfig {
    /// Distance, in output pixels, mapped to half of the `[0, 1]` value span.
    pub range: f64,
    /// Joint angle (radians) beyond which edge coloring treats a joint as a
    /// corner.
    pub angle_threshold: f64,
    pub coloring_seed: u64,
    pub error_correction_threshold: f64,
    pub kind: FieldKind,
    /// Clash correction pass for glyphs.
    pub error_correction: bool,
}

impl Default for MsdfConfig {
    fn default() -> Self {
        Self {
            range: 1.5,
            angle_threshold: 3.0,
            coloring_seed: 0,
            error_correction_threshold: 1.001,
            kind: FieldKind::MultiChannel,
            error_correction: true,
        }
    }
}

impl MsdfConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, MsdfError> {
        Ok(toml::from_str(source)?)
    }

    pub fn with_range(mut self, range: f64) -> Self {
        self.range = range;
        self
    }

    pub fn with_angle_threshold(mut self, radians: f64) -> Self {
        self.angle_threshold = radians;
        self
    }

    pub fn with_coloring_seed(mut self, seed: u64) -> Self {
        self.coloring_seed = seed;
        self
    }

    pub fn with_error_correction(mut self, enabled: bool, threshold: f64) -> Self {
        self.error_correction = enabled;
        self.error_correction_threshold = threshold;
        self
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }
}
