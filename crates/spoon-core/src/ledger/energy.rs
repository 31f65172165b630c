use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of the remaining spoons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyLevel {
    Excellent,
    Good,
    Low,
    Critical,
}

impl EnergyLevel {
    /// Classify a spoon count. Lower bounds are inclusive and checked from
    /// the highest tier down.
    pub fn from_spoons(spoons: u32) -> Self {
        if spoons >= 10 {
            EnergyLevel::Excellent
        } else if spoons >= 6 {
            EnergyLevel::Good
        } else if spoons >= 3 {
            EnergyLevel::Low
        } else {
            EnergyLevel::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EnergyLevel::Excellent => "Excellent",
            EnergyLevel::Good => "Good",
            EnergyLevel::Low => "Low",
            EnergyLevel::Critical => "Critical",
        }
    }

    /// Display colour used by the web widget, kept for renderers that style output.
    pub fn color_hex(&self) -> &'static str {
        match self {
            EnergyLevel::Excellent => "#4ecdc4",
            EnergyLevel::Good => "#ffa726",
            EnergyLevel::Low => "#ff6b6b",
            EnergyLevel::Critical => "#d32f2f",
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
