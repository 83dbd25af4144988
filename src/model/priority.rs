// File: ./src/model/priority.rs
// Maps the 5-step priority slider to and from its labels
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Lowest and highest slider positions.
pub const MIN_POSITION: f32 = 0.0;
pub const MAX_POSITION: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    MediumHigh,
    High,
    Critical,
}

impl Priority {
    /// Slider order, position 0 first.
    pub const ALL: [Priority; 5] = [
        Priority::Low,
        Priority::Medium,
        Priority::MediumHigh,
        Priority::High,
        Priority::Critical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::MediumHigh => "Medium-High",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }

    /// Snaps a slider position to the nearest step.
    /// Out-of-range input is clamped, NaN is treated as the lowest step.
    pub fn from_position(position: f32) -> Self {
        if position.is_nan() {
            return Priority::Low;
        }
        let step = position.clamp(MIN_POSITION, MAX_POSITION).round() as usize;
        Self::ALL[step.min(Self::ALL.len() - 1)]
    }

    pub fn position(self) -> f32 {
        self.step() as f32
    }

    pub fn step(self) -> usize {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::MediumHigh => 2,
            Priority::High => 3,
            Priority::Critical => 4,
        }
    }

    /// Lenient label lookup for untrusted text.
    ///
    /// Matching ignores surrounding whitespace, ASCII case and the separator
    /// between "Medium" and "High". Anything else falls back to `Low`, which
    /// is also the value a freshly reset draft holds.
    pub fn from_label_lossy(label: &str) -> Self {
        match label.parse() {
            Ok(p) => p,
            Err(_) => {
                warn!(label, "unknown priority label, falling back to Low");
                Priority::Low
            }
        }
    }

    /// Moves the slider by `delta` steps, saturating at both ends.
    pub fn shifted(self, delta: i32) -> Self {
        let step = (self.step() as i32 + delta).clamp(0, Self::ALL.len() as i32 - 1);
        Self::ALL[step as usize]
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority label {0:?}")]
pub struct UnknownPriority(pub String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "mediumhigh" => Ok(Priority::MediumHigh),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(UnknownPriority(s.to_string())),
        }
    }
}

// Stored as its label text.
impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
