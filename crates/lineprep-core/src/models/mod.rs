//! Shared value types: line-art styles and enhancement plans.

use serde::{Deserialize, Serialize};

/// Line-art style the downstream generator will be asked for.
///
/// The style influences enhancement planning only: line-preserving styles
/// skip tonal corrections that could shift the strokes the model draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Contour drawing style; full tonal correction is allowed
    #[default]
    Contour,

    /// Anime line style. Tone is part of the look, so planning stops
    /// after geometric normalization (resize only).
    Anime,
}

impl Style {
    /// True when only geometric normalization is desired for this style.
    pub fn is_line_preserving(&self) -> bool {
        matches!(self, Style::Anime)
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Style::Contour => write!(f, "contour"),
            Style::Anime => write!(f, "anime"),
        }
    }
}

impl std::str::FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contour" => Ok(Style::Contour),
            "anime" => Ok(Style::Anime),
            other => Err(format!(
                "Invalid style '{}'. Choose 'contour' or 'anime'.",
                other
            )),
        }
    }
}

/// A single correction operation selected for an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EnhancementStep {
    /// Aspect-preserving resize into the configured dimension range
    Resize,

    /// Lookup-table gamma remap; gamma < 1 brightens, gamma > 1 darkens
    GammaCorrection { gamma: f32 },

    /// Local contrast equalization on the lightness channel
    Clahe,
}

impl EnhancementStep {
    /// Stable step name, used for CLI output and plan round-tripping.
    pub fn name(&self) -> &'static str {
        match self {
            EnhancementStep::Resize => "resize",
            EnhancementStep::GammaCorrection { .. } => "gamma_correction",
            EnhancementStep::Clahe => "clahe",
        }
    }
}

/// The set of correction operations selected for one image.
///
/// The plan is a set of requested operations, not a schedule: the applier
/// always executes resize, then gamma, then CLAHE, regardless of the
/// order steps were inserted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnhancementPlan {
    pub steps: Vec<EnhancementStep>,
}

impl EnhancementPlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the plan requests a resize.
    pub fn wants_resize(&self) -> bool {
        self.steps
            .iter()
            .any(|s| matches!(s, EnhancementStep::Resize))
    }

    /// The requested gamma value, if gamma correction is planned.
    pub fn gamma(&self) -> Option<f32> {
        self.steps.iter().find_map(|s| match s {
            EnhancementStep::GammaCorrection { gamma } => Some(*gamma),
            _ => None,
        })
    }

    /// Whether the plan requests local contrast equalization.
    pub fn wants_clahe(&self) -> bool {
        self.steps
            .iter()
            .any(|s| matches!(s, EnhancementStep::Clahe))
    }

    /// Step names in plan order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_default_is_contour() {
        assert_eq!(Style::default(), Style::Contour);
        assert!(!Style::Contour.is_line_preserving());
        assert!(Style::Anime.is_line_preserving());
    }

    #[test]
    fn test_style_parse_round_trip() {
        let style: Style = "anime".parse().unwrap();
        assert_eq!(style, Style::Anime);
        assert_eq!(style.to_string(), "anime");
        assert!("charcoal".parse::<Style>().is_err());
    }

    #[test]
    fn test_plan_accessors() {
        let plan = EnhancementPlan {
            steps: vec![
                EnhancementStep::Resize,
                EnhancementStep::GammaCorrection { gamma: 0.8 },
            ],
        };

        assert!(plan.wants_resize());
        assert!(!plan.wants_clahe());
        assert_eq!(plan.gamma(), Some(0.8));
        assert_eq!(plan.step_names(), vec!["resize", "gamma_correction"]);
    }

    #[test]
    fn test_plan_serde_round_trip() {
        let plan = EnhancementPlan {
            steps: vec![
                EnhancementStep::Resize,
                EnhancementStep::GammaCorrection { gamma: 1.25 },
                EnhancementStep::Clahe,
            ],
        };

        let json = serde_json::to_string(&plan).unwrap();
        let replayed: EnhancementPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(plan, replayed);
    }
}
