//! Qualitative classification of distribution shape.
//!
//! Two threshold policies are supported and must be chosen explicitly:
//!
//! | Policy | Skewness | Excess kurtosis |
//! |--------|----------|-----------------|
//! | [`SymmetricBand`](ThresholdPolicy::SymmetricBand) | `|s| < 0.5` not skewed, `s > 0.5` right, otherwise left | `|k| < 0.5` meso, `k > 0.5` lepto, otherwise platy |
//! | [`Sign`](ThresholdPolicy::Sign) | `s > 0` right, `s < 0` left, `0` symmetrical | `k > 0` lepto, `k < 0` platy, `0` meso |
//!
//! `NaN` inputs (constant samples) classify as `Undefined` under both.
//!
//! ```
//! use u_eda::shape::{classify, KurtosisLabel, SkewLabel, ThresholdPolicy};
//!
//! let shape = classify(0.2, -1.3, ThresholdPolicy::SymmetricBand);
//! assert_eq!(shape.skew, SkewLabel::NotSkewed);
//! assert_eq!(shape.kurtosis, KurtosisLabel::Platykurtic);
//!
//! let shape = classify(0.2, -1.3, ThresholdPolicy::Sign);
//! assert_eq!(shape.skew, SkewLabel::RightSkewed);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Half-width of the "no clear shape" band for [`ThresholdPolicy::SymmetricBand`].
pub const SYMMETRIC_BAND: f64 = 0.5;

/// Rule that maps skewness / excess kurtosis to labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdPolicy {
    /// Values inside `(−0.5, 0.5)` count as neutral.
    SymmetricBand,
    /// Only the sign matters; exact zero is neutral.
    Sign,
}

impl fmt::Display for ThresholdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SymmetricBand => write!(f, "symmetric-band"),
            Self::Sign => write!(f, "sign"),
        }
    }
}

impl FromStr for ThresholdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symmetric-band" | "band" => Ok(Self::SymmetricBand),
            "sign" => Ok(Self::Sign),
            other => Err(format!(
                "unknown threshold policy '{other}' (expected 'symmetric-band' or 'sign')"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkewLabel {
    /// Symmetric-band neutral label.
    NotSkewed,
    /// Sign-policy neutral label (exact zero).
    Symmetrical,
    RightSkewed,
    LeftSkewed,
    Undefined,
}

impl fmt::Display for SkewLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotSkewed => "not skewed",
            Self::Symmetrical => "symmetrical",
            Self::RightSkewed => "right-skewed",
            Self::LeftSkewed => "left-skewed",
            Self::Undefined => "undefined",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KurtosisLabel {
    Mesokurtic,
    Leptokurtic,
    Platykurtic,
    Undefined,
}

impl fmt::Display for KurtosisLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mesokurtic => "mesokurtic",
            Self::Leptokurtic => "leptokurtic",
            Self::Platykurtic => "platykurtic",
            Self::Undefined => "undefined",
        })
    }
}

/// Skew and kurtosis labels for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShapeClassification {
    pub skew: SkewLabel,
    pub kurtosis: KurtosisLabel,
}

impl fmt::Display for ShapeClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} and {}", self.skew, self.kurtosis)
    }
}

/// Where a value falls relative to the neutral zone.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Low,
    Neutral,
    High,
    Undefined,
}

fn side(x: f64, policy: ThresholdPolicy) -> Side {
    if x.is_nan() {
        return Side::Undefined;
    }
    let band = match policy {
        ThresholdPolicy::SymmetricBand => SYMMETRIC_BAND,
        ThresholdPolicy::Sign => 0.0,
    };
    match policy {
        // Only values strictly above the band read as high; +band itself is low.
        ThresholdPolicy::SymmetricBand if x > band => Side::High,
        ThresholdPolicy::SymmetricBand if x.abs() >= band => Side::Low,
        ThresholdPolicy::Sign if x > band => Side::High,
        ThresholdPolicy::Sign if x < -band => Side::Low,
        _ => Side::Neutral,
    }
}

/// Labels a sample's shape from its skewness and excess kurtosis.
pub fn classify(
    skewness: f64,
    excess_kurtosis: f64,
    policy: ThresholdPolicy,
) -> ShapeClassification {
    let skew = match side(skewness, policy) {
        Side::High => SkewLabel::RightSkewed,
        Side::Low => SkewLabel::LeftSkewed,
        Side::Undefined => SkewLabel::Undefined,
        Side::Neutral => match policy {
            ThresholdPolicy::SymmetricBand => SkewLabel::NotSkewed,
            ThresholdPolicy::Sign => SkewLabel::Symmetrical,
        },
    };
    let kurtosis = match side(excess_kurtosis, policy) {
        Side::High => KurtosisLabel::Leptokurtic,
        Side::Low => KurtosisLabel::Platykurtic,
        Side::Neutral => KurtosisLabel::Mesokurtic,
        Side::Undefined => KurtosisLabel::Undefined,
    };
    ShapeClassification { skew, kurtosis }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ThresholdPolicy::{Sign, SymmetricBand};

    #[test]
    fn symmetric_band_labels() {
        assert_eq!(classify(0.0, 0.0, SymmetricBand).skew, SkewLabel::NotSkewed);
        assert_eq!(classify(0.49, 0.0, SymmetricBand).skew, SkewLabel::NotSkewed);
        assert_eq!(classify(-0.49, 0.0, SymmetricBand).skew, SkewLabel::NotSkewed);
        assert_eq!(classify(0.51, 0.0, SymmetricBand).skew, SkewLabel::RightSkewed);
        assert_eq!(classify(-0.51, 0.0, SymmetricBand).skew, SkewLabel::LeftSkewed);

        assert_eq!(classify(0.0, 0.3, SymmetricBand).kurtosis, KurtosisLabel::Mesokurtic);
        assert_eq!(classify(0.0, 2.0, SymmetricBand).kurtosis, KurtosisLabel::Leptokurtic);
        assert_eq!(classify(0.0, -1.3, SymmetricBand).kurtosis, KurtosisLabel::Platykurtic);
    }

    #[test]
    fn symmetric_band_edges_fall_to_low_side() {
        let shape = classify(0.5, 0.5, SymmetricBand);
        assert_eq!(shape.skew, SkewLabel::LeftSkewed);
        assert_eq!(shape.kurtosis, KurtosisLabel::Platykurtic);
        assert_eq!(shape.to_string(), "left-skewed and platykurtic");

        let shape = classify(-0.5, -0.5, SymmetricBand);
        assert_eq!(shape.skew, SkewLabel::LeftSkewed);
        assert_eq!(shape.kurtosis, KurtosisLabel::Platykurtic);

        let shape = classify(0.5000001, 0.5000001, SymmetricBand);
        assert_eq!(shape.skew, SkewLabel::RightSkewed);
        assert_eq!(shape.kurtosis, KurtosisLabel::Leptokurtic);
    }

    #[test]
    fn sign_labels() {
        let shape = classify(0.0, 0.0, Sign);
        assert_eq!(shape.skew, SkewLabel::Symmetrical);
        assert_eq!(shape.kurtosis, KurtosisLabel::Mesokurtic);

        let shape = classify(1e-9, -1e-9, Sign);
        assert_eq!(shape.skew, SkewLabel::RightSkewed);
        assert_eq!(shape.kurtosis, KurtosisLabel::Platykurtic);

        let shape = classify(-0.2, 0.2, Sign);
        assert_eq!(shape.skew, SkewLabel::LeftSkewed);
        assert_eq!(shape.kurtosis, KurtosisLabel::Leptokurtic);
    }

    #[test]
    fn policies_disagree_near_zero() {
        assert_ne!(classify(0.2, 0.2, SymmetricBand), classify(0.2, 0.2, Sign));
        assert_eq!(classify(1.5, 0.8, SymmetricBand), classify(1.5, 0.8, Sign));
    }

    #[test]
    fn nan_is_undefined() {
        for policy in [SymmetricBand, Sign] {
            let shape = classify(f64::NAN, f64::NAN, policy);
            assert_eq!(shape.skew, SkewLabel::Undefined);
            assert_eq!(shape.kurtosis, KurtosisLabel::Undefined);
        }
    }

    #[test]
    fn infinities_are_extreme() {
        let shape = classify(f64::INFINITY, f64::NEG_INFINITY, SymmetricBand);
        assert_eq!(shape.skew, SkewLabel::RightSkewed);
        assert_eq!(shape.kurtosis, KurtosisLabel::Platykurtic);
    }

    #[test]
    fn display_sentence_parts() {
        let shape = classify(1.5, 0.25, SymmetricBand);
        assert_eq!(shape.to_string(), "right-skewed and mesokurtic");
    }

    #[test]
    fn policy_parsing() {
        assert_eq!("sign".parse::<ThresholdPolicy>(), Ok(Sign));
        assert_eq!("symmetric-band".parse::<ThresholdPolicy>(), Ok(SymmetricBand));
        assert!("median".parse::<ThresholdPolicy>().is_err());
        assert_eq!(SymmetricBand.to_string(), "symmetric-band");
    }
}
