//! Physical units for document sizes.
//!
//! SVG `width`/`height` attributes look like `"100mm"`, `"4in"` or plain
//! `"300"` (user units, 96 per inch). Artwork is scaled so its extent matches
//! that physical size before stitches are planned in millimetres (or cm/in).

use std::str::FromStr;

use svgtypes::{Length, LengthUnit};

use crate::error::UnitError;

const MM_PER_INCH: f64 = 25.4;

/// Unit that planned coordinates are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetUnit {
    #[default]
    Millimeters,
    Centimeters,
    Inches,
}

impl TargetUnit {
    pub fn name(&self) -> &'static str {
        match self {
            TargetUnit::Millimeters => "mm",
            TargetUnit::Centimeters => "cm",
            TargetUnit::Inches => "in",
        }
    }

    /// Parse strategy from string.
    pub fn from_name(name: &str) -> Option<TargetUnit> {
        match name.to_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Some(TargetUnit::Millimeters),
            "cm" | "centimeter" | "centimeters" => Some(TargetUnit::Centimeters),
            "in" | "inch" | "inches" => Some(TargetUnit::Inches),
            _ => None,
        }
    }

    /// Millimetres in one of this unit.
    pub fn mm_per_unit(&self) -> f64 {
        match self {
            TargetUnit::Millimeters => 1.0,
            TargetUnit::Centimeters => 10.0,
            TargetUnit::Inches => MM_PER_INCH,
        }
    }
}

impl FromStr for TargetUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetUnit::from_name(s).ok_or_else(|| UnitError::UnknownTarget(s.to_string()))
    }
}

/// Millimetres per SVG length unit, `None` for relative units.
fn mm_per_length_unit(unit: LengthUnit) -> Option<f64> {
    match unit {
        // 96 user units per inch
        LengthUnit::None | LengthUnit::Px => Some(MM_PER_INCH / 96.0),
        LengthUnit::Pt => Some(MM_PER_INCH / 72.0),
        LengthUnit::Pc => Some(MM_PER_INCH / 6.0),
        LengthUnit::Cm => Some(10.0),
        LengthUnit::Mm => Some(1.0),
        LengthUnit::In => Some(MM_PER_INCH),
        LengthUnit::Em | LengthUnit::Ex | LengthUnit::Percent => None,
    }
}

/// Parse a size string such as `"10mm"` and convert it to `target` units.
pub fn parse_size(size: &str, target: TargetUnit) -> Result<f64, UnitError> {
    let trimmed = size.trim();
    let length = Length::from_str(trimmed).map_err(|e| UnitError::Parse {
        input: size.to_string(),
        reason: e.to_string(),
    })?;

    let mm_per = mm_per_length_unit(length.unit)
        .ok_or_else(|| UnitError::UnsupportedUnit(size.to_string()))?;

    if !length.number.is_finite() || length.number <= 0.0 {
        return Err(UnitError::NonPositive(size.to_string()));
    }

    Ok(length.number * mm_per / target.mm_per_unit())
}
