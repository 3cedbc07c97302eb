// crates/scrubdeck-core/src/helpers/geometry.rs
//
// Aspect-ratio utilities for the save pipeline's export dimensions (§4.I).
// Previously lived as private free functions in a UI export module; moved
// here so the headless save pipeline can resolve dimensions without
// importing UI internals.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    SixteenNine,
    NineSixteen,
    TwoThree,
    ThreeTwo,
    FourThree,
    OneOne,
    FourFive,
    TwentyOneNine,
    Anamorphic,
}

/// Numeric width-to-height ratio for the given `AspectRatio` variant.
///
/// ```
/// use scrubdeck_core::helpers::geometry::{aspect_ratio_value, AspectRatio};
/// let r = aspect_ratio_value(AspectRatio::SixteenNine);
/// assert!((r - 16.0 / 9.0).abs() < 1e-6);
/// ```
pub fn aspect_ratio_value(ar: AspectRatio) -> f32 {
    match ar {
        AspectRatio::SixteenNine   => 16.0 / 9.0,
        AspectRatio::NineSixteen   => 9.0  / 16.0,
        AspectRatio::TwoThree      => 2.0  / 3.0,
        AspectRatio::ThreeTwo      => 3.0  / 2.0,
        AspectRatio::FourThree     => 4.0  / 3.0,
        AspectRatio::OneOne        => 1.0,
        AspectRatio::FourFive      => 4.0  / 5.0,
        AspectRatio::TwentyOneNine => 21.0 / 9.0,
        AspectRatio::Anamorphic    => 2.39,
    }
}

/// Short human-readable label, shown in the export panel's picker.
pub fn aspect_ratio_label(ar: AspectRatio) -> &'static str {
    match ar {
        AspectRatio::SixteenNine   => "16:9  — Landscape / YouTube",
        AspectRatio::NineSixteen   => "9:16  — Portrait / Reels / Shorts",
        AspectRatio::FourThree     => "4:3   — Classic TV",
        AspectRatio::ThreeTwo      => "3:2   — Landscape photo",
        AspectRatio::TwoThree      => "2:3   — Portrait photo",
        AspectRatio::OneOne        => "1:1   — Square",
        AspectRatio::FourFive      => "4:5   — Instagram portrait",
        AspectRatio::TwentyOneNine => "21:9  — Ultrawide / Cinema",
        AspectRatio::Anamorphic    => "2.39  — Anamorphic widescreen",
    }
}

/// Resolve concrete even-numbered pixel dimensions for an export at a given
/// base height — most encoders require even width/height for 4:2:0 chroma.
pub fn resolve_dimensions(ar: AspectRatio, base_height: u32) -> (u32, u32) {
    let ratio = aspect_ratio_value(ar) as f64;
    let width = ((base_height as f64 * ratio).round() as u32 + 1) / 2 * 2;
    let height = (base_height + 1) / 2 * 2;
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_dimensions_is_even() {
        let (w, h) = resolve_dimensions(AspectRatio::NineSixteen, 1919);
        assert_eq!(w % 2, 0);
        assert_eq!(h % 2, 0);
    }
}
