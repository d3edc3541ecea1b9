use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::chart::{ChartElement, Role};

/// Gray used for the center-frequency marker and the 0 dB rule.
pub const MARKER_GRAY: Color32 = Color32::GRAY;

// ---------------------------------------------------------------------------
// Curve colours
// ---------------------------------------------------------------------------

/// `n` visually distinct colours with evenly spaced hues, starting at blue
/// so a lone theoretical curve gets a familiar default.
pub fn curve_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = 210.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue % 360.0, 0.70, 0.50);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Assign a colour to every element of a chart, in draw order. Curves take
/// successive palette entries; markers use fixed colours.
pub fn element_colors(elements: &[ChartElement]) -> Vec<Color32> {
    let curves = elements.iter().filter(|e| e.is_curve()).count();
    let mut palette = curve_palette(curves).into_iter();
    elements
        .iter()
        .map(|e| match e.role {
            Role::Theoretical | Role::Measured => palette.next().unwrap_or(Color32::LIGHT_BLUE),
            Role::BandwidthMarker => Color32::from_rgb(230, 140, 30),
            Role::CenterMarker | Role::ZeroDbRule => MARKER_GRAY,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::LineKind;

    #[test]
    fn test_palette_is_distinct() {
        let colors = curve_palette(4);
        assert_eq!(colors.len(), 4);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(curve_palette(0).is_empty());
    }

    #[test]
    fn test_markers_keep_fixed_colors() {
        let elements = vec![
            ChartElement::curve("t", Role::Theoretical, vec![]),
            ChartElement::vline("c", Role::CenterMarker, LineKind::Dotted, 1.0),
            ChartElement::curve("m", Role::Measured, vec![]),
        ];
        let colors = element_colors(&elements);
        let palette = curve_palette(2);
        assert_eq!(colors, vec![palette[0], MARKER_GRAY, palette[1]]);
    }
}
