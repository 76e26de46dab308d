use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
///
/// The first hue is red, so three series come out red, green and blue.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Series colours: series name → colour, in drawing order
// ---------------------------------------------------------------------------

/// Assigns one palette colour per series, following the order given.
///
/// The position in that order is also the z-order: entry 0 is drawn first.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    entries: Vec<(String, RGBColor)>,
}

impl SeriesColors {
    pub fn new<S: AsRef<str>>(ordered_names: &[S]) -> Self {
        let palette = generate_palette(ordered_names.len());
        let entries = ordered_names
            .iter()
            .zip(palette)
            .map(|(name, c)| (name.as_ref().to_string(), c))
            .collect();

        SeriesColors { entries }
    }

    /// Legend entries (name, colour) in drawing order.
    pub fn legend_entries(&self) -> &[(String, RGBColor)] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_series_are_red_green_blue() {
        let p = generate_palette(3);
        assert_eq!(p.len(), 3);
        assert!(p[0].0 > p[0].1 && p[0].0 > p[0].2);
        assert!(p[1].1 > p[1].0 && p[1].1 > p[1].2);
        assert!(p[2].2 > p[2].0 && p[2].2 > p[2].1);
    }

    #[test]
    fn colours_follow_supplied_order() {
        let a = SeriesColors::new(&["loss", "mae"]);
        let b = SeriesColors::new(&["mae", "loss"]);
        assert_eq!(a.legend_entries()[0].0, "loss");
        assert_eq!(b.legend_entries()[0].0, "mae");
        // Colour follows position, not name.
        assert_eq!(a.legend_entries()[0].1, b.legend_entries()[0].1);
        assert_eq!(a.legend_entries()[1].1, b.legend_entries()[1].1);
    }
}
