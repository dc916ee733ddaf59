use std::collections::{BTreeMap, BTreeSet};

use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Value;

/// An sRGB colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GRAY: Rgb = Rgb(160, 160, 160);

    /// `#rrggbb`, the form chart front-ends accept.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Rgb
// ---------------------------------------------------------------------------

/// Maps the distinct values of a chart's colour column to distinct colours.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<Value, Rgb>,
    default_color: Rgb,
}

impl ColorMap {
    /// Build a colour map for the given column from its unique values.
    pub fn new(column: &str, unique_values: &BTreeSet<Value>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping = unique_values.iter().cloned().zip(palette).collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: Rgb::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &Value) -> Rgb {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (value label → colour), sorted by value.
    pub fn legend_entries(&self) -> Vec<(String, Rgb)> {
        self.mapping
            .iter()
            .map(|(v, c)| (v.to_string(), *c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        let unique: std::collections::HashSet<_> = colors.iter().collect();
        assert_eq!(unique.len(), 5);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_color_map_lookup() {
        let values: BTreeSet<Value> = ["PhD", "Master's"].into_iter().map(Value::from).collect();
        let cm = ColorMap::new("Education_Level", &values);

        assert_eq!(cm.len(), 2);
        assert_ne!(cm.color_for(&Value::from("PhD")), cm.color_for(&Value::from("Master's")));
        assert_eq!(cm.color_for(&Value::from("Diploma")), Rgb::GRAY);

        let legend = cm.legend_entries();
        assert_eq!(legend[0].0, "Master's");
        assert!(legend[0].1.hex().starts_with('#'));
        assert_eq!(legend[0].1.hex().len(), 7);
    }
}
