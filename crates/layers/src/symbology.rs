//! Colors for the globe layers.

/// Neutral color for languages outside the fixed table.
pub const FALLBACK_COLOR: &str = "#999999";

const LANGUAGE_COLORS: [(&str, &str); 7] = [
    ("English", "#ff5722"),
    ("Spanish", "#2196f3"),
    ("French", "#4caf50"),
    ("German", "#9c27b0"),
    ("Japanese", "#ff9800"),
    ("Mandarin", "#f44336"),
    ("Russian", "#00bcd4"),
];

/// Layer color keyed by language name.
pub fn color_for(language: Option<&str>) -> &'static str {
    let Some(language) = language else {
        return FALLBACK_COLOR;
    };
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

// ColorBrewer YlOrRd, 9 classes.
const YL_OR_RD: [Rgb; 9] = [
    Rgb(0xff, 0xff, 0xcc),
    Rgb(0xff, 0xed, 0xa0),
    Rgb(0xfe, 0xd9, 0x76),
    Rgb(0xfe, 0xb2, 0x4c),
    Rgb(0xfd, 0x8d, 0x3c),
    Rgb(0xfc, 0x4e, 0x2a),
    Rgb(0xe3, 0x1a, 0x1c),
    Rgb(0xbd, 0x00, 0x26),
    Rgb(0x80, 0x00, 0x26),
];

/// Sequential yellow-orange-red scale; `t` is clamped to `[0, 1]`.
pub fn interpolate_yl_or_rd(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (YL_OR_RD.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(YL_OR_RD.len() - 2);
    let f = scaled - i as f64;
    let (a, b) = (YL_OR_RD[i], YL_OR_RD[i + 1]);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
    Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Density bin color: mean weight per point on a `[0, 100]` domain.
pub fn density_bin_color(sum_weight: f64, point_count: usize) -> String {
    if point_count == 0 {
        return interpolate_yl_or_rd(0.0).to_hex();
    }
    interpolate_yl_or_rd(sum_weight / point_count as f64 / 100.0).to_hex()
}

/// Transaction arc color: amount on a `[0, 1000]` domain.
pub fn transaction_color(value: f64) -> String {
    interpolate_yl_or_rd(value / 1000.0).to_hex()
}
