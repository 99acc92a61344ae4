use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Fill used when a chart has a single bar.
pub const SKY_BLUE: Color32 = Color32::from_rgb(135, 206, 235);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            // Start near sky blue so small charts keep the familiar look.
            let hue = 197.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.7, 0.7);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// One fill colour per bar, shared by the on-screen chart and the PNG export.
pub fn bar_colors(n: usize) -> Vec<Color32> {
    match n {
        0 => Vec::new(),
        1 => vec![SKY_BLUE],
        _ => generate_palette(n),
    }
}
