use plotters::style::RGBColor;

/// Tier colours for the income-over-time areas (Low, Middle, High)
pub const AREA_TIERS: [RGBColor; 3] = [
    RGBColor(0xe7, 0x4c, 0x3c),
    RGBColor(0x34, 0x98, 0xdb),
    RGBColor(0x2e, 0xcc, 0x71),
];

/// Tier colours for the race comparison (Low, Middle, High)
pub const RACE_TIERS: [RGBColor; 3] = [
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
];

pub const INCOME_LINE: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
pub const COST_LINE: RGBColor = RGBColor(0xd6, 0x27, 0x28);
pub const ANNOTATION: RGBColor = RGBColor(0x66, 0x66, 0x66);

/// Opacity of filled areas and bars
pub const FILL_OPACITY: f64 = 0.8;

pub fn hex(color: RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}
