use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    }
}

const BASE: [Rgb; 12] = [
    Rgb(0x00, 0x33, 0x66), // deep blue
    Rgb(0x3F, 0xA7, 0xD6), // medium blue
    Rgb(0x32, 0xDE, 0x84), // android green
    Rgb(0xF2, 0xE9, 0x4E), // lemon yellow
    Rgb(0xFF, 0x56, 0x66), // bright pink
    Rgb(0x90, 0xEE, 0x90), // light green
    Rgb(0xFF, 0x63, 0x47), // tomato
    Rgb(0xC7, 0x15, 0x85), // medium violet red
    Rgb(0xFF, 0xA0, 0x7A), // light salmon
    Rgb(0xBA, 0x55, 0xD3), // medium orchid
    Rgb(0x40, 0xE0, 0xD0), // turquoise
    Rgb(0xB0, 0xC4, 0xDE), // light steel blue
];

/// Spreads `count` colours evenly across the base palette, interpolating
/// between neighbours.
pub fn generate(count: usize) -> Vec<Rgb> {
    match count {
        0 => Vec::new(),
        1 => vec![BASE[0]],
        _ => (0..count)
            .map(|i| {
                let pos = (i * (BASE.len() - 1)) as f64 / (count - 1) as f64;
                let lower = pos.floor() as usize;
                let upper = (lower + 1).min(BASE.len() - 1);
                let weight = pos - lower as f64;
                lerp(BASE[lower], BASE[upper], weight)
            })
            .collect(),
    }
}

fn lerp(a: Rgb, b: Rgb, weight: f64) -> Rgb {
    let mix = |x: u8, y: u8| (x as f64 * (1.0 - weight) + y as f64 * weight) as u8;
    Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}
