//! Base (non-accent) colors per theme.

use crate::models::options::Theme;
use crate::render::color::Color;

/// Everything a theme is allowed to change. Accent-derived colors live elsewhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    /// Entry titles (job title, institution).
    pub strong: Color,
    /// Candidate title line and degree.
    pub subtle: Color,
    /// Contact row and dates.
    pub muted: Color,
    /// Education details.
    pub faint: Color,
    /// Achievement bullets.
    pub list: Color,
    /// Rule under section headings.
    pub rule: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            background: Color::from_hex_u32(0xFFFFFF),
            text: Color::from_hex_u32(0x374151),
            strong: Color::from_hex_u32(0x1F2937),
            subtle: Color::from_hex_u32(0x4B5563),
            muted: Color::from_hex_u32(0x6B7280),
            faint: Color::from_hex_u32(0x6B7280),
            list: Color::from_hex_u32(0x4B5563),
            rule: Color::from_hex_u32(0xE5E7EB),
        },
        Theme::Dark => Palette {
            background: Color::from_hex_u32(0x1E293B),
            text: Color::from_hex_u32(0xCBD5E1),
            strong: Color::from_hex_u32(0xF1F5F9),
            subtle: Color::from_hex_u32(0x94A3B8),
            muted: Color::from_hex_u32(0x94A3B8),
            faint: Color::from_hex_u32(0x64748B),
            list: Color::from_hex_u32(0xCBD5E1),
            rule: Color::from_hex_u32(0x334155),
        },
    }
}
