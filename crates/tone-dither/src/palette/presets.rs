//! Built-in palettes.

use super::Palette;
use crate::color::Color;

/// Names accepted by [`Palette::preset`].
pub const PRESET_NAMES: &[&str] = &[
    "black-white",
    "grayscale-4",
    "grayscale-16",
    "gameboy",
    "cga",
    "pico-8",
];

const GAMEBOY: [Color; 4] = [
    Color::rgb(0x0f, 0x38, 0x0f),
    Color::rgb(0x30, 0x62, 0x30),
    Color::rgb(0x8b, 0xac, 0x0f),
    Color::rgb(0x9b, 0xbc, 0x0f),
];

const CGA: [Color; 4] = [
    Color::rgb(0x00, 0x00, 0x00),
    Color::rgb(0x55, 0xff, 0xff),
    Color::rgb(0xff, 0x55, 0xff),
    Color::rgb(0xff, 0xff, 0xff),
];

const PICO_8: [Color; 16] = [
    Color::rgb(0x00, 0x00, 0x00),
    Color::rgb(0x1d, 0x2b, 0x53),
    Color::rgb(0x7e, 0x25, 0x53),
    Color::rgb(0x00, 0x87, 0x51),
    Color::rgb(0xab, 0x52, 0x36),
    Color::rgb(0x5f, 0x57, 0x4f),
    Color::rgb(0xc2, 0xc3, 0xc7),
    Color::rgb(0xff, 0xf1, 0xe8),
    Color::rgb(0xff, 0x00, 0x4d),
    Color::rgb(0xff, 0xa3, 0x00),
    Color::rgb(0xff, 0xec, 0x27),
    Color::rgb(0x00, 0xe4, 0x36),
    Color::rgb(0x29, 0xad, 0xff),
    Color::rgb(0x83, 0x76, 0x9c),
    Color::rgb(0xff, 0x77, 0xa8),
    Color::rgb(0xff, 0xcc, 0xaa),
];

impl Palette {
    /// Look up a built-in palette by name (see [`PRESET_NAMES`]).
    pub fn preset(name: &str) -> Option<Palette> {
        let retro = |name: &str, colors: &[Color]| {
            Palette {
                name: name.to_string(),
                category: "retro".to_string(),
                colors: colors.to_vec(),
            }
        };
        match name {
            "black-white" => Some(Palette::black_white()),
            "grayscale-4" => Palette::grayscale(4).ok(),
            "grayscale-16" => Palette::grayscale(16).ok(),
            "gameboy" => Some(retro("gameboy", &GAMEBOY)),
            "cga" => Some(retro("cga", &CGA)),
            "pico-8" => Some(retro("pico-8", &PICO_8)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_resolves() {
        for name in PRESET_NAMES {
            let palette = Palette::preset(name).unwrap_or_else(|| panic!("missing {name}"));
            assert_eq!(palette.name(), *name);
            assert!(!palette.is_empty());
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert!(Palette::preset("vaporwave").is_none());
    }
}
