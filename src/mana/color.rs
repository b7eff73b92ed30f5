use serde::{Deserialize, Serialize};

/// A color of mana or of a card, in WUBRG order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    /// All colors in WUBRG order. Generic-cost tie-breaks iterate this.
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The single-letter mana symbol (`W`, `U`, `B`, `R`, `G`).
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Color> {
        match code {
            "W" => Some(Color::White),
            "U" => Some(Color::Blue),
            "B" => Some(Color::Black),
            "R" => Some(Color::Red),
            "G" => Some(Color::Green),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Blue => "blue",
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for color in Color::ALL {
            let code = color.code().to_string();
            assert_eq!(Color::from_code(&code), Some(color));
        }
        assert_eq!(Color::from_code("C"), None);
    }

    #[test]
    fn test_wubrg_order() {
        assert!(Color::White < Color::Blue);
        assert!(Color::Red < Color::Green);
        assert_eq!(Color::Green.index(), 4);
    }
}
