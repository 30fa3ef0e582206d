//! Inline formatting codes
//!
//! Styled server text carries its colours inline: a section sign followed by
//! one code character (`§c` red, `§l` bold, `§r` reset, ...). Patterns are
//! written against this coded form; listings and headers are matched against
//! the stripped form.

use std::fmt;

/// Prefix character of every formatting code
pub const FORMAT_PREFIX: char = '§';

/// A single formatting code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatFormatting {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    Obfuscated,
    Bold,
    Strikethrough,
    Underline,
    Italic,
    Reset,
}

impl ChatFormatting {
    /// The code character following [`FORMAT_PREFIX`]
    pub const fn code(&self) -> char {
        match self {
            Self::Black => '0',
            Self::DarkBlue => '1',
            Self::DarkGreen => '2',
            Self::DarkAqua => '3',
            Self::DarkRed => '4',
            Self::DarkPurple => '5',
            Self::Gold => '6',
            Self::Gray => '7',
            Self::DarkGray => '8',
            Self::Blue => '9',
            Self::Green => 'a',
            Self::Aqua => 'b',
            Self::Red => 'c',
            Self::LightPurple => 'd',
            Self::Yellow => 'e',
            Self::White => 'f',
            Self::Obfuscated => 'k',
            Self::Bold => 'l',
            Self::Strikethrough => 'm',
            Self::Underline => 'n',
            Self::Italic => 'o',
            Self::Reset => 'r',
        }
    }

    /// Look up a code character (case-insensitive)
    pub fn from_code(code: char) -> Option<Self> {
        let formatting = match code.to_ascii_lowercase() {
            '0' => Self::Black,
            '1' => Self::DarkBlue,
            '2' => Self::DarkGreen,
            '3' => Self::DarkAqua,
            '4' => Self::DarkRed,
            '5' => Self::DarkPurple,
            '6' => Self::Gold,
            '7' => Self::Gray,
            '8' => Self::DarkGray,
            '9' => Self::Blue,
            'a' => Self::Green,
            'b' => Self::Aqua,
            'c' => Self::Red,
            'd' => Self::LightPurple,
            'e' => Self::Yellow,
            'f' => Self::White,
            'k' => Self::Obfuscated,
            'l' => Self::Bold,
            'm' => Self::Strikethrough,
            'n' => Self::Underline,
            'o' => Self::Italic,
            'r' => Self::Reset,
            _ => return None,
        };
        Some(formatting)
    }

    pub const fn is_color(&self) -> bool {
        !matches!(
            self,
            Self::Obfuscated
                | Self::Bold
                | Self::Strikethrough
                | Self::Underline
                | Self::Italic
                | Self::Reset
        )
    }
}

impl fmt::Display for ChatFormatting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", FORMAT_PREFIX, self.code())
    }
}

/// Remove every formatting code from `coded`
///
/// Each section sign is dropped together with the character after it,
/// whether or not that character is a known code.
pub fn strip_formatting(coded: &str) -> String {
    let mut out = String::with_capacity(coded.len());
    let mut chars = coded.chars();

    while let Some(c) = chars.next() {
        if c == FORMAT_PREFIX {
            chars.next();
            continue;
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_writes_code() {
        assert_eq!(ChatFormatting::LightPurple.to_string(), "§d");
        assert_eq!(format!("{}x{}", ChatFormatting::Bold, ChatFormatting::Reset), "§lx§r");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(ChatFormatting::from_code('c'), Some(ChatFormatting::Red));
        assert_eq!(ChatFormatting::from_code('C'), Some(ChatFormatting::Red));
        assert_eq!(ChatFormatting::from_code('z'), None);
        assert!(ChatFormatting::Gold.is_color());
        assert!(!ChatFormatting::Reset.is_color());
    }

    #[test]
    fn test_strip_formatting() {
        assert_eq!(
            strip_formatting("§eTry typing §r§6/friend add Username§r§e!"),
            "Try typing /friend add Username!"
        );
        assert_eq!(strip_formatting("plain"), "plain");
        assert_eq!(strip_formatting("§zunknown code§"), "unknown code");
        assert_eq!(strip_formatting("§§xy"), "xy");
    }
}
