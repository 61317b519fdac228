//! Theme management for syntax highlighting
//!
//! Themes define a color (and weight/slant) per token class, plus the
//! chrome colors the editor surfaces use: gutter, current-line band,
//! and the output view's stderr styling.

use crate::style::StyleTag;

/// Number of token classes
const TOKEN_COUNT: usize = 9;

/// Visual style for one token class (RGBA color packed 0xRRGGBBAA)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenStyle {
    pub color: u32,
    pub bold: bool,
    pub italic: bool,
}

impl TokenStyle {
    pub const fn plain(color: u32) -> Self {
        Self {
            color,
            bold: false,
            italic: false,
        }
    }

    pub const fn bold(color: u32) -> Self {
        Self {
            color,
            bold: true,
            italic: false,
        }
    }

    pub const fn italic(color: u32) -> Self {
        Self {
            color,
            bold: false,
            italic: true,
        }
    }
}

/// Colors for the editor chrome around the text
#[derive(Clone, Copy, Debug)]
pub struct Chrome {
    pub background: u32,
    pub foreground: u32,
    pub gutter_background: u32,
    pub gutter_foreground: u32,
    pub current_line: u32,
    pub stderr: u32,
    pub notice: u32,
}

/// A theme defining colors for each token class plus the chrome
#[derive(Clone, Debug)]
pub struct Theme {
    pub name: String,
    token_styles: [TokenStyle; TOKEN_COUNT],
    pub chrome: Chrome,
}

impl Theme {
    /// Style for a token class
    pub fn token(&self, tag: StyleTag) -> TokenStyle {
        self.token_styles[tag as usize]
    }

    /// Replace the style for a token class
    pub fn set_token(&mut self, tag: StyleTag, style: TokenStyle) {
        self.token_styles[tag as usize] = style;
    }
}

/// Extract 8-bit RGB components from a packed 0xRRGGBBAA color
pub fn rgb(color: u32) -> (u8, u8, u8) {
    (
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
    )
}

/// Built-in themes
pub struct Themes;

impl Themes {
    /// The dark theme the editor ships with
    pub fn dark() -> Theme {
        let mut token_styles = [TokenStyle::plain(0xF0F0F0FF); TOKEN_COUNT];
        let mut set = |tag: StyleTag, style: TokenStyle| token_styles[tag as usize] = style;

        set(StyleTag::Keyword, TokenStyle::bold(0x569CD6FF)); // blue
        set(StyleTag::Builtin, TokenStyle::plain(0x4EC9B0FF)); // teal
        set(StyleTag::SelfParam, TokenStyle::italic(0x9CDCFEFF)); // light blue
        set(StyleTag::String, TokenStyle::plain(0xCE9178FF)); // orange
        set(StyleTag::Comment, TokenStyle::italic(0x6A9955FF)); // green
        set(StyleTag::Number, TokenStyle::plain(0xB5CEA8FF)); // light green
        set(StyleTag::Call, TokenStyle::plain(0xDCDCAAFF)); // yellow
        set(StyleTag::ClassName, TokenStyle::plain(0xDCDCAAFF));
        set(StyleTag::FunctionName, TokenStyle::plain(0xDCDCAAFF));

        Theme {
            name: "Dark".to_string(),
            token_styles,
            chrome: Chrome {
                background: 0x2B2B2BFF,
                foreground: 0xF0F0F0FF,
                gutter_background: 0x313335FF,
                gutter_foreground: 0x858585FF,
                current_line: 0x3A3D42FF,
                stderr: 0xDA4453FF,
                notice: 0x888888FF,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_palette() {
        let theme = Themes::dark();
        assert!(theme.token(StyleTag::Keyword).bold);
        assert!(theme.token(StyleTag::Comment).italic);
        assert_eq!(theme.token(StyleTag::Number).color, 0xB5CEA8FF);
        // The three name rules share one color
        assert_eq!(
            theme.token(StyleTag::Call).color,
            theme.token(StyleTag::FunctionName).color
        );
    }

    #[test]
    fn test_rgb_unpack() {
        assert_eq!(rgb(0x569CD6FF), (0x56, 0x9C, 0xD6));
    }

    #[test]
    fn test_set_token() {
        let mut theme = Themes::dark();
        theme.set_token(StyleTag::Number, TokenStyle::plain(0x112233FF));
        assert_eq!(theme.token(StyleTag::Number).color, 0x112233FF);
    }
}
