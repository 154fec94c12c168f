//! Theme registry.
//!
//! ## Learning: Closed Enums over String Dispatch
//!
//! Theme ids arrive as strings (preferences file, config, the picker), but
//! inside the program they are a closed `ThemeId` enum. Every variant has
//! exactly one entry in a static table, so resolving a theme is a pure
//! lookup that cannot fail: an unknown string turns into the default for the
//! ambient appearance before it ever reaches the table.

use pylearn_syntax::HighlightKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Color representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// `0xRRGGBB` to an opaque color.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// Ambient light/dark setting of the surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    #[default]
    Dark,
    Light,
}

impl Appearance {
    /// The theme used when a requested id is unknown.
    pub fn default_theme(self) -> ThemeId {
        match self {
            Appearance::Dark => ThemeId::OneDark,
            Appearance::Light => ThemeId::GithubLight,
        }
    }
}

/// The closed set of editor themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeId {
    OneDark,
    Dracula,
    MaterialDark,
    Sublime,
    GithubLight,
    XcodeLight,
    Nord,
}

impl ThemeId {
    /// All themes, in menu order.
    pub fn all() -> &'static [ThemeId] {
        &[
            ThemeId::OneDark,
            ThemeId::Dracula,
            ThemeId::MaterialDark,
            ThemeId::Sublime,
            ThemeId::GithubLight,
            ThemeId::XcodeLight,
            ThemeId::Nord,
        ]
    }

    /// The persisted string id.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeId::OneDark => "one-dark",
            ThemeId::Dracula => "dracula",
            ThemeId::MaterialDark => "material-dark",
            ThemeId::Sublime => "sublime",
            ThemeId::GithubLight => "github-light",
            ThemeId::XcodeLight => "xcode-light",
            ThemeId::Nord => "nord",
        }
    }

    /// Looks up a string id.
    pub fn parse(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.as_str() == id)
    }

    /// Looks up a string id, falling back to the ambient default.
    pub fn parse_or_default(id: &str, ambient: Appearance) -> Self {
        Self::parse(id).unwrap_or_else(|| {
            tracing::debug!("Unknown theme id {:?}, using {}", id, ambient.default_theme());
            ambient.default_theme()
        })
    }

    /// The concrete scheme for this theme.
    pub fn theme(self) -> &'static ConcreteTheme {
        // The table holds one entry per variant in declaration order.
        &THEMES[self as usize]
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown theme: {}", s))
    }
}

/// Resolves a theme id string to its scheme. Never fails.
pub fn resolve(theme_id: &str, ambient: Appearance) -> &'static ConcreteTheme {
    ThemeId::parse_or_default(theme_id, ambient).theme()
}

/// A concrete editor color scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcreteTheme {
    pub id: ThemeId,
    pub display_name: &'static str,
    pub is_dark: bool,

    pub background: Color,
    pub foreground: Color,
    pub selection: Color,
    pub gutter: Color,
    pub gutter_text: Color,
    pub accent: Color,

    /// Output panel colors
    pub output_background: Color,
    pub output_text: Color,
    pub error_text: Color,

    pub syntax: SyntaxColors,
}

/// Syntax highlighting colors.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxColors {
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub comment: Color,
    pub function: Color,
    pub type_name: Color,
    pub constant: Color,
    pub operator: Color,
    pub decorator: Color,
    pub builtin: Color,
}

impl ConcreteTheme {
    /// Color for a highlighted span.
    pub fn syntax_color(&self, kind: HighlightKind) -> Color {
        let s = &self.syntax;
        match kind {
            HighlightKind::Keyword => s.keyword,
            HighlightKind::String => s.string,
            HighlightKind::Number => s.number,
            HighlightKind::Comment => s.comment,
            HighlightKind::Function => s.function,
            HighlightKind::Type => s.type_name,
            HighlightKind::Constant => s.constant,
            HighlightKind::Operator => s.operator,
            HighlightKind::Decorator => s.decorator,
            HighlightKind::Builtin => s.builtin,
        }
    }
}

static THEMES: [ConcreteTheme; 7] = [
    ConcreteTheme {
        id: ThemeId::OneDark,
        display_name: "One Dark",
        is_dark: true,
        background: Color::hex(0x282c34),
        foreground: Color::hex(0xabb2bf),
        selection: Color::hex(0x3e4451),
        gutter: Color::hex(0x21252b),
        gutter_text: Color::hex(0x636d83),
        accent: Color::hex(0x61afef),
        output_background: Color::hex(0x1e2127),
        output_text: Color::hex(0xabb2bf),
        error_text: Color::hex(0xe06c75),
        syntax: SyntaxColors {
            keyword: Color::hex(0xc678dd),
            string: Color::hex(0x98c379),
            number: Color::hex(0xd19a66),
            comment: Color::hex(0x5c6370),
            function: Color::hex(0x61afef),
            type_name: Color::hex(0xe5c07b),
            constant: Color::hex(0xd19a66),
            operator: Color::hex(0x56b6c2),
            decorator: Color::hex(0xe5c07b),
            builtin: Color::hex(0x56b6c2),
        },
    },
    ConcreteTheme {
        id: ThemeId::Dracula,
        display_name: "Dracula",
        is_dark: true,
        background: Color::hex(0x282a36),
        foreground: Color::hex(0xf8f8f2),
        selection: Color::hex(0x44475a),
        gutter: Color::hex(0x282a36),
        gutter_text: Color::hex(0x6272a4),
        accent: Color::hex(0xbd93f9),
        output_background: Color::hex(0x21222c),
        output_text: Color::hex(0xf8f8f2),
        error_text: Color::hex(0xff5555),
        syntax: SyntaxColors {
            keyword: Color::hex(0xff79c6),
            string: Color::hex(0xf1fa8c),
            number: Color::hex(0xbd93f9),
            comment: Color::hex(0x6272a4),
            function: Color::hex(0x50fa7b),
            type_name: Color::hex(0x8be9fd),
            constant: Color::hex(0xbd93f9),
            operator: Color::hex(0xff79c6),
            decorator: Color::hex(0x50fa7b),
            builtin: Color::hex(0x8be9fd),
        },
    },
    ConcreteTheme {
        id: ThemeId::MaterialDark,
        display_name: "Material Dark",
        is_dark: true,
        background: Color::hex(0x263238),
        foreground: Color::hex(0xeeffff),
        selection: Color::hex(0x314549),
        gutter: Color::hex(0x263238),
        gutter_text: Color::hex(0x546e7a),
        accent: Color::hex(0x80cbc4),
        output_background: Color::hex(0x1e272c),
        output_text: Color::hex(0xeeffff),
        error_text: Color::hex(0xff5370),
        syntax: SyntaxColors {
            keyword: Color::hex(0xc792ea),
            string: Color::hex(0xc3e88d),
            number: Color::hex(0xf78c6c),
            comment: Color::hex(0x546e7a),
            function: Color::hex(0x82aaff),
            type_name: Color::hex(0xffcb6b),
            constant: Color::hex(0xf78c6c),
            operator: Color::hex(0x89ddff),
            decorator: Color::hex(0xffcb6b),
            builtin: Color::hex(0x89ddff),
        },
    },
    ConcreteTheme {
        id: ThemeId::Sublime,
        display_name: "Sublime",
        is_dark: true,
        background: Color::hex(0x303841),
        foreground: Color::hex(0xd8dee9),
        selection: Color::hex(0x4c5764),
        gutter: Color::hex(0x303841),
        gutter_text: Color::hex(0x6d7a88),
        accent: Color::hex(0x5fb4b4),
        output_background: Color::hex(0x272e35),
        output_text: Color::hex(0xd8dee9),
        error_text: Color::hex(0xec5f67),
        syntax: SyntaxColors {
            keyword: Color::hex(0xc594c5),
            string: Color::hex(0x99c794),
            number: Color::hex(0xf99157),
            comment: Color::hex(0xa7adba),
            function: Color::hex(0x5fb4b4),
            type_name: Color::hex(0xfac863),
            constant: Color::hex(0xf99157),
            operator: Color::hex(0xf97b58),
            decorator: Color::hex(0xc594c5),
            builtin: Color::hex(0x6699cc),
        },
    },
    ConcreteTheme {
        id: ThemeId::GithubLight,
        display_name: "GitHub Light",
        is_dark: false,
        background: Color::hex(0xffffff),
        foreground: Color::hex(0x24292e),
        selection: Color::hex(0xbbdfff),
        gutter: Color::hex(0xffffff),
        gutter_text: Color::hex(0x6e7781),
        accent: Color::hex(0x0366d6),
        output_background: Color::hex(0xf6f8fa),
        output_text: Color::hex(0x24292e),
        error_text: Color::hex(0xcb2431),
        syntax: SyntaxColors {
            keyword: Color::hex(0xd73a49),
            string: Color::hex(0x032f62),
            number: Color::hex(0x005cc5),
            comment: Color::hex(0x6a737d),
            function: Color::hex(0x6f42c1),
            type_name: Color::hex(0x6f42c1),
            constant: Color::hex(0x005cc5),
            operator: Color::hex(0xd73a49),
            decorator: Color::hex(0x6f42c1),
            builtin: Color::hex(0x005cc5),
        },
    },
    ConcreteTheme {
        id: ThemeId::XcodeLight,
        display_name: "Xcode Light",
        is_dark: false,
        background: Color::hex(0xffffff),
        foreground: Color::hex(0x000000),
        selection: Color::hex(0xb4d8fd),
        gutter: Color::hex(0xffffff),
        gutter_text: Color::hex(0x9fa0a6),
        accent: Color::hex(0x326d74),
        output_background: Color::hex(0xf5f5f5),
        output_text: Color::hex(0x000000),
        error_text: Color::hex(0xd12f1b),
        syntax: SyntaxColors {
            keyword: Color::hex(0xad3da4),
            string: Color::hex(0xd12f1b),
            number: Color::hex(0x272ad8),
            comment: Color::hex(0x707f8c),
            function: Color::hex(0x4b21b0),
            type_name: Color::hex(0x3e8087),
            constant: Color::hex(0x78492a),
            operator: Color::hex(0x000000),
            decorator: Color::hex(0x643820),
            builtin: Color::hex(0x6c36a9),
        },
    },
    ConcreteTheme {
        id: ThemeId::Nord,
        display_name: "Nord",
        is_dark: true,
        background: Color::hex(0x2e3440),
        foreground: Color::hex(0xd8dee9),
        selection: Color::hex(0x434c5e),
        gutter: Color::hex(0x2e3440),
        gutter_text: Color::hex(0x4c566a),
        accent: Color::hex(0x88c0d0),
        output_background: Color::hex(0x272c36),
        output_text: Color::hex(0xd8dee9),
        error_text: Color::hex(0xbf616a),
        syntax: SyntaxColors {
            keyword: Color::hex(0x81a1c1),
            string: Color::hex(0xa3be8c),
            number: Color::hex(0xb48ead),
            comment: Color::hex(0x616e88),
            function: Color::hex(0x88c0d0),
            type_name: Color::hex(0x8fbcbb),
            constant: Color::hex(0x81a1c1),
            operator: Color::hex(0x81a1c1),
            decorator: Color::hex(0xd08770),
            builtin: Color::hex(0x88c0d0),
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_resolves_to_itself() {
        for id in ThemeId::all() {
            assert_eq!(id.theme().id, *id);
            assert_eq!(resolve(id.as_str(), Appearance::Dark).id, *id);
            assert_eq!(resolve(id.as_str(), Appearance::Light).id, *id);
        }
    }

    #[test]
    fn test_unknown_id_uses_ambient_default() {
        assert_eq!(resolve("solarized", Appearance::Dark).id, ThemeId::OneDark);
        assert_eq!(resolve("solarized", Appearance::Light).id, ThemeId::GithubLight);
        assert_eq!(resolve("", Appearance::Dark).id, ThemeId::OneDark);
        // Ids are case-sensitive
        assert_eq!(resolve("Nord", Appearance::Light).id, ThemeId::GithubLight);
    }

    #[test]
    fn test_string_ids() {
        assert_eq!(ThemeId::MaterialDark.to_string(), "material-dark");
        assert_eq!("xcode-light".parse::<ThemeId>(), Ok(ThemeId::XcodeLight));
        assert!("vim".parse::<ThemeId>().is_err());
    }

    #[test]
    fn test_light_flags() {
        let light: Vec<_> = ThemeId::all()
            .iter()
            .filter(|id| !id.theme().is_dark)
            .collect();
        assert_eq!(light, vec![&ThemeId::GithubLight, &ThemeId::XcodeLight]);
    }

    #[test]
    fn test_hex_color() {
        let c = Color::hex(0xff0080);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 128.0 / 255.0).abs() < f32::EPSILON);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_syntax_color_lookup() {
        let theme = ThemeId::Dracula.theme();
        assert_eq!(theme.syntax_color(HighlightKind::Keyword), Color::hex(0xff79c6));
        assert_eq!(theme.syntax_color(HighlightKind::Type), theme.syntax.type_name);
    }
}
