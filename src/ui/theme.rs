use ratatui::style::Color;

/// Color roles used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub border: Color,
    pub title: Color,
    pub repo_name: Color,
    pub selected: Color,
    pub branch: Color,
    pub synced: Color,
    pub ahead: Color,
    pub behind: Color,
    pub error: Color,
    pub dim: Color,
    pub help_key: Color,
    pub help_text: Color,
    pub no_remote: Color,
    pub spinner: Color,
}

const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

pub const THEMES: &[Theme] = &[
    Theme {
        name: "dracula",
        border: hex(0x6272a4),
        title: hex(0xff79c6),
        repo_name: hex(0xf8f8f2),
        selected: hex(0xff79c6),
        branch: hex(0x6272a4),
        synced: hex(0x50fa7b),
        ahead: hex(0xf1fa8c),
        behind: hex(0xff5555),
        error: hex(0xff5555),
        dim: hex(0x44475a),
        help_key: hex(0xbd93f9),
        help_text: hex(0x6272a4),
        no_remote: hex(0x6272a4),
        spinner: hex(0xff79c6),
    },
    Theme {
        name: "nord",
        border: hex(0x4c566a),
        title: hex(0x88c0d0),
        repo_name: hex(0xeceff4),
        selected: hex(0x88c0d0),
        branch: hex(0x4c566a),
        synced: hex(0xa3be8c),
        ahead: hex(0xebcb8b),
        behind: hex(0xbf616a),
        error: hex(0xbf616a),
        dim: hex(0x3b4252),
        help_key: hex(0xb48ead),
        help_text: hex(0x4c566a),
        no_remote: hex(0x4c566a),
        spinner: hex(0x88c0d0),
    },
    Theme {
        name: "catppuccin",
        border: hex(0x585b70),
        title: hex(0xcba6f7),
        repo_name: hex(0xcdd6f4),
        selected: hex(0xcba6f7),
        branch: hex(0x6c7086),
        synced: hex(0xa6e3a1),
        ahead: hex(0xf9e2af),
        behind: hex(0xf38ba8),
        error: hex(0xf38ba8),
        dim: hex(0x45475a),
        help_key: hex(0x89b4fa),
        help_text: hex(0x6c7086),
        no_remote: hex(0x6c7086),
        spinner: hex(0xcba6f7),
    },
    Theme {
        name: "gruvbox",
        border: hex(0x665c54),
        title: hex(0xfe8019),
        repo_name: hex(0xebdbb2),
        selected: hex(0xfe8019),
        branch: hex(0x7c6f64),
        synced: hex(0xb8bb26),
        ahead: hex(0xfabd2f),
        behind: hex(0xfb4934),
        error: hex(0xfb4934),
        dim: hex(0x504945),
        help_key: hex(0xd3869b),
        help_text: hex(0x7c6f64),
        no_remote: hex(0x7c6f64),
        spinner: hex(0xfe8019),
    },
    Theme {
        name: "tokyonight",
        border: hex(0x3b4261),
        title: hex(0x7aa2f7),
        repo_name: hex(0xc0caf5),
        selected: hex(0x7aa2f7),
        branch: hex(0x565f89),
        synced: hex(0x9ece6a),
        ahead: hex(0xe0af68),
        behind: hex(0xf7768e),
        error: hex(0xf7768e),
        dim: hex(0x292e42),
        help_key: hex(0xbb9af7),
        help_text: hex(0x565f89),
        no_remote: hex(0x565f89),
        spinner: hex(0x7aa2f7),
    },
    Theme {
        name: "mono",
        border: hex(0x666666),
        title: hex(0xffffff),
        repo_name: hex(0xffffff),
        selected: hex(0xffffff),
        branch: hex(0x888888),
        synced: hex(0xaaaaaa),
        ahead: hex(0xffffff),
        behind: hex(0xffffff),
        error: hex(0xff0000),
        dim: hex(0x444444),
        help_key: hex(0xffffff),
        help_text: hex(0x666666),
        no_remote: hex(0x666666),
        spinner: hex(0xffffff),
    },
    Theme {
        name: "jrpg-dark",
        border: hex(0x7ec8e3),
        title: hex(0xffd866),
        repo_name: hex(0xf4e4bc),
        selected: hex(0xffd866),
        branch: hex(0x7ec8e3),
        synced: hex(0x98d982),
        ahead: hex(0xffb347),
        behind: hex(0xff6b6b),
        error: hex(0xff6b6b),
        dim: hex(0x8b9bb4),
        help_key: hex(0xc9b8ff),
        help_text: hex(0x8b9bb4),
        no_remote: hex(0x7ec8e3),
        spinner: hex(0xffd866),
    },
    Theme {
        name: "jrpg-light",
        border: hex(0x3d7a99),
        title: hex(0xc4880d),
        repo_name: hex(0x2d3a4f),
        selected: hex(0xc4880d),
        branch: hex(0x3d7a99),
        synced: hex(0x2d8a4e),
        ahead: hex(0xd4780a),
        behind: hex(0xc13b3b),
        error: hex(0xc13b3b),
        dim: hex(0x8b96a3),
        help_key: hex(0x7b5caa),
        help_text: hex(0x8b96a3),
        no_remote: hex(0x3d7a99),
        spinner: hex(0xc4880d),
    },
];

impl Theme {
    /// Look up a theme by name, falling back to dracula.
    pub fn by_name(name: &str) -> Theme {
        let wanted = name.trim().to_lowercase();
        THEMES
            .iter()
            .find(|t| t.name == wanted)
            .copied()
            .unwrap_or(THEMES[0])
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        THEMES.iter().map(|t| t.name)
    }
}

impl Default for Theme {
    fn default() -> Self {
        THEMES[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Theme::by_name("Nord").name, "nord");
    }

    #[test]
    fn test_unknown_falls_back_to_dracula() {
        assert_eq!(Theme::by_name("solarized").name, "dracula");
    }

    #[test]
    fn test_hex() {
        assert_eq!(hex(0xff79c6), Color::Rgb(0xff, 0x79, 0xc6));
    }

    #[test]
    fn test_all_names_unique() {
        let mut names: Vec<_> = Theme::names().collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), THEMES.len());
    }
}
