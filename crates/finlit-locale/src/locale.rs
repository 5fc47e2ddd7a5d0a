use std::fmt;

use serde::Serialize;

/// Supported display languages.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Nl,
}

impl Locale {
    /// Fallback for unknown preferences and source of truth for content shape.
    pub const DEFAULT: Locale = Locale::En;

    pub const ALL: [Locale; 2] = [Locale::En, Locale::Nl];

    /// Internal locale code, also the directory name on disk.
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Nl => "nl",
        }
    }

    /// Parse an exact (case-insensitive) locale code.
    pub fn from_code(code: &str) -> Option<Self> {
        Locale::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Name shown in the language picker, in the language itself.
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Nl => "Nederlands",
        }
    }

    pub fn is_default(self) -> bool {
        self == Locale::DEFAULT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Map a stored language preference to a supported locale.
///
/// Accepts display names ("English", "Dutch", "Nederlands") and codes with
/// optional region ("nl", "en-US", "nl_BE"). Anything else, including the
/// empty string, resolves to [`Locale::DEFAULT`].
pub fn resolve_locale(preference: &str) -> Locale {
    let wanted = preference.trim().to_lowercase();
    match wanted.as_str() {
        "english" | "engels" => return Locale::En,
        "dutch" | "nederlands" | "flemish" | "vlaams" => return Locale::Nl,
        _ => {}
    }

    let language = wanted.split(['-', '_']).next().unwrap_or_default();
    Locale::from_code(language).unwrap_or(Locale::DEFAULT)
}

/// Localized entity tables, one file per category on disk.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    Modules,
    Lessons,
    Steps,
}

impl ContentCategory {
    pub const ALL: [ContentCategory; 3] = [
        ContentCategory::Modules,
        ContentCategory::Lessons,
        ContentCategory::Steps,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ContentCategory::Modules => "modules",
            ContentCategory::Lessons => "lessons",
            ContentCategory::Steps => "steps",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ContentCategory::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_names_and_codes() {
        assert_eq!(resolve_locale("English"), Locale::En);
        assert_eq!(resolve_locale("Dutch"), Locale::Nl);
        assert_eq!(resolve_locale("  nederlands "), Locale::Nl);
        assert_eq!(resolve_locale("nl"), Locale::Nl);
        assert_eq!(resolve_locale("nl_BE"), Locale::Nl);
        assert_eq!(resolve_locale("EN-us"), Locale::En);
    }

    #[test]
    fn unknown_preferences_use_default() {
        assert_eq!(resolve_locale(""), Locale::DEFAULT);
        assert_eq!(resolve_locale("Klingon"), Locale::DEFAULT);
        assert_eq!(resolve_locale("-"), Locale::DEFAULT);
        assert_eq!(resolve_locale("fr-FR"), Locale::DEFAULT);
    }

    #[test]
    fn codes_round_trip_through_display() {
        for locale in Locale::ALL {
            assert_eq!(Locale::from_code(&locale.to_string()), Some(locale));
        }
        assert!(Locale::DEFAULT.is_default());
        assert!(!Locale::Nl.is_default());
    }

    #[test]
    fn parses_category_names() {
        assert_eq!(ContentCategory::from_name("Lessons"), Some(ContentCategory::Lessons));
        assert_eq!(ContentCategory::from_name("copy"), None);
    }
}
