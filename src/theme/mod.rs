//! Theme persistence
//!
//! A visitor's theme choice lives in a cookie. Every request resolves it
//! against the configured themes, falling back to the default, and the page
//! swaps in `{css_dir}/{theme}.css`.

use serde::Serialize;

use crate::config::ThemeConfig;

/// The resolved theme and the stylesheet that implements it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeSelection {
    pub theme: String,
    pub stylesheet: String,
}

/// Resolves and persists theme choices
#[derive(Debug, Clone)]
pub struct ThemePicker {
    config: ThemeConfig,
}

impl ThemePicker {
    pub fn new(config: ThemeConfig) -> Self {
        Self { config }
    }

    /// Whether `name` may be selected.
    ///
    /// Names end up in a URL path, so only ASCII letters, digits, `-` and `_`
    /// are allowed.
    pub fn accepts(&self, name: &str) -> bool {
        let well_formed = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        well_formed
            && (self.config.available.is_empty()
                || name == self.config.default
                || self.config.available.iter().any(|t| t == name))
    }

    /// The requested theme if acceptable, otherwise the default
    pub fn resolve<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested.map(str::trim) {
            Some(name) if self.accepts(name) => name,
            _ => &self.config.default,
        }
    }

    /// Resolve the theme from a raw `Cookie` header
    pub fn theme_from_cookies<'a>(&'a self, header: Option<&'a str>) -> &'a str {
        self.resolve(header.and_then(|h| cookie_value(h, &self.config.cookie)))
    }

    pub fn stylesheet_href(&self, theme: &str) -> String {
        format!("{}/{}.css", self.config.css_dir.trim_end_matches('/'), theme)
    }

    pub fn selection(&self, theme: &str) -> ThemeSelection {
        ThemeSelection {
            theme: theme.to_string(),
            stylesheet: self.stylesheet_href(theme),
        }
    }

    /// `Set-Cookie` value persisting `theme` for the whole site
    pub fn set_cookie(&self, theme: &str) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            self.config.cookie,
            theme,
            u64::from(self.config.max_age_days) * 24 * 60 * 60
        )
    }
}

/// Find a cookie's value in a `Cookie` header (`a=1; theme=dark`)
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim().trim_matches('"'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker(available: &[&str]) -> ThemePicker {
        ThemePicker::new(ThemeConfig {
            available: available.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let picker = picker(&[]);
        assert_eq!(picker.resolve(None), "monochrome");
        assert_eq!(picker.resolve(Some("")), "monochrome");
        assert_eq!(picker.resolve(Some("dracula")), "dracula");
        assert_eq!(picker.resolve(Some("../../etc/passwd")), "monochrome");
    }

    #[test]
    fn test_available_list_restricts_choice() {
        let picker = picker(&["dracula", "nord"]);
        assert!(picker.accepts("nord"));
        assert!(picker.accepts("monochrome"));
        assert!(!picker.accepts("solarized"));
        assert_eq!(picker.resolve(Some("solarized")), "monochrome");
    }

    #[test]
    fn test_cookie_value() {
        assert_eq!(cookie_value("a=1; theme=nord; b=2", "theme"), Some("nord"));
        assert_eq!(cookie_value("theme=\"nord\"", "theme"), Some("nord"));
        assert_eq!(cookie_value("mytheme=nord", "theme"), None);
        assert_eq!(cookie_value("", "theme"), None);
    }

    #[test]
    fn test_theme_from_cookies() {
        let picker = picker(&[]);
        assert_eq!(picker.theme_from_cookies(Some("theme=nord")), "nord");
        assert_eq!(picker.theme_from_cookies(Some("other=1")), "monochrome");
        assert_eq!(picker.theme_from_cookies(None), "monochrome");
    }

    #[test]
    fn test_stylesheet_and_cookie() {
        let picker = picker(&[]);
        let selection = picker.selection("nord");
        assert_eq!(selection.stylesheet, "/css/themes/nord.css");
        assert_eq!(
            picker.set_cookie("nord"),
            "theme=nord; Path=/; Max-Age=31536000; SameSite=Lax"
        );
    }
}
