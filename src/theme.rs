//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// The variant for the persisted display-mode flag.
    pub fn from_dark_mode(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Sidebar --
    pub sidebar_topic: Style,
    pub sidebar_subtopic: Style,
    pub sidebar_active: Style,
    pub selected: Style,

    // -- Completion --
    pub complete: Style,
    pub incomplete: Style,
    pub progress_gauge: Style,

    // -- Content --
    pub page_title: Style,
    pub heading: Style,
    pub body: Style,
    pub muted: Style,
    pub note: Style,
    pub code: Style,
    pub image: Style,
    pub key_point: Style,

    // -- Quiz --
    pub quiz_selected: Style,
    pub quiz_correct: Style,
    pub quiz_wrong: Style,

    // -- Search --
    pub search_input: Style,
    pub search_match: Style,

    // -- Chrome --
    pub breadcrumb: Style,
    pub breadcrumb_current: Style,
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub error: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            sidebar_topic: Style::default().add_modifier(Modifier::BOLD),
            sidebar_subtopic: Style::default().fg(Color::Gray),
            sidebar_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).fg(Color::White),

            complete: Style::default().fg(Color::Green),
            incomplete: Style::default().fg(Color::DarkGray),
            progress_gauge: Style::default().fg(Color::Cyan).bg(Color::Black),

            page_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            body: Style::default(),
            muted: Style::default().fg(Color::DarkGray),
            note: Style::default().fg(Color::Yellow),
            code: Style::default().fg(Color::Yellow).bg(Color::Black),
            image: Style::default().fg(Color::Blue),
            key_point: Style::default().fg(Color::LightGreen),

            quiz_selected: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            quiz_correct: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            quiz_wrong: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            search_input: Style::default().fg(Color::Yellow),
            search_match: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow),

            breadcrumb: Style::default().fg(Color::Gray),
            breadcrumb_current: Style::default().add_modifier(Modifier::BOLD),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            error: Style::default().fg(Color::Red),
        }
    }

    /// Adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            sidebar_topic: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            sidebar_subtopic: Style::default().fg(Color::DarkGray),
            sidebar_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::Blue).fg(Color::White),

            complete: Style::default().fg(Color::Green),
            incomplete: Style::default().fg(Color::Gray),
            progress_gauge: Style::default().fg(Color::Blue).bg(Color::White),

            page_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            body: Style::default().fg(Color::Black),
            muted: Style::default().fg(Color::DarkGray),
            note: Style::default().fg(Color::Magenta),
            code: Style::default().fg(Color::DarkGray).bg(Color::White),
            image: Style::default().fg(Color::Blue),
            key_point: Style::default().fg(Color::Green),

            quiz_selected: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            quiz_correct: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            quiz_wrong: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            search_input: Style::default().fg(Color::Magenta),
            search_match: Style::default()
                .fg(Color::Black)
                .bg(Color::LightYellow),

            breadcrumb: Style::default().fg(Color::DarkGray),
            breadcrumb_current: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            error: Style::default().fg(Color::Red),
        }
    }

    /// Every role paired with its style, in declaration order.
    fn roles(&self) -> [(&'static str, Style); ROLE_COUNT] {
        [
            ("sidebar_topic", self.sidebar_topic),
            ("sidebar_subtopic", self.sidebar_subtopic),
            ("sidebar_active", self.sidebar_active),
            ("selected", self.selected),
            ("complete", self.complete),
            ("incomplete", self.incomplete),
            ("progress_gauge", self.progress_gauge),
            ("page_title", self.page_title),
            ("heading", self.heading),
            ("body", self.body),
            ("muted", self.muted),
            ("note", self.note),
            ("code", self.code),
            ("image", self.image),
            ("key_point", self.key_point),
            ("quiz_selected", self.quiz_selected),
            ("quiz_correct", self.quiz_correct),
            ("quiz_wrong", self.quiz_wrong),
            ("search_input", self.search_input),
            ("search_match", self.search_match),
            ("breadcrumb", self.breadcrumb),
            ("breadcrumb_current", self.breadcrumb_current),
            ("status_bar", self.status_bar),
            ("panel_border", self.panel_border),
            ("panel_border_focused", self.panel_border_focused),
            ("error", self.error),
        ]
    }
}

const ROLE_COUNT: usize = 26;

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup, so render code can name roles (`"heading"`)
/// without reaching into the palette struct.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        Self {
            map: p.roles().into_iter().collect(),
        }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_follows_dark_mode_flag() {
        assert_eq!(ThemeVariant::from_dark_mode(true), ThemeVariant::Dark);
        assert_eq!(ThemeVariant::from_dark_mode(false), ThemeVariant::Light);
        assert_eq!(ThemeVariant::from_dark_mode(true).name(), "Dark");
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.selected, light.selected);
        assert_ne!(dark.body, light.body);
    }

    #[test]
    fn quiz_feedback_colors_are_distinct() {
        for variant in [ThemeVariant::Dark, ThemeVariant::Light] {
            let p = variant.palette();
            assert_ne!(p.quiz_correct, p.quiz_wrong);
            assert_ne!(p.quiz_selected, p.quiz_correct);
        }
    }

    #[test]
    fn style_map_resolves_known_roles() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);

        assert_eq!(sm.resolve("heading"), palette.heading);
        assert_eq!(sm.resolve("search_match"), palette.search_match);
        assert_eq!(sm.resolve("status_bar"), palette.status_bar);
    }

    #[test]
    fn style_map_returns_default_for_unknown() {
        let sm = StyleMap::from_palette(&ThemeVariant::Light.palette());
        assert_eq!(sm.resolve("nonexistent_role"), Style::default());
    }

    #[test]
    fn role_names_are_unique() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.map.len(), ROLE_COUNT);
    }
}
