//! User-adjustable presentation settings. None of these ever touch the document itself.

use serde::{Deserialize, Serialize};

use crate::render::color::AccentColor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// The four optional sections a user can hide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Summary,
    Experience,
    Education,
    Skills,
}

fn included() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludedSections {
    #[serde(default = "included")]
    pub summary: bool,
    #[serde(default = "included")]
    pub experience: bool,
    #[serde(default = "included")]
    pub education: bool,
    #[serde(default = "included")]
    pub skills: bool,
}

impl IncludedSections {
    pub fn contains(&self, section: Section) -> bool {
        match section {
            Section::Summary => self.summary,
            Section::Experience => self.experience,
            Section::Education => self.education,
            Section::Skills => self.skills,
        }
    }
}

impl Default for IncludedSections {
    fn default() -> Self {
        Self {
            summary: true,
            experience: true,
            education: true,
            skills: true,
        }
    }
}

/// Live-preview settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub accent_color: AccentColor,
    /// `None` shows every section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_sections: Option<IncludedSections>,
}

impl RenderConfig {
    pub fn shows(&self, section: Section) -> bool {
        self.included_sections
            .map_or(true, |sections| sections.contains(section))
    }
}

/// Partial update of [`RenderConfig`]; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfigPatch {
    pub theme: Option<Theme>,
    pub accent_color: Option<AccentColor>,
    pub included_sections: Option<IncludedSections>,
}

impl RenderConfig {
    pub fn apply(&mut self, patch: RenderConfigPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(accent) = patch.accent_color {
            self.accent_color = accent;
        }
        if let Some(sections) = patch.included_sections {
            self.included_sections = Some(sections);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    #[serde(alias = "A4")]
    A4,
    #[serde(alias = "Letter")]
    Letter,
    #[serde(alias = "Legal")]
    Legal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Settings for one PDF export, independent from the live preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    #[serde(default)]
    pub paper_size: PaperSize,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub included_sections: IncludedSections,
}

impl ExportConfig {
    /// The render settings the off-screen export tree is built with.
    pub fn render_config(&self, accent_color: AccentColor) -> RenderConfig {
        RenderConfig {
            theme: self.theme,
            accent_color,
            included_sections: Some(self.included_sections),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_flags_show_every_section() {
        let config = RenderConfig::default();
        assert!(config.included_sections.is_none());
        for section in [
            Section::Summary,
            Section::Experience,
            Section::Education,
            Section::Skills,
        ] {
            assert!(config.shows(section));
        }
    }

    #[test]
    fn test_partial_flags_default_missing_to_true() {
        let sections: IncludedSections = serde_json::from_str(r#"{"education": false}"#).unwrap();
        assert!(sections.summary);
        assert!(!sections.education);
        assert!(sections.skills);
    }

    #[test]
    fn test_render_config_wire_format() {
        let json = r##"{"theme":"dark","accentColor":"#112233","includedSections":{"skills":false}}"##;
        let config: RenderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.accent_color.to_string(), "#112233");
        assert!(!config.shows(Section::Skills));
        assert!(config.shows(Section::Summary));
    }

    #[test]
    fn test_patch_keeps_unset_fields() {
        let mut config = RenderConfig::default();
        config.apply(RenderConfigPatch {
            theme: Some(Theme::Dark),
            ..Default::default()
        });
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.accent_color, AccentColor::DEFAULT);
        assert!(config.included_sections.is_none());
    }

    #[test]
    fn test_export_config_defaults_and_aliases() {
        let config: ExportConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.paper_size, PaperSize::A4);
        assert_eq!(config.orientation, Orientation::Portrait);
        assert_eq!(config.theme, Theme::Light);

        let legal: ExportConfig =
            serde_json::from_str(r#"{"paperSize":"Legal","orientation":"landscape"}"#).unwrap();
        assert_eq!(legal.paper_size, PaperSize::Legal);
        assert_eq!(legal.orientation, Orientation::Landscape);
    }

    #[test]
    fn test_export_render_config_carries_export_choices() {
        let export = ExportConfig {
            theme: Theme::Dark,
            included_sections: IncludedSections {
                summary: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let render = export.render_config(AccentColor::DEFAULT);
        assert_eq!(render.theme, Theme::Dark);
        assert!(!render.shows(Section::Summary));
        assert!(render.shows(Section::Experience));
    }
}
