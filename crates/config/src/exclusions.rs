//! Configuration paths that are stored legitimately without a schema entry
//!
//! These design keys are written by the theme configuration grid rather than
//! the system configuration schema, so the path validator never knows them.

use std::collections::HashSet;

pub const BUILTIN_EXCLUDED_PATHS: &[&str] = &[
    "design/email/footer_template",
    "design/email/header_template",
    "design/email/logo_alt",
    "design/email/logo_height",
    "design/email/logo_width",
    "design/footer/absolute_footer",
    "design/footer/copyright",
    "design/footer/report_bugs",
    "design/head/default_description",
    "design/head/default_keywords",
    "design/head/default_title",
    "design/head/demonotice",
    "design/head/includes",
    "design/head/title_prefix",
    "design/head/title_suffix",
    "design/header/logo_alt",
    "design/header/logo_height",
    "design/header/logo_width",
    "design/header/translate_title",
    "design/header/welcome",
    "design/pagination/anchor_text_for_next",
    "design/pagination/anchor_text_for_previous",
    "design/pagination/pagination_frame",
    "design/pagination/pagination_frame_skip",
    "design/search_engine_robots/custom_instructions",
    "design/search_engine_robots/default_robots",
    "design/theme/theme_id",
    "design/watermark/image_imageOpacity",
    "design/watermark/image_position",
    "design/watermark/image_size",
    "design/watermark/small_image_imageOpacity",
    "design/watermark/small_image_position",
    "design/watermark/small_image_size",
    "design/watermark/thumbnail_imageOpacity",
    "design/watermark/thumbnail_position",
    "design/watermark/thumbnail_size",
];

/// Immutable set of paths exempt from orphan detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionList {
    paths: HashSet<String>,
}

impl ExclusionList {
    /// The built-in list only
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            paths: BUILTIN_EXCLUDED_PATHS
                .iter()
                .map(|path| (*path).to_string())
                .collect(),
        }
    }

    /// A new list holding this list's paths plus `extra`
    #[must_use]
    pub fn merged_with<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut paths = self.paths.clone();
        paths.extend(extra.into_iter().map(Into::into));
        Self { paths }
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Default for ExclusionList {
    fn default() -> Self {
        Self::builtin()
    }
}
