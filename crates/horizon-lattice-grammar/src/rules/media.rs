//! Media queries guarding `@media` bodies.

use std::fmt;

use cssparser::ToCss;

use crate::grammar::ParseRecord;
use crate::types::{MediaEnvironment, PropertyValue, Value};

/// One query of an `@media` list, e.g. `screen and (min-width: 600px)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaQuery {
    /// Query text as written, whitespace collapsed.
    pub text: String,
    /// Led by `not`.
    pub negated: bool,
    /// Led by `only`.
    pub only: bool,
    /// `screen`, `print`, `all`... `None` when the query starts with a feature.
    pub media_type: Option<String>,
    /// Features with a value, parsed by the media-feature grammars. A
    /// feature given twice holds a list, and every entry must match.
    pub features: ParseRecord,
    /// Features given without a value, like `(color)`.
    pub flags: Vec<String>,
    /// False when a feature was unknown or its value did not parse; an
    /// invalid query never matches.
    pub valid: bool,
}

impl MediaQuery {
    /// A query matching every environment.
    pub fn all() -> Self {
        Self {
            text: "all".to_string(),
            media_type: Some("all".to_string()),
            valid: true,
            ..Default::default()
        }
    }

    /// Whether `env` satisfies the query.
    pub fn matches(&self, env: &dyn MediaEnvironment) -> bool {
        if !self.valid {
            return false;
        }
        let type_matches = match &self.media_type {
            None => true,
            Some(media_type) => {
                media_type == "all" || media_type.eq_ignore_ascii_case(env.media_type())
            }
        };
        let features_match = self
            .features
            .iter()
            .all(|(name, value)| feature_matches(name, value, env));
        (type_matches && features_match) != self.negated
    }
}

fn feature_matches(name: &str, value: &PropertyValue, env: &dyn MediaEnvironment) -> bool {
    value.values().iter().all(|value| match value {
        Value::MediaFeature(feature) => feature.matches(env),
        Value::Keyword(orientation) if name == "orientation" => {
            let landscape = env.viewport_width() > env.viewport_height();
            (orientation == "landscape") == landscape
        }
        // aspect ratios, resolution, color depth and the like are not
        // evaluated against the environment
        _ => true,
    })
}

impl ToCss for MediaQuery {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(&self.text)
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

/// Whether any query of `list` matches; an empty list matches everything.
pub fn media_list_matches(list: &[MediaQuery], env: &dyn MediaEnvironment) -> bool {
    list.is_empty() || list.iter().any(|query| query.matches(env))
}
