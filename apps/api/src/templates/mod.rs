//! Template Registry: closed set of resume layouts.
//! Every template yields the same sections in the same order; only the
//! arrangement (headings, columns, typography) differs.

pub mod catalog;
pub mod document;
pub mod handlers;
pub mod registry;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use catalog::Template;
pub use document::RenderedDocument;
pub use registry::{render, resolve};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    #[default]
    Classic,
    Modern,
    TwoColumn,
    Creative,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Classic,
        TemplateId::Modern,
        TemplateId::TwoColumn,
        TemplateId::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Classic => "classic",
            TemplateId::Modern => "modern",
            TemplateId::TwoColumn => "twocolumn",
            TemplateId::Creative => "creative",
        }
    }

    pub fn display_name(&self) -> &'static str {
        resolve(*self).name
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTemplate(pub String);

impl fmt::Display for UnknownTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown template '{}'. Expected one of: classic, modern, twocolumn, creative",
            self.0
        )
    }
}

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTemplate(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_ids() {
        assert_eq!("classic".parse::<TemplateId>().unwrap(), TemplateId::Classic);
        assert_eq!("TwoColumn".parse::<TemplateId>().unwrap(), TemplateId::TwoColumn);
    }

    #[test]
    fn test_parse_unknown_id_fails() {
        let err = "fancy".parse::<TemplateId>().unwrap_err();
        assert!(err.to_string().contains("fancy"));
    }

    #[test]
    fn test_serde_ids_match_as_str() {
        for id in TemplateId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_default_is_classic() {
        assert_eq!(TemplateId::default(), TemplateId::Classic);
        assert_eq!(TemplateId::Classic.display_name(), "Classic Professional");
    }
}
