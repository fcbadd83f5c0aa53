//! Template-independent document model produced by every template.

use serde::Serialize;

use crate::templates::TemplateId;

/// Optional body sections, in the only order a document may contain them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
    Achievements,
}

impl SectionKind {
    pub const ORDER: [SectionKind; 6] = [
        SectionKind::Summary,
        SectionKind::Skills,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Projects,
        SectionKind::Achievements,
    ];
}

/// Name, title and contact block. Always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderBlock {
    pub name: String,
    pub title: String,
    pub contact: Vec<String>,
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Date or date range, shown right-aligned by most templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    #[default]
    Main,
    Sidebar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub heading: String,
    pub placement: Placement,
    pub items: Vec<SectionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    pub template: TemplateId,
    pub header: HeaderBlock,
    pub sections: Vec<Section>,
}

impl RenderedDocument {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }

    pub fn placed(&self, placement: Placement) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(move |s| s.placement == placement)
    }
}
