use serde::Serialize;

use crate::render::font_metrics::FontFamily;
use crate::templates::document::{Placement, SectionKind};
use crate::templates::TemplateId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// Centered name over a rule.
    Centered,
    /// Left-aligned name with a thin accent rule.
    Left,
    /// Name on a full-width dark band.
    Band,
}

#[derive(Debug, Clone, Copy)]
pub struct SidebarStyle {
    pub width_pt: f32,
    pub background: &'static str,
    pub text: &'static str,
    pub sections: &'static [SectionKind],
}

/// Visual arrangement of a template. Consumed by the SVG painter.
#[derive(Debug, Clone, Copy)]
pub struct TemplateStyle {
    pub body_font: FontFamily,
    pub heading_font: FontFamily,
    pub accent: &'static str,
    pub muted: &'static str,
    pub header: HeaderStyle,
    pub uppercase_headings: bool,
    pub heading_rule: bool,
    /// Solid bar drawn left of each heading.
    pub heading_marker: bool,
    pub skills_as_chips: bool,
    /// Dots and a vertical line next to experience-like items.
    pub timeline: bool,
    pub sidebar: Option<SidebarStyle>,
}

#[derive(Debug, Serialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: &'static str,
    pub description: &'static str,
    /// Heading per section, indexed like `SectionKind::ORDER`.
    #[serde(skip)]
    pub headings: [&'static str; 6],
    #[serde(skip)]
    pub style: TemplateStyle,
}

impl Template {
    pub fn heading(&self, kind: SectionKind) -> &'static str {
        let index = SectionKind::ORDER
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        self.headings[index]
    }

    pub fn placement(&self, kind: SectionKind) -> Placement {
        match self.style.sidebar {
            Some(sidebar) if sidebar.sections.contains(&kind) => Placement::Sidebar,
            _ => Placement::Main,
        }
    }
}

pub static CLASSIC: Template = Template {
    id: TemplateId::Classic,
    name: "Classic Professional",
    description: "Traditional format with clean lines and professional styling",
    headings: [
        "Professional Summary",
        "Skills",
        "Professional Experience",
        "Education",
        "Hackathons & Projects",
        "Achievements",
    ],
    style: TemplateStyle {
        body_font: FontFamily::Serif,
        heading_font: FontFamily::Serif,
        accent: "#1f2937",
        muted: "#4b5563",
        header: HeaderStyle::Centered,
        uppercase_headings: true,
        heading_rule: true,
        heading_marker: false,
        skills_as_chips: true,
        timeline: false,
        sidebar: None,
    },
};

pub static MODERN: Template = Template {
    id: TemplateId::Modern,
    name: "Modern Minimal",
    description: "Sleek and contemporary design with timeline elements",
    headings: [
        "About",
        "Skills",
        "Experience",
        "Education",
        "Projects",
        "Achievements",
    ],
    style: TemplateStyle {
        body_font: FontFamily::Sans,
        heading_font: FontFamily::Sans,
        accent: "#111827",
        muted: "#6b7280",
        header: HeaderStyle::Left,
        uppercase_headings: true,
        heading_rule: false,
        heading_marker: false,
        skills_as_chips: false,
        timeline: true,
        sidebar: None,
    },
};

pub static TWO_COLUMN: Template = Template {
    id: TemplateId::TwoColumn,
    name: "Two Column",
    description: "Efficient layout with sidebar for contact and skills",
    headings: [
        "Profile",
        "Skills",
        "Experience",
        "Education",
        "Projects",
        "Achievements",
    ],
    style: TemplateStyle {
        body_font: FontFamily::Sans,
        heading_font: FontFamily::Sans,
        accent: "#111827",
        muted: "#4b5563",
        header: HeaderStyle::Left,
        uppercase_headings: false,
        heading_rule: true,
        heading_marker: false,
        skills_as_chips: false,
        timeline: false,
        sidebar: Some(SidebarStyle {
            width_pt: 190.0,
            background: "#1f2937",
            text: "#f9fafb",
            sections: &[SectionKind::Skills, SectionKind::Education],
        }),
    },
};

pub static CREATIVE: Template = Template {
    id: TemplateId::Creative,
    name: "Creative Bold",
    description: "Eye-catching design with bold typography and accents",
    headings: [
        "ABOUT ME",
        "SKILLS",
        "EXPERIENCE",
        "EDUCATION",
        "PROJECTS",
        "ACHIEVEMENTS",
    ],
    style: TemplateStyle {
        body_font: FontFamily::Sans,
        heading_font: FontFamily::Display,
        accent: "#111827",
        muted: "#374151",
        header: HeaderStyle::Band,
        uppercase_headings: true,
        heading_rule: false,
        heading_marker: true,
        skills_as_chips: true,
        timeline: false,
        sidebar: None,
    },
};
