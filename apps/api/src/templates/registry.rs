//! Resolves a template id and builds the document a template displays.
//!
//! Section content is derived once from the profile, identically for every
//! template. A section is emitted only when its backing field or list is
//! non-empty; the header block is always present.

use crate::profile::model::{date_range, Profile};
use crate::templates::catalog::{Template, CLASSIC, CREATIVE, MODERN, TWO_COLUMN};
use crate::templates::document::{
    HeaderBlock, RenderedDocument, Section, SectionItem, SectionKind,
};
use crate::templates::TemplateId;

pub fn resolve(id: TemplateId) -> &'static Template {
    match id {
        TemplateId::Classic => &CLASSIC,
        TemplateId::Modern => &MODERN,
        TemplateId::TwoColumn => &TWO_COLUMN,
        TemplateId::Creative => &CREATIVE,
    }
}

pub fn render(id: TemplateId, profile: &Profile) -> RenderedDocument {
    resolve(id).render(profile)
}

impl Template {
    pub fn render(&self, profile: &Profile) -> RenderedDocument {
        let sections = SectionKind::ORDER
            .into_iter()
            .filter_map(|kind| {
                let items = section_items(kind, profile);
                (!items.is_empty()).then(|| Section {
                    kind,
                    heading: self.heading(kind).to_string(),
                    placement: self.placement(kind),
                    items,
                })
            })
            .collect();

        RenderedDocument {
            template: self.id,
            header: header_block(profile),
            sections,
        }
    }
}

fn header_block(profile: &Profile) -> HeaderBlock {
    let info = &profile.basic_info;
    HeaderBlock {
        name: info.name.trim().to_string(),
        title: info.title.trim().to_string(),
        contact: non_blank([&info.email, &info.phone, &info.location]),
        links: profile
            .socials
            .links()
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

fn section_items(kind: SectionKind, profile: &Profile) -> Vec<SectionItem> {
    match kind {
        SectionKind::Summary => {
            if profile.has_summary() {
                vec![SectionItem {
                    body: Some(profile.summary.trim().to_string()),
                    ..Default::default()
                }]
            } else {
                vec![]
            }
        }
        SectionKind::Skills => profile
            .skills
            .iter()
            .map(|s| SectionItem {
                title: s.name.clone(),
                meta: Some(s.proficiency.as_str().to_string()),
                ..Default::default()
            })
            .collect(),
        SectionKind::Experience => profile
            .experience
            .iter()
            .map(|e| SectionItem {
                title: e.role.clone(),
                subtitle: with_location(&e.company, &e.location),
                meta: optional(date_range(&e.start_date, &e.end_date, e.current)),
                body: optional(e.description.trim().to_string()),
                ..Default::default()
            })
            .collect(),
        SectionKind::Education => profile
            .education
            .iter()
            .map(|e| {
                let title = if e.field.trim().is_empty() {
                    e.degree.clone()
                } else {
                    format!("{} in {}", e.degree, e.field)
                };
                let mut details = Vec::new();
                if !e.grade.trim().is_empty() {
                    details.push(format!("Grade: {}", e.grade.trim()));
                }
                SectionItem {
                    title,
                    subtitle: with_location(&e.institution, &e.location),
                    meta: optional(date_range(&e.start_date, &e.end_date, e.current)),
                    body: optional(e.description.trim().to_string()),
                    details,
                    ..Default::default()
                }
            })
            .collect(),
        SectionKind::Projects => profile
            .projects
            .iter()
            .map(|p| {
                let mut details = Vec::new();
                if !p.award.trim().is_empty() {
                    details.push(format!("Award: {}", p.award.trim()));
                }
                if !p.project_link.trim().is_empty() {
                    details.push(p.project_link.trim().to_string());
                }
                SectionItem {
                    title: p.project_name.clone(),
                    subtitle: optional(
                        non_blank([&p.event_name, &p.role]).join(" • "),
                    ),
                    meta: optional(p.date.trim().to_string()),
                    body: optional(p.description.trim().to_string()),
                    details,
                    tags: non_blank(p.technologies.iter()),
                }
            })
            .collect(),
        SectionKind::Achievements => profile
            .achievements
            .iter()
            .map(|a| SectionItem {
                title: a.title.clone(),
                meta: optional(a.date.trim().to_string()),
                body: optional(a.description.trim().to_string()),
                ..Default::default()
            })
            .collect(),
    }
}

fn with_location(primary: &str, location: &str) -> Option<String> {
    optional(non_blank([primary, location]).join(" • "))
}

fn optional(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

fn non_blank<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::model::{Achievement, Education, Experience, Project, Skill};
    use crate::templates::document::Placement;

    fn engineer_at_acme() -> Experience {
        Experience {
            role: "Engineer".to_string(),
            company: "Acme".to_string(),
            start_date: "2020".to_string(),
            end_date: "Present".to_string(),
            ..Default::default()
        }
    }

    fn full_profile() -> Profile {
        let mut p = Profile::default();
        p.basic_info.name = "Ada Lovelace".to_string();
        p.summary = "Analytical engine programmer".to_string();
        p.skills.push(Skill {
            name: "Rust".to_string(),
            ..Default::default()
        });
        p.experience.push(engineer_at_acme());
        p.education.push(Education {
            institution: "University of London".to_string(),
            degree: "BSc".to_string(),
            field: "Mathematics".to_string(),
            grade: "First".to_string(),
            ..Default::default()
        });
        p.projects.push(Project {
            project_name: "Loom".to_string(),
            event_name: "HackLondon".to_string(),
            technologies: vec!["Rust".to_string(), " ".to_string()],
            award: "1st place".to_string(),
            ..Default::default()
        });
        p.achievements.push(Achievement {
            title: "First program".to_string(),
            ..Default::default()
        });
        p
    }

    #[test]
    fn test_empty_profile_renders_header_only_for_every_template() {
        let profile = Profile::default();
        for id in TemplateId::ALL {
            let doc = render(id, &profile);
            assert!(doc.sections.is_empty(), "{id} rendered sections for an empty profile");
            assert_eq!(doc.template, id);
        }
    }

    #[test]
    fn test_full_profile_renders_all_sections_in_fixed_order() {
        let profile = full_profile();
        for id in TemplateId::ALL {
            assert_eq!(render(id, &profile).kinds(), SectionKind::ORDER.to_vec());
        }
    }

    #[test]
    fn test_only_empty_sections_are_omitted() {
        let mut profile = full_profile();
        profile.summary = "   ".to_string();
        profile.education.clear();
        profile.projects.clear();

        for id in TemplateId::ALL {
            assert_eq!(
                render(id, &profile).kinds(),
                vec![
                    SectionKind::Skills,
                    SectionKind::Experience,
                    SectionKind::Achievements
                ]
            );
        }
    }

    #[test]
    fn test_experience_entry_rendered_verbatim_in_every_template() {
        let mut profile = Profile::default();
        profile.experience.push(engineer_at_acme());

        for id in TemplateId::ALL {
            let doc = render(id, &profile);
            let section = doc.section(SectionKind::Experience).unwrap();
            let item = &section.items[0];
            assert_eq!(item.title, "Engineer");
            assert_eq!(item.subtitle.as_deref(), Some("Acme"));
            assert_eq!(item.meta.as_deref(), Some("2020 - Present"));
        }
    }

    #[test]
    fn test_headings_differ_between_templates() {
        let profile = full_profile();
        let classic = render(TemplateId::Classic, &profile);
        let modern = render(TemplateId::Modern, &profile);
        assert_eq!(
            classic.section(SectionKind::Experience).unwrap().heading,
            "Professional Experience"
        );
        assert_eq!(
            modern.section(SectionKind::Experience).unwrap().heading,
            "Experience"
        );
    }

    #[test]
    fn test_two_column_places_skills_and_education_in_sidebar() {
        let doc = render(TemplateId::TwoColumn, &full_profile());
        let sidebar: Vec<_> = doc.placed(Placement::Sidebar).map(|s| s.kind).collect();
        assert_eq!(sidebar, vec![SectionKind::Skills, SectionKind::Education]);
    }

    #[test]
    fn test_project_details_and_blank_tags() {
        let doc = render(TemplateId::Classic, &full_profile());
        let item = &doc.section(SectionKind::Projects).unwrap().items[0];
        assert_eq!(item.subtitle.as_deref(), Some("HackLondon"));
        assert_eq!(item.details, vec!["Award: 1st place".to_string()]);
        assert_eq!(item.tags, vec!["Rust".to_string()]);
    }

    #[test]
    fn test_education_title_and_grade() {
        let doc = render(TemplateId::Modern, &full_profile());
        let item = &doc.section(SectionKind::Education).unwrap().items[0];
        assert_eq!(item.title, "BSc in Mathematics");
        assert_eq!(item.details, vec!["Grade: First".to_string()]);
    }

    #[test]
    fn test_header_collects_non_blank_contact() {
        let mut profile = Profile::default();
        profile.basic_info.email = "ada@example.com".to_string();
        profile.basic_info.location = "London".to_string();
        let doc = render(TemplateId::Creative, &profile);
        assert_eq!(
            doc.header.contact,
            vec!["ada@example.com".to_string(), "London".to_string()]
        );
    }
}
