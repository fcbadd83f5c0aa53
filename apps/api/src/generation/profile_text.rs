//! Plain-text renderings sent to the match scorer.

use crate::profile::model::{date_range, Profile};

/// Serializes a profile into the fixed plain-text layout the scorer reads.
/// The projects block is present only when there are projects.
pub fn profile_text(profile: &Profile) -> String {
    let info = &profile.basic_info;
    let mut out = format!(
        "Name: {}\nTitle: {}\nEmail: {}\nLocation: {}\n\nSummary: {}\n\n",
        info.name, info.title, info.email, info.location, profile.summary
    );

    let skills: Vec<String> = profile
        .skills
        .iter()
        .map(|s| format!("{} ({})", s.name, s.proficiency.as_str()))
        .collect();
    out.push_str(&format!("Skills: {}\n\nExperience:\n", skills.join(", ")));

    for exp in &profile.experience {
        out.push_str(&format!(
            "  {} at {}\n  {}\n  {}\n\n",
            exp.role,
            exp.company,
            date_range(&exp.start_date, &exp.end_date, exp.current),
            exp.description
        ));
    }

    out.push_str("Education:\n");
    for edu in &profile.education {
        out.push_str(&format!(
            "  {} in {} from {}\n  {}\n  Grade: {}\n\n",
            edu.degree,
            edu.field,
            edu.institution,
            date_range(&edu.start_date, &edu.end_date, edu.current),
            edu.grade
        ));
    }

    out.push_str("Achievements:\n");
    for ach in &profile.achievements {
        out.push_str(&format!("- {}: {}\n", ach.title, ach.description));
    }

    if !profile.projects.is_empty() {
        out.push_str("\nHackathons & Projects:\n");
        for p in &profile.projects {
            out.push_str(&format!(
                "  {} - {}\n  Technologies: {}\n",
                p.project_name,
                p.event_name,
                p.technologies.join(", ")
            ));
            if !p.award.trim().is_empty() {
                out.push_str(&format!("  Award: {}\n", p.award));
            }
            out.push('\n');
        }
    }

    out.trim().to_string()
}

/// `"{title} at {company}\n\n{description}"`
pub fn job_text(title: &str, company: &str, description: &str) -> String {
    format!("{title} at {company}\n\n{description}")
}
