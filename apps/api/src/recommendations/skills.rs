//! Skill extraction — turns free-text skill fields into normalized token sets.
//!
//! Skills appear in several places (dedicated skill rows, the legacy
//! comma-separated `skills_text`, project technology lists, experience
//! descriptions); the match scorer works on the union of all of them.

use std::collections::BTreeSet;

use crate::models::job::JobRow;
use crate::models::profile::{ProfileRow, ProjectRow, SkillRow, WorkExperienceRow};

/// Normalizes a skill name for comparison.
pub fn normalize_skill(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Extracts skill tokens from free text. Splits on commas, semicolons, and
/// newlines; blank tokens are dropped.
pub fn extract_skills_from_text(text: &str) -> Vec<String> {
    text.split(|c| matches!(c, ',' | ';' | '\n'))
        .map(normalize_skill)
        .filter(|s| !s.is_empty())
        .collect()
}

/// All skills attributable to a candidate: skill rows, the skills_text
/// field, project technologies, and work-experience descriptions.
pub fn candidate_skill_set(
    profile: &ProfileRow,
    skills: &[SkillRow],
    projects: &[ProjectRow],
    experience: &[WorkExperienceRow],
) -> BTreeSet<String> {
    let mut set = BTreeSet::new();

    for skill in skills {
        set.insert(normalize_skill(&skill.name));
    }
    set.extend(extract_skills_from_text(&profile.skills_text));
    for project in projects {
        set.extend(extract_skills_from_text(&project.technologies));
    }
    for exp in experience {
        set.extend(extract_skills_from_text(&exp.description));
    }

    set
}

/// Skills demanded by a job: the skills_required field plus tokens pulled
/// from the requirements and description text.
pub fn job_skill_set(job: &JobRow) -> BTreeSet<String> {
    let mut set = BTreeSet::new();
    set.extend(extract_skills_from_text(&job.skills_required));
    set.extend(extract_skills_from_text(&job.requirements));
    set.extend(extract_skills_from_text(&job.description));
    set
}

/// Whether a candidate carries any skill signal at all. Profiles with no
/// skill rows and an empty skills_text are skipped by the generator.
pub fn has_skill_signal(profile: &ProfileRow, skills: &[SkillRow]) -> bool {
    !skills.is_empty() || !profile.skills_text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_profile(skills_text: &str) -> ProfileRow {
        ProfileRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_type: "regular".to_string(),
            headline: String::new(),
            bio: String::new(),
            phone: String::new(),
            location: String::new(),
            linkedin_url: String::new(),
            github_url: String::new(),
            portfolio_url: String::new(),
            skills_text: skills_text.to_string(),
            projects_text: String::new(),
            profile_visibility: "recruiters".to_string(),
            show_contact_info: true,
            show_skills: true,
            show_education: true,
            show_experience: true,
            show_links: true,
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn make_skill(profile_id: Uuid, name: &str) -> SkillRow {
        SkillRow {
            id: Uuid::new_v4(),
            profile_id,
            name: name.to_string(),
            proficiency_level: "intermediate".to_string(),
        }
    }

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize_skill("  Python  "), "python");
    }

    #[test]
    fn test_extract_splits_on_comma_semicolon_newline() {
        let tokens = extract_skills_from_text("Python, SQL; Docker\nKubernetes");
        assert_eq!(tokens, vec!["python", "sql", "docker", "kubernetes"]);
    }

    #[test]
    fn test_extract_drops_blank_tokens() {
        let tokens = extract_skills_from_text("rust,, ,go");
        assert_eq!(tokens, vec!["rust", "go"]);
    }

    #[test]
    fn test_extract_empty_text() {
        assert!(extract_skills_from_text("").is_empty());
    }

    #[test]
    fn test_candidate_set_unions_all_sources() {
        let profile = make_profile("SQL, Redis");
        let skills = vec![make_skill(profile.id, "Python")];
        let projects = vec![ProjectRow {
            id: Uuid::new_v4(),
            profile_id: profile.id,
            title: "ETL pipeline".to_string(),
            description: String::new(),
            technologies: "Airflow, python".to_string(),
            start_date: None,
            end_date: None,
            project_url: String::new(),
            is_featured: false,
        }];
        let set = candidate_skill_set(&profile, &skills, &projects, &[]);
        let expected: BTreeSet<String> = ["python", "sql", "redis", "airflow"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_skill_signal_from_rows_or_text() {
        let bare = make_profile("");
        assert!(!has_skill_signal(&bare, &[]));
        assert!(has_skill_signal(&bare, &[make_skill(bare.id, "rust")]));
        let texty = make_profile("rust");
        assert!(has_skill_signal(&texty, &[]));
    }
}
