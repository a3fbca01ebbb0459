//! Profile privacy rules: who may view a profile, and which sections a
//! non-owner viewer gets to see.

use crate::models::profile::ProfileRow;

pub const VISIBILITY_CHOICES: &[&str] = &["public", "recruiters", "private"];

/// Whether `viewer` may see `target` at all.
/// Owners and admins always can; `private` hides from everyone else;
/// `recruiters` requires a recruiter profile; `public` is open.
pub fn can_view_profile(viewer: Option<&ProfileRow>, target: &ProfileRow) -> bool {
    if let Some(viewer) = viewer {
        if viewer.user_id == target.user_id || viewer.is_admin() {
            return true;
        }
    }
    match target.profile_visibility.as_str() {
        "public" => true,
        "private" => false,
        "recruiters" => viewer.is_some_and(|v| v.is_recruiter() || v.is_admin()),
        _ => false,
    }
}

/// Which sections of a profile a viewer may see. Owners see everything;
/// other viewers are subject to the per-section flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionVisibility {
    pub contact_info: bool,
    pub skills: bool,
    pub education: bool,
    pub experience: bool,
    pub links: bool,
}

pub fn section_visibility(is_owner: bool, target: &ProfileRow) -> SectionVisibility {
    SectionVisibility {
        contact_info: target.show_contact_info || is_owner,
        skills: target.show_skills || is_owner,
        education: target.show_education || is_owner,
        experience: target.show_experience || is_owner,
        links: target.show_links || is_owner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_profile(user_type: &str, visibility: &str) -> ProfileRow {
        ProfileRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_type: user_type.to_string(),
            headline: String::new(),
            bio: String::new(),
            phone: String::new(),
            location: String::new(),
            linkedin_url: String::new(),
            github_url: String::new(),
            portfolio_url: String::new(),
            skills_text: String::new(),
            projects_text: String::new(),
            profile_visibility: visibility.to_string(),
            show_contact_info: true,
            show_skills: true,
            show_education: false,
            show_experience: true,
            show_links: true,
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_always_sees_own_profile() {
        let target = make_profile("regular", "private");
        let mut viewer = make_profile("regular", "private");
        viewer.user_id = target.user_id;
        assert!(can_view_profile(Some(&viewer), &target));
    }

    #[test]
    fn test_private_hidden_from_everyone_but_admins() {
        let target = make_profile("regular", "private");
        let recruiter = make_profile("recruiter", "public");
        let admin = make_profile("admin", "public");
        assert!(!can_view_profile(Some(&recruiter), &target));
        assert!(!can_view_profile(None, &target));
        assert!(can_view_profile(Some(&admin), &target));
    }

    #[test]
    fn test_public_visible_to_all() {
        let target = make_profile("regular", "public");
        let seeker = make_profile("regular", "public");
        assert!(can_view_profile(Some(&seeker), &target));
        assert!(can_view_profile(None, &target));
    }

    #[test]
    fn test_recruiters_only_requires_recruiter_or_admin() {
        let target = make_profile("regular", "recruiters");
        let seeker = make_profile("regular", "public");
        let recruiter = make_profile("recruiter", "public");
        let admin = make_profile("admin", "public");
        assert!(!can_view_profile(Some(&seeker), &target));
        assert!(can_view_profile(Some(&recruiter), &target));
        assert!(can_view_profile(Some(&admin), &target));
        assert!(!can_view_profile(None, &target));
    }

    #[test]
    fn test_unknown_visibility_denies() {
        let target = make_profile("regular", "friends-only");
        let recruiter = make_profile("recruiter", "public");
        assert!(!can_view_profile(Some(&recruiter), &target));
    }

    #[test]
    fn test_section_flags_apply_to_non_owners_only() {
        let target = make_profile("regular", "public");
        let for_viewer = section_visibility(false, &target);
        assert!(!for_viewer.education);
        assert!(for_viewer.skills);
        let for_owner = section_visibility(true, &target);
        assert!(for_owner.education);
    }
}
