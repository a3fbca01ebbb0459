//! Match scoring — skills/experience/location sub-scores and the weighted
//! overall score. All sub-scores are on a 0–100 scale.
//!
//! Weights: skills 50%, experience 30%, location 20%.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::profile::WorkExperienceRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.5,
            experience: 0.3,
            location: 0.2,
        }
    }
}

/// The full score breakdown for one candidate against one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
    pub overall: f64,
}

/// Skills dimension: fraction of the job's demanded skills covered by the
/// candidate, as a percentage. Empty sets on either side score 0.
pub fn skills_match(job_skills: &BTreeSet<String>, candidate_skills: &BTreeSet<String>) -> f64 {
    if job_skills.is_empty() || candidate_skills.is_empty() {
        return 0.0;
    }
    let matched = job_skills.intersection(candidate_skills).count();
    let pct = (matched as f64 / job_skills.len() as f64) * 100.0;
    pct.min(100.0)
}

/// Maps a job's experience_level string to a 1–4 rank. Unknown → mid.
pub fn experience_level_rank(level: &str) -> i32 {
    match level {
        "entry" => 1,
        "mid" => 2,
        "senior" => 3,
        "executive" => 4,
        _ => 2,
    }
}

/// Total years across all work-experience entries; open-ended entries count
/// up to `today`.
pub fn total_experience_years(experience: &[WorkExperienceRow], today: NaiveDate) -> f64 {
    experience
        .iter()
        .map(|exp| {
            let end = exp.end_date.unwrap_or(today);
            (end - exp.start_date).num_days() as f64 / 365.25
        })
        .sum::<f64>()
        .max(0.0)
}

/// Buckets total years into a 1–4 seniority rank.
pub fn rank_from_years(years: f64) -> i32 {
    if years < 2.0 {
        1
    } else if years < 5.0 {
        2
    } else if years < 10.0 {
        3
    } else {
        4
    }
}

/// Experience dimension: scored by distance between the job's rank and the
/// candidate's rank.
pub fn experience_match(job_rank: i32, candidate_rank: i32) -> f64 {
    match (job_rank - candidate_rank).abs() {
        0 => 100.0,
        1 => 75.0,
        2 => 50.0,
        _ => 25.0,
    }
}

/// Location dimension. Remote jobs always match; missing data is neutral;
/// otherwise compare "city, state" segments.
pub fn location_match(job_is_remote: bool, job_location: &str, candidate_location: &str) -> f64 {
    if job_is_remote {
        return 100.0;
    }

    let job_loc = job_location.trim().to_lowercase();
    let cand_loc = candidate_location.trim().to_lowercase();
    if job_loc.is_empty() || cand_loc.is_empty() {
        return 50.0;
    }
    if job_loc == cand_loc {
        return 100.0;
    }

    let job_parts: Vec<&str> = job_loc.split(',').map(str::trim).collect();
    let cand_parts: Vec<&str> = cand_loc.split(',').map(str::trim).collect();

    // City match
    if !job_parts.is_empty() && !cand_parts.is_empty() && job_parts[0] == cand_parts[0] {
        return 80.0;
    }
    // State/region match
    if job_parts.len() > 1 && cand_parts.len() > 1 && job_parts[1] == cand_parts[1] {
        return 60.0;
    }
    // Candidate open to remote work
    if cand_loc.contains("remote") {
        return 70.0;
    }

    30.0
}

/// Weighted overall score, rounded to two decimals.
pub fn overall_match(skills: f64, experience: f64, location: f64, weights: &ScoringWeights) -> f64 {
    let raw = skills * weights.skills + experience * weights.experience + location * weights.location;
    (raw * 100.0).round() / 100.0
}

/// Computes the full breakdown for a candidate against a job.
pub fn score_candidate(
    job_skills: &BTreeSet<String>,
    job_experience_level: &str,
    job_is_remote: bool,
    job_location: &str,
    candidate_skills: &BTreeSet<String>,
    candidate_experience: &[WorkExperienceRow],
    candidate_location: &str,
    today: NaiveDate,
) -> MatchBreakdown {
    let weights = ScoringWeights::default();
    let skills = skills_match(job_skills, candidate_skills);
    let experience = experience_match(
        experience_level_rank(job_experience_level),
        rank_from_years(total_experience_years(candidate_experience, today)),
    );
    let location = location_match(job_is_remote, job_location, candidate_location);
    MatchBreakdown {
        skills,
        experience,
        location,
        overall: overall_match(skills, experience, location, &weights),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn skill_set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn make_experience(start: (i32, u32, u32), end: Option<(i32, u32, u32)>) -> WorkExperienceRow {
        WorkExperienceRow {
            id: Uuid::new_v4(),
            profile_id: Uuid::new_v4(),
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            location: String::new(),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: end.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            description: String::new(),
            is_current: end.is_none(),
        }
    }

    #[test]
    fn test_skills_match_half_covered() {
        let job = skill_set(&["python", "sql", "docker", "rust"]);
        let cand = skill_set(&["python", "sql"]);
        assert!((skills_match(&job, &cand) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_skills_match_empty_either_side_is_zero() {
        let filled = skill_set(&["python"]);
        assert_eq!(skills_match(&BTreeSet::new(), &filled), 0.0);
        assert_eq!(skills_match(&filled, &BTreeSet::new()), 0.0);
    }

    #[test]
    fn test_skills_match_full_coverage_capped_at_100() {
        let job = skill_set(&["python"]);
        let cand = skill_set(&["python", "sql", "rust"]);
        assert_eq!(skills_match(&job, &cand), 100.0);
    }

    #[test]
    fn test_experience_rank_unknown_defaults_to_mid() {
        assert_eq!(experience_level_rank("mystery"), 2);
        assert_eq!(experience_level_rank("senior"), 3);
    }

    #[test]
    fn test_years_bucket_boundaries() {
        assert_eq!(rank_from_years(1.9), 1);
        assert_eq!(rank_from_years(2.0), 2);
        assert_eq!(rank_from_years(4.9), 2);
        assert_eq!(rank_from_years(5.0), 3);
        assert_eq!(rank_from_years(12.0), 4);
    }

    #[test]
    fn test_total_years_open_ended_counts_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let exp = vec![make_experience((2021, 1, 1), None)];
        let years = total_experience_years(&exp, today);
        assert!((years - 3.0).abs() < 0.05, "years was {years}");
    }

    #[test]
    fn test_total_years_sums_entries() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let exp = vec![
            make_experience((2015, 1, 1), Some((2018, 1, 1))),
            make_experience((2019, 1, 1), Some((2022, 1, 1))),
        ];
        let years = total_experience_years(&exp, today);
        assert!((years - 6.0).abs() < 0.05, "years was {years}");
    }

    #[test]
    fn test_experience_match_distance_ladder() {
        assert_eq!(experience_match(2, 2), 100.0);
        assert_eq!(experience_match(3, 2), 75.0);
        assert_eq!(experience_match(4, 2), 50.0);
        assert_eq!(experience_match(4, 1), 25.0);
    }

    #[test]
    fn test_location_remote_job_always_matches() {
        assert_eq!(location_match(true, "Atlanta, GA", "Lagos"), 100.0);
    }

    #[test]
    fn test_location_missing_info_is_neutral() {
        assert_eq!(location_match(false, "", "Atlanta, GA"), 50.0);
        assert_eq!(location_match(false, "Atlanta, GA", ""), 50.0);
    }

    #[test]
    fn test_location_exact_match() {
        assert_eq!(location_match(false, " Atlanta, GA ", "atlanta, ga"), 100.0);
    }

    #[test]
    fn test_location_city_match() {
        assert_eq!(location_match(false, "Atlanta, GA", "Atlanta, Georgia"), 80.0);
    }

    #[test]
    fn test_location_state_match() {
        assert_eq!(location_match(false, "Atlanta, GA", "Savannah, GA"), 60.0);
    }

    #[test]
    fn test_location_candidate_remote() {
        assert_eq!(location_match(false, "Atlanta, GA", "Remote"), 70.0);
    }

    #[test]
    fn test_location_no_overlap() {
        assert_eq!(location_match(false, "Atlanta, GA", "Portland, OR"), 30.0);
    }

    #[test]
    fn test_overall_weighted_sum() {
        // 0.5*80 + 0.3*75 + 0.2*60 = 40 + 22.5 + 12 = 74.5
        let score = overall_match(80.0, 75.0, 60.0, &ScoringWeights::default());
        assert!((score - 74.5).abs() < f64::EPSILON, "score was {score}");
    }

    #[test]
    fn test_overall_rounds_to_two_decimals() {
        let score = overall_match(33.333, 33.333, 33.333, &ScoringWeights::default());
        assert!((score - 33.33).abs() < 0.001, "score was {score}");
    }

    #[test]
    fn test_score_candidate_breakdown() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let job_skills = skill_set(&["rust", "sql"]);
        let cand_skills = skill_set(&["rust"]);
        // ~6 years → rank 3, matches a senior job exactly.
        let experience = vec![make_experience((2018, 6, 1), None)];

        let breakdown = score_candidate(
            &job_skills,
            "senior",
            false,
            "Atlanta, GA",
            &cand_skills,
            &experience,
            "Atlanta, GA",
            today,
        );
        assert_eq!(breakdown.skills, 50.0);
        assert_eq!(breakdown.experience, 100.0);
        assert_eq!(breakdown.location, 100.0);
        // 0.5*50 + 0.3*100 + 0.2*100 = 75
        assert!((breakdown.overall - 75.0).abs() < f64::EPSILON);
    }
}
