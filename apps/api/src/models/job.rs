use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const EMPLOYMENT_TYPES: &[&str] = &[
    "full-time",
    "part-time",
    "contract",
    "internship",
    "freelance",
];

pub const EXPERIENCE_LEVELS: &[&str] = &["entry", "mid", "senior", "executive"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub employment_type: String,
    pub experience_level: String,
    pub description: String,
    pub requirements: String,
    pub benefits: String,
    pub skills_required: String,
    pub is_remote: bool,
    pub visa_sponsorship: bool,
    pub posted_by: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRow {
    /// Human-readable salary range, e.g. "$80,000 - $120,000".
    pub fn salary_range(&self) -> String {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => {
                format!("${} - ${}", format_thousands(min), format_thousands(max))
            }
            (Some(min), None) => format!("${}+", format_thousands(min)),
            (None, Some(max)) => format!("Up to ${}", format_thousands(max)),
            (None, None) => "Salary not specified".to_string(),
        }
    }

    /// The comma-separated `skills_required` field as a trimmed list.
    pub fn skills_list(&self) -> Vec<String> {
        self.skills_required
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn format_thousands(n: i32) -> String {
    let digits = n.abs().to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_job(min: Option<i32>, max: Option<i32>, skills: &str) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            company_name: "Acme".to_string(),
            location: "Atlanta, GA".to_string(),
            latitude: None,
            longitude: None,
            salary_min: min,
            salary_max: max,
            employment_type: "full-time".to_string(),
            experience_level: "mid".to_string(),
            description: String::new(),
            requirements: String::new(),
            benefits: String::new(),
            skills_required: skills.to_string(),
            is_remote: false,
            visa_sponsorship: false,
            posted_by: Uuid::new_v4(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_salary_range_both_bounds() {
        let job = make_job(Some(80_000), Some(120_000), "");
        assert_eq!(job.salary_range(), "$80,000 - $120,000");
    }

    #[test]
    fn test_salary_range_min_only() {
        let job = make_job(Some(95_500), None, "");
        assert_eq!(job.salary_range(), "$95,500+");
    }

    #[test]
    fn test_salary_range_max_only() {
        let job = make_job(None, Some(60_000), "");
        assert_eq!(job.salary_range(), "Up to $60,000");
    }

    #[test]
    fn test_salary_range_unspecified() {
        let job = make_job(None, None, "");
        assert_eq!(job.salary_range(), "Salary not specified");
    }

    #[test]
    fn test_skills_list_trims_and_drops_blanks() {
        let job = make_job(None, None, " python , rust,, sql ");
        assert_eq!(job.skills_list(), vec!["python", "rust", "sql"]);
    }

    #[test]
    fn test_skills_list_empty_field() {
        let job = make_job(None, None, "");
        assert!(job.skills_list().is_empty());
    }
}
