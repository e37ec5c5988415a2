//! 成绩相关的实体与纯计算函数

use serde::Serialize;

// 单门课程的成绩行
#[derive(Debug, Clone, Serialize)]
pub struct GradeRow {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub course_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub grade_point: Option<f64>,
    pub grade_letter: Option<String>,
    pub remarks: Option<String>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
}

// GPA 汇总
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GpaSummary {
    pub gpa: f64,
    pub total_credits: i64,
    pub graded_courses: u64,
}

/// 等级到绩点的换算
pub fn letter_to_point(letter: &str) -> Option<f64> {
    let point = match letter.trim().to_ascii_uppercase().as_str() {
        "A+" | "A" => 4.0,
        "A-" => 3.7,
        "B+" => 3.3,
        "B" => 3.0,
        "B-" => 2.7,
        "C+" => 2.3,
        "C" => 2.0,
        "C-" => 1.7,
        "D+" => 1.3,
        "D" => 1.0,
        "F" => 0.0,
        _ => return None,
    };
    Some(point)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 按学分加权计算 GPA，未评分课程不计入分子和分母
pub fn compute_gpa<I>(courses: I) -> GpaSummary
where
    I: IntoIterator<Item = (i32, Option<f64>)>,
{
    let mut weighted = 0.0;
    let mut total_credits: i64 = 0;
    let mut graded_courses = 0;

    for (credits, grade_point) in courses {
        if let Some(point) = grade_point {
            weighted += credits as f64 * point;
            total_credits += credits as i64;
            graded_courses += 1;
        }
    }

    let gpa = if total_credits > 0 {
        round2(weighted / total_credits as f64)
    } else {
        0.0
    };

    GpaSummary {
        gpa,
        total_credits,
        graded_courses,
    }
}

// 成绩分布
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct GradeDistribution {
    #[serde(rename = "A")]
    pub a: u64,
    #[serde(rename = "B")]
    pub b: u64,
    #[serde(rename = "C")]
    pub c: u64,
    #[serde(rename = "D")]
    pub d: u64,
    #[serde(rename = "F")]
    pub f: u64,
    #[serde(rename = "Not Graded")]
    pub not_graded: u64,
}

/// 按等级首字母统计分布，其余情况计为未评分
pub fn grade_distribution<'a, I>(letters: I) -> GradeDistribution
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut dist = GradeDistribution::default();
    for letter in letters {
        let first = letter
            .and_then(|l| l.trim().chars().next())
            .map(|c| c.to_ascii_uppercase());
        match first {
            Some('A') => dist.a += 1,
            Some('B') => dist.b += 1,
            Some('C') => dist.c += 1,
            Some('D') => dist.d += 1,
            Some('F') => dist.f += 1,
            _ => dist.not_graded += 1,
        }
    }
    dist
}

// 单个作业的得分明细
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentScore {
    pub assignment_id: i64,
    pub title: String,
    pub total_marks: f64,
    pub weightage: f64,
    pub score: Option<f64>,
    pub status: Option<String>,
    pub percentage: Option<f64>,
    pub weighted: Option<f64>,
}

impl AssignmentScore {
    /// 按得分计算百分比与加权贡献
    pub fn compute(
        assignment_id: i64,
        title: String,
        total_marks: f64,
        weightage: f64,
        score: Option<f64>,
        status: Option<String>,
    ) -> Self {
        let percentage = match score {
            Some(s) if total_marks > 0.0 => Some(round2(s / total_marks * 100.0)),
            _ => None,
        };
        let weighted = percentage.map(|p| round2(p * weightage / 100.0));
        Self {
            assignment_id,
            title,
            total_marks,
            weightage,
            score,
            status,
            percentage,
            weighted,
        }
    }
}

/// 加权贡献总和，权重之和不做校验
pub fn total_weighted(scores: &[AssignmentScore]) -> f64 {
    round2(scores.iter().filter_map(|s| s.weighted).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpa_excludes_ungraded() {
        let summary = compute_gpa(vec![(3, Some(4.0)), (4, Some(3.0)), (2, None)]);
        assert_eq!(summary.gpa, 3.43);
        assert_eq!(summary.total_credits, 7);
        assert_eq!(summary.graded_courses, 2);
    }

    #[test]
    fn test_gpa_without_graded_courses() {
        let summary = compute_gpa(vec![(3, None)]);
        assert_eq!(summary.gpa, 0.0);
        assert_eq!(summary.total_credits, 0);
        assert_eq!(summary.graded_courses, 0);
    }

    #[test]
    fn test_distribution_by_first_letter() {
        let dist = grade_distribution(vec![
            Some("A+"),
            Some("A-"),
            Some("B"),
            Some("F"),
            Some("E"),
            None,
            Some(""),
        ]);
        assert_eq!(dist.a, 2);
        assert_eq!(dist.b, 1);
        assert_eq!(dist.f, 1);
        assert_eq!(dist.not_graded, 3);
    }

    #[test]
    fn test_distribution_serializes_letter_keys() {
        let json = serde_json::to_value(grade_distribution(vec![Some("C")])).unwrap();
        assert_eq!(json["C"], 1);
        assert_eq!(json["Not Graded"], 0);
    }

    #[test]
    fn test_letter_scale() {
        assert_eq!(letter_to_point("A+"), Some(4.0));
        assert_eq!(letter_to_point("b-"), Some(2.7));
        assert_eq!(letter_to_point("F"), Some(0.0));
        assert_eq!(letter_to_point("E"), None);
    }

    #[test]
    fn test_weighted_contribution() {
        let scores = vec![
            AssignmentScore::compute(1, "HW1".into(), 50.0, 20.0, Some(40.0), None),
            AssignmentScore::compute(2, "HW2".into(), 100.0, 30.0, Some(90.0), None),
            AssignmentScore::compute(3, "HW3".into(), 10.0, 50.0, None, None),
        ];
        assert_eq!(scores[0].percentage, Some(80.0));
        assert_eq!(scores[0].weighted, Some(16.0));
        assert_eq!(scores[1].weighted, Some(27.0));
        assert_eq!(scores[2].weighted, None);
        assert_eq!(total_weighted(&scores), 43.0);
    }
}
