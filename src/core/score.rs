use crate::core::present;
use crate::domain::model::{percentage, ScoreInput, SeoIssue, SeoScoreResult, Severity};

pub const MAX_SCORE: u32 = 100;

const TITLE: &str = "Title";
const DESCRIPTION: &str = "Meta Description";
const HEADINGS: &str = "Headings";
const IMAGES: &str = "Images";
const CONTENT: &str = "Content";

/// Awarded points plus the single finding a check produced.
struct CheckOutcome {
    points: u32,
    finding: SeoIssue,
}

impl CheckOutcome {
    fn new(points: u32, finding: SeoIssue) -> Self {
        Self { points, finding }
    }
}

fn check_title(title: Option<&str>) -> CheckOutcome {
    let Some(title) = title else {
        return CheckOutcome::new(
            0,
            SeoIssue::critical(TITLE, "Missing page title")
                .with_recommendation("Add a descriptive title tag (50-60 characters recommended)"),
        );
    };

    match title.chars().count() {
        len if len < 30 => CheckOutcome::new(
            5,
            SeoIssue::warning(TITLE, format!("Title is too short ({} characters)", len))
                .with_recommendation("Aim for 50-60 characters for better SEO"),
        ),
        len if len > 60 => CheckOutcome::new(
            10,
            SeoIssue::warning(TITLE, format!("Title is too long ({} characters)", len))
                .with_recommendation("Keep titles under 60 characters for optimal display"),
        ),
        _ => CheckOutcome::new(20, SeoIssue::info(TITLE, "Title length is optimal")),
    }
}

fn check_description(description: Option<&str>) -> CheckOutcome {
    let Some(description) = description else {
        return CheckOutcome::new(
            0,
            SeoIssue::critical(DESCRIPTION, "Missing meta description").with_recommendation(
                "Add a compelling meta description (150-160 characters recommended)",
            ),
        );
    };

    match description.chars().count() {
        len if len < 120 => CheckOutcome::new(
            10,
            SeoIssue::warning(
                DESCRIPTION,
                format!("Description is too short ({} characters)", len),
            )
            .with_recommendation("Aim for 150-160 characters for better CTR"),
        ),
        len if len > 160 => CheckOutcome::new(
            10,
            SeoIssue::warning(
                DESCRIPTION,
                format!("Description is too long ({} characters)", len),
            )
            .with_recommendation("Keep descriptions under 160 characters to avoid truncation"),
        ),
        _ => CheckOutcome::new(
            20,
            SeoIssue::info(DESCRIPTION, "Meta description length is optimal"),
        ),
    }
}

fn check_headings(input: &ScoreInput) -> CheckOutcome {
    if input.headings.is_empty() {
        return CheckOutcome::new(
            0,
            SeoIssue::warning(HEADINGS, "No headings found")
                .with_recommendation("Use H1-H6 headings to structure your content"),
        );
    }

    match input.headings.iter().filter(|h| h.level == 1).count() {
        0 => CheckOutcome::new(
            0,
            SeoIssue::critical(HEADINGS, "Missing H1 heading")
                .with_recommendation("Every page should have exactly one H1 heading"),
        ),
        1 => CheckOutcome::new(10, SeoIssue::info(HEADINGS, "Proper H1 heading usage")),
        count => CheckOutcome::new(
            5,
            SeoIssue::warning(HEADINGS, format!("Multiple H1 headings found ({})", count))
                .with_recommendation("Use only one H1 heading per page"),
        ),
    }
}

fn check_images(input: &ScoreInput) -> Option<CheckOutcome> {
    if input.images.is_empty() {
        return None;
    }

    let with_alt = input
        .images
        .iter()
        .filter(|img| present(&img.alt).is_some())
        .count();
    let ratio = with_alt as f64 / input.images.len() as f64;

    let outcome = if with_alt == 0 {
        CheckOutcome::new(
            0,
            SeoIssue::warning(IMAGES, "No images have alt text").with_recommendation(
                "Add descriptive alt text to all images for accessibility and SEO",
            ),
        )
    } else if ratio < 0.5 {
        CheckOutcome::new(
            5,
            SeoIssue::warning(IMAGES, "Less than 50% of images have alt text")
                .with_recommendation("Add alt text to remaining images"),
        )
    } else if with_alt < input.images.len() {
        CheckOutcome::new(
            10,
            SeoIssue::warning(
                IMAGES,
                format!("{}% of images have alt text", (ratio * 100.0).round() as u32),
            )
            .with_recommendation("Add alt text to all images for optimal accessibility"),
        )
    } else {
        CheckOutcome::new(15, SeoIssue::info(IMAGES, "All images have alt text"))
    };
    Some(outcome)
}

fn check_content(content: Option<&str>) -> Option<CheckOutcome> {
    let words = content?.split_whitespace().count();

    let outcome = if words < 300 {
        CheckOutcome::new(
            3,
            SeoIssue::warning(CONTENT, format!("Content is too short ({} words)", words))
                .with_recommendation("Aim for at least 300 words for better SEO performance"),
        )
    } else if words >= 1000 {
        CheckOutcome::new(10, SeoIssue::info(CONTENT, "Content length is excellent for SEO"))
    } else {
        CheckOutcome::new(7, SeoIssue::info(CONTENT, "Content length is adequate"))
    };
    Some(outcome)
}

/// Scores a page out of 100 across title, description, headings, image alt
/// text and content length. Each check contributes exactly one finding.
///
/// Whitespace-only title, description and content count as missing, so a
/// title of `" "` is a critical issue worth 0 points rather than a short-title
/// warning.
pub fn calculate_seo_score(input: &ScoreInput) -> SeoScoreResult {
    let outcomes = [
        Some(check_title(present(&input.title))),
        Some(check_description(present(&input.description))),
        Some(check_headings(input)),
        check_images(input),
        check_content(present(&input.content)),
    ];

    let mut score = 0;
    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let mut passes = Vec::new();

    for outcome in outcomes.into_iter().flatten() {
        score += outcome.points;
        match outcome.finding.severity {
            Severity::Critical => issues.push(outcome.finding),
            Severity::Warning => warnings.push(outcome.finding),
            Severity::Info => passes.push(outcome.finding),
        }
    }

    let score = score.min(MAX_SCORE);
    tracing::debug!(
        "SEO score {}/{} ({} issues, {} warnings)",
        score,
        MAX_SCORE,
        issues.len(),
        warnings.len()
    );

    SeoScoreResult {
        score,
        max_score: MAX_SCORE,
        percentage: percentage(score, MAX_SCORE),
        issues,
        warnings,
        passes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Heading, Image};

    fn titled(len: usize) -> ScoreInput {
        ScoreInput {
            title: Some("t".repeat(len)),
            ..Default::default()
        }
    }

    fn title_finding(result: &SeoScoreResult) -> &SeoIssue {
        result.findings().find(|f| f.category == TITLE).unwrap()
    }

    #[test]
    fn test_title_bands() {
        let optimal = calculate_seo_score(&titled(55));
        assert_eq!(title_finding(&optimal).severity, Severity::Info);

        let short = calculate_seo_score(&titled(10));
        assert_eq!(title_finding(&short).message, "Title is too short (10 characters)");

        let long = calculate_seo_score(&titled(61));
        assert_eq!(title_finding(&long).severity, Severity::Warning);

        // Title points on top of the empty-headings warning (0) and missing description (0).
        assert_eq!(optimal.score, 20);
        assert_eq!(short.score, 5);
        assert_eq!(long.score, 10);
    }

    #[test]
    fn test_title_boundaries_are_inclusive() {
        assert_eq!(calculate_seo_score(&titled(30)).score, 20);
        assert_eq!(calculate_seo_score(&titled(60)).score, 20);
        assert_eq!(calculate_seo_score(&titled(29)).score, 5);
    }

    #[test]
    fn test_empty_input() {
        let result = calculate_seo_score(&ScoreInput::default());
        assert_eq!(result.score, 0);
        assert_eq!(result.percentage, 0);
        assert_eq!(result.max_score, 100);
        assert_eq!(result.issues.len(), 2);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].message, "No headings found");
        assert!(result.passes.is_empty());
    }

    #[test]
    fn test_whitespace_title_counts_as_missing() {
        let result = calculate_seo_score(&ScoreInput {
            title: Some("   ".to_string()),
            ..Default::default()
        });
        assert_eq!(title_finding(&result).message, "Missing page title");
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = calculate_seo_score(&ScoreInput::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["maxScore"], 100);
        assert!(json.get("max_score").is_none());
    }

    #[test]
    fn test_description_bands() {
        let score_of = |len: usize| {
            calculate_seo_score(&ScoreInput {
                description: Some("d".repeat(len)),
                ..Default::default()
            })
            .score
        };
        assert_eq!(score_of(119), 10);
        assert_eq!(score_of(120), 20);
        assert_eq!(score_of(160), 20);
        assert_eq!(score_of(161), 10);
    }

    #[test]
    fn test_heading_rules() {
        let score_of = |headings: Vec<Heading>| {
            calculate_seo_score(&ScoreInput {
                headings,
                ..Default::default()
            })
        };

        let no_h1 = score_of(vec![Heading::new(2, "Services")]);
        assert_eq!(no_h1.issues.last().unwrap().message, "Missing H1 heading");
        assert_eq!(no_h1.score, 0);

        let two = score_of(vec![Heading::new(1, "A"), Heading::new(1, "B")]);
        assert_eq!(two.score, 5);
        assert_eq!(two.warnings[0].message, "Multiple H1 headings found (2)");

        assert_eq!(score_of(vec![Heading::new(1, "A"), Heading::new(2, "B")]).score, 10);
    }

    #[test]
    fn test_half_of_images_with_alt() {
        let result = calculate_seo_score(&ScoreInput {
            images: vec![
                Image::new("/a.png", Some("Team photo")),
                Image::new("/b.png", None),
            ],
            ..Default::default()
        });
        let finding = result.findings().find(|f| f.category == IMAGES).unwrap();
        assert_eq!(finding.severity, Severity::Warning);
        assert!(finding.message.contains("50%"));
        assert_eq!(result.score, 10);
    }

    #[test]
    fn test_image_bands() {
        let score_of = |images: Vec<Image>| {
            calculate_seo_score(&ScoreInput {
                images,
                ..Default::default()
            })
            .score
        };
        assert_eq!(score_of(vec![Image::new("/a.png", Some(" "))]), 0);
        assert_eq!(
            score_of(vec![
                Image::new("/a.png", Some("a")),
                Image::new("/b.png", None),
                Image::new("/c.png", None),
            ]),
            5
        );
        assert_eq!(score_of(vec![Image::new("/a.png", Some("a"))]), 15);
    }

    #[test]
    fn test_content_length() {
        let score_of = |words: usize| {
            calculate_seo_score(&ScoreInput {
                content: Some("word ".repeat(words)),
                ..Default::default()
            })
            .score
        };
        assert_eq!(score_of(299), 3);
        assert_eq!(score_of(300), 7);
        assert_eq!(score_of(1000), 10);
    }

    #[test]
    fn test_perfect_page() {
        let result = calculate_seo_score(&ScoreInput {
            title: Some("ScaleSite - Websites and SEO for growing teams".to_string()),
            description: Some("d".repeat(155)),
            content: Some("word ".repeat(1200)),
            headings: vec![Heading::new(1, "ScaleSite"), Heading::new(2, "Pricing")],
            images: vec![Image::new("/hero.png", Some("Hero"))],
            url: Some("https://scalesite.app".to_string()),
        });
        assert_eq!(result.score, 75);
        assert_eq!(result.percentage, 75);
        assert!(result.issues.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.passes.len(), 5);
    }
}
