use httpmock::prelude::*;
use scalesite_seo::domain::model::Severity;
use scalesite_seo::{HtmlAuditor, HttpFetcher, SeoError};
use std::time::Duration;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Short</title>
  <meta property="og:title" content="ScaleSite">
  <meta property="og:description" content="Websites that grow">
  <meta name="twitter:card" content="summary">
  <link rel="canonical" href="https://scalesite.app/">
</head>
<body>
  <h1>Hallo</h1>
  <img src="a.png" alt="Team">
  <img src="b.png" alt="Office">
</body>
</html>"#;

fn auditor() -> HtmlAuditor<HttpFetcher> {
    HtmlAuditor::new(HttpFetcher::new().with_timeout(Duration::from_secs(5)))
}

#[tokio::test]
async fn test_audit_fetched_page() {
    let server = MockServer::start();
    let page_mock = server.mock(|when, then| {
        when.method(GET).path("/landing");
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(PAGE);
    });

    let url = server.url("/landing");
    let report = auditor().audit(&url).await.unwrap();
    page_mock.assert();

    assert_eq!(report.url, url);
    assert!(!report.simulated);
    // http (0) + short title (8) + no description (0) + og, twitter, h1, alt, canonical (5 x 10)
    assert_eq!(report.score, 58);
    assert_eq!(report.percentage, 58);

    let critical: Vec<&str> = report.issues.iter().map(|i| i.message.as_str()).collect();
    assert_eq!(
        critical,
        vec!["Website does not use HTTPS", "Missing meta description"]
    );
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].message, "Title is 5 characters (optimal: 50-60)");
    assert_eq!(report.passes.len(), 5);
    assert!(report.passes.iter().all(|p| p.severity == Severity::Info));
}

#[tokio::test]
async fn test_audit_http_error_becomes_general_issue() {
    let server = MockServer::start();
    let missing = server.mock(|when, then| {
        when.method(GET).path("/missing");
        then.status(404).body("not found");
    });

    let report = auditor().audit(&server.url("/missing")).await.unwrap();
    missing.assert();

    assert_eq!(report.score, 0);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].category, "General");
    assert!(report.issues[0].message.starts_with("Failed to audit URL:"));
    assert!(report.issues[0].message.contains("404"));
    assert!(report.warnings.is_empty());
    assert!(report.passes.is_empty());
}

#[tokio::test]
async fn test_audit_rejects_invalid_url_without_fetching() {
    let err = auditor().audit("scalesite.app").await.unwrap_err();
    assert!(matches!(err, SeoError::InvalidUrl { .. }));
}

#[tokio::test]
async fn test_report_serializes_with_dashboard_field_names() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body(PAGE);
    });

    let report = auditor().audit(&server.url("/")).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["maxScore"], 100);
    assert_eq!(json["criticalIssues"].as_array().unwrap().len(), 2);
    assert_eq!(json["passedChecks"].as_array().unwrap().len(), 5);
    assert!(report.file_name().starts_with("seo-audit-"));
    assert!(report.file_name().ends_with(".json"));
}
