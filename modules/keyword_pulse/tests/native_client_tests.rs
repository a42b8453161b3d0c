//! In-process client obtained from the module

mod common;

use common::*;
use keyword_pulse::contract::*;
use keyword_pulse::KeywordPulseModule;

fn module() -> KeywordPulseModule {
    let module = KeywordPulseModule::new();
    module.init_with_ports(test_config(), mock_ports());
    module
}

#[tokio::test]
async fn test_native_client_keyword_research() {
    let client = module().client().unwrap();

    let keywords = client.search_keywords("MCP 블렌더").await.unwrap();
    assert_eq!(keywords.len(), 10);
    assert!(keywords.iter().all(|kw| kw.score <= 100));

    let trend = client
        .keyword_trend("MCP 블렌더", TimeRange::Year, "KR")
        .await
        .unwrap();
    assert_eq!(trend.points.len(), 12);

    let related = client.related_keywords("MCP 블렌더", 2).await.unwrap();
    assert_eq!(related, vec!["MCP 블렌더 튜토리얼", "MCP 블렌더 다운로드"]);

    let trending = client
        .trending_keywords(TrendCategory::Technology, 1)
        .await
        .unwrap();
    assert_eq!(trending[0].keyword, "MCP 블렌더 튜토리얼");
}

#[tokio::test]
async fn test_native_client_report_and_errors() {
    let client = module().client().unwrap();

    let report = client
        .render_report(
            &[ScoredKeyword {
                keyword: "AI 글쓰기".to_string(),
                monthly_searches: 12000,
                competition_rate: 0.2,
                score: 88.0,
            }],
            &ReportOptions::default(),
        )
        .await
        .unwrap();
    assert!(report.contains("<b>AI 글쓰기</b>"));
    assert!(report.contains("12,000"));

    let err = client.related_keywords("AI", 100).await.unwrap_err();
    assert!(matches!(err, KeywordPulseError::Validation { .. }));

    let err = client
        .notify_analysis("", "1", &AnalysisNotification::default())
        .await
        .unwrap_err();
    assert!(matches!(err, KeywordPulseError::Validation { .. }));
}
