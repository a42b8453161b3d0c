//! Keyword analysis templating
//!
//! Produces markdown analysis text from keyword lists. There is no retrieval or
//! model behind it: categories come from substring matching and the text from
//! fixed per-category lines.

use crate::contract::{
    AnalysisPreferences, KeywordCategory, Language, ReportOptions, ReportTemplate, ScoredKeyword,
};
use std::fmt::Write;

/// Returned when a report filter leaves no keyword
pub const NOT_ENOUGH_KEYWORDS: &str =
    "분석할 키워드가 충분하지 않습니다. 점수 기준을 낮추거나 더 많은 키워드를 추가해 주세요.";

const DEFAULT_LINE_COUNT: usize = 3;

const CATEGORY_TERMS: [(KeywordCategory, &[&str]); 7] = [
    (
        KeywordCategory::AiTechnology,
        &["AI", "GPT", "인공지능", "머신러닝", "딥러닝", "Claude", "LLM", "생성형 AI"],
    ),
    (
        KeywordCategory::DigitalMarketing,
        &["마케팅", "SEO", "디지털 마케팅", "소셜미디어", "광고", "콘텐츠 마케팅"],
    ),
    (
        KeywordCategory::AppDevelopment,
        &["앱 개발", "웹 개발", "프로그래밍", "모바일 앱", "웹사이트", "프론트엔드", "백엔드"],
    ),
    (
        KeywordCategory::Education,
        &["교육", "학습", "강의", "온라인 강의", "e러닝", "학교", "대학"],
    ),
    (
        KeywordCategory::Health,
        &["건강", "의료", "병원", "운동", "다이어트", "건강관리", "헬스케어"],
    ),
    (
        KeywordCategory::Finance,
        &["금융", "투자", "주식", "경제", "재테크", "자산관리", "암호화폐"],
    ),
    (
        KeywordCategory::Modeling3d,
        &["3D", "모델링", "렌더링", "CAD", "Blender", "Unity", "Unreal"],
    ),
];

const INDUSTRY_OVERRIDES: [(&[&str], KeywordCategory); 6] = [
    (&["market", "마케팅"], KeywordCategory::DigitalMarketing),
    (&["dev", "개발"], KeywordCategory::AppDevelopment),
    (&["ai", "인공지능"], KeywordCategory::AiTechnology),
    (&["edu", "교육"], KeywordCategory::Education),
    (&["health", "건강", "의료"], KeywordCategory::Health),
    (&["finance", "금융", "투자"], KeywordCategory::Finance),
];

/// (korean, english) line pairs
type Lines = [(&'static str, &'static str); 3];

const AI_INSIGHTS: Lines = [
    (
        "AI 기술은 계속 빠르게 발전하고 있으며, 다양한 산업에서 도입이 증가하고 있습니다",
        "AI technology continues to evolve rapidly, with increasing adoption across industries",
    ),
    (
        "대규모 언어 모델은 모든 규모의 기업에서 더 쉽게 접근할 수 있게 되었습니다",
        "Large language models are becoming more accessible to businesses of all sizes",
    ),
    (
        "사용자들은 윤리적 AI와 데이터 프라이버시 문제에 대해 더 관심을 가지고 있습니다",
        "Users are increasingly concerned about ethical AI and data privacy issues",
    ),
];

const MARKETING_INSIGHTS: Lines = [
    (
        "콘텐츠 마케팅은 기존 마케팅보다 62% 적은 비용으로 3배 더 많은 리드를 창출합니다",
        "Content marketing delivers 3x more leads than traditional marketing for 62% less cost",
    ),
    (
        "비디오 콘텐츠는 연간 66% 더 많은 유자격 리드를 생성합니다",
        "Video content generates 66% more qualified leads per year",
    ),
    (
        "모바일 트래픽이 전체 웹 트래픽의 55%를 초과하므로 모바일 우선 전략이 필수적입니다",
        "Mobile-first strategies are essential as mobile traffic exceeds 55% of total web traffic",
    ),
];

const GENERAL_INSIGHTS: Lines = [
    (
        "특정 질문에 답하는 콘텐츠는 검색 랭킹에서 70% 더 좋은 성과를 보입니다",
        "Content that answers specific questions performs 70% better in search rankings",
    ),
    (
        "시각적 콘텐츠는 인간의 뇌에서 텍스트보다 60,000배 더 빠르게 처리됩니다",
        "Visual content is processed 60,000x faster than text by the human brain",
    ),
    (
        "일관된 출판 일정은 잠재 고객 유지율을 25-30% 증가시킵니다",
        "Consistent publishing schedules increase audience retention by 25-30%",
    ),
];

const AI_STRATEGIES: Lines = [
    (
        "청중을 위해 복잡한 AI 개념을 이해하기 쉽게 설명하는 교육 콘텐츠를 만드세요",
        "Create educational content that demystifies complex AI concepts for your audience",
    ),
    (
        "관련 산업에서 실용적인 AI 응용 사례를 보여주는 사례 연구를 개발하세요",
        "Develop case studies showcasing practical AI applications in relevant industries",
    ),
    (
        "다양한 AI 도구와 기술 간의 비교 콘텐츠를 제작하세요",
        "Create comparison content between different AI tools and technologies",
    ),
];

const MARKETING_STRATEGIES: Lines = [
    (
        "틈새 시장의 고가치 키워드를 타겟팅하는 포괄적인 콘텐츠 캘린더를 개발하세요",
        "Develop a comprehensive content calendar targeting high-value keywords in your niche",
    ),
    (
        "측정 가능한 결과로 실용적인 마케팅 기법을 보여주는 비디오 튜토리얼을 제작하세요",
        "Create video tutorials demonstrating practical marketing techniques with measurable results",
    ),
    (
        "디지털 마케팅 전략의 ROI를 강조하는 데이터 기반 사례 연구를 발행하세요",
        "Publish data-driven case studies highlighting ROI of digital marketing strategies",
    ),
];

const GENERAL_STRATEGIES: Lines = [
    (
        "주제 영역의 일반적인 질문을 다루는 포괄적인 가이드를 만드세요",
        "Create comprehensive guides addressing common questions in your topic area",
    ),
    (
        "복잡한 정보를 단순화하는 인포그래픽과 같은 시각적 콘텐츠를 개발하세요",
        "Develop visual content like infographics to simplify complex information",
    ),
    (
        "잠재 고객 기대를 구축하기 위한 일관된 출판 일정을 수립하세요",
        "Establish a consistent publishing schedule to build audience expectations",
    ),
];

/// Category of a keyword by case-insensitive term match; blank input is general
pub fn categorize_keyword(keyword: &str) -> KeywordCategory {
    let normalized = keyword.trim().to_lowercase();
    if normalized.is_empty() {
        return KeywordCategory::General;
    }

    CATEGORY_TERMS
        .iter()
        .find(|(_, terms)| {
            terms
                .iter()
                .any(|term| normalized.contains(&term.to_lowercase()))
        })
        .map(|(category, _)| *category)
        .unwrap_or(KeywordCategory::General)
}

fn industry_category(industry: &str) -> Option<KeywordCategory> {
    let industry = industry.to_lowercase();
    INDUSTRY_OVERRIDES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| industry.contains(needle)))
        .map(|(_, category)| *category)
}

fn insight_lines(category: KeywordCategory) -> &'static Lines {
    match category {
        KeywordCategory::AiTechnology => &AI_INSIGHTS,
        KeywordCategory::DigitalMarketing => &MARKETING_INSIGHTS,
        _ => &GENERAL_INSIGHTS,
    }
}

fn strategy_lines(category: KeywordCategory) -> &'static Lines {
    match category {
        KeywordCategory::AiTechnology => &AI_STRATEGIES,
        KeywordCategory::DigitalMarketing => &MARKETING_STRATEGIES,
        _ => &GENERAL_STRATEGIES,
    }
}

fn pick(pair: &(&'static str, &'static str), language: Language) -> &'static str {
    match language {
        Language::Ko => pair.0,
        Language::En => pair.1,
    }
}

/// Markdown analysis for a keyword list; the first keyword leads the report
pub fn generate_keyword_analysis(keywords: &[String], preferences: &AnalysisPreferences) -> String {
    let language = preferences.language;
    let Some(main) = keywords.first() else {
        return match language {
            Language::En => "No keywords to analyze.".to_string(),
            Language::Ko => "분석할 키워드가 없습니다.".to_string(),
        };
    };

    let category = preferences
        .industry
        .as_deref()
        .filter(|industry| !industry.is_empty())
        .and_then(industry_category)
        .unwrap_or_else(|| categorize_keyword(main));

    // Zero counts fall back to the default like an absent preference
    let insight_count = preferences
        .insight_count
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_LINE_COUNT);
    let strategy_count = preferences
        .strategy_count
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_LINE_COUNT);

    let (title, insight_title, strategy_title) = match language {
        Language::En => (
            format!("## {} Keyword Analysis", main),
            "### Key Insights",
            "### Content Strategy",
        ),
        Language::Ko => (
            format!("## {} 키워드 분석", main),
            "### 주요 인사이트",
            "### 콘텐츠 제작 전략",
        ),
    };

    let mut lines = vec![title, String::new(), insight_title.to_string()];
    lines.extend(
        insight_lines(category)
            .iter()
            .take(insight_count)
            .map(|pair| format!("- {}", pick(pair, language))),
    );
    lines.push(String::new());
    lines.push(strategy_title.to_string());
    lines.extend(
        strategy_lines(category)
            .iter()
            .take(strategy_count)
            .enumerate()
            .map(|(i, pair)| format!("{}. {}", i + 1, pick(pair, language))),
    );

    lines.join("\n")
}

/// Keep keywords scoring at least the threshold, best first, capped at `max_keywords`
pub fn select_keywords(keywords: &[ScoredKeyword], options: &ReportOptions) -> Vec<ScoredKeyword> {
    let mut selected: Vec<ScoredKeyword> = keywords
        .iter()
        .filter(|kw| kw.score >= options.score_threshold)
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.score.total_cmp(&a.score));
    selected.truncate(options.max_keywords);
    selected
}

/// Markdown keyword report rendered with the requested template
pub fn generate_report(keywords: &[ScoredKeyword], options: &ReportOptions) -> String {
    let selected = select_keywords(keywords, options);
    if selected.is_empty() {
        tracing::warn!(
            threshold = options.score_threshold,
            "No keyword left after score filter"
        );
        return NOT_ENOUGH_KEYWORDS.to_string();
    }

    let report = match options.template {
        ReportTemplate::Basic => basic_template(&selected, options.include_stats),
        ReportTemplate::Detailed => detailed_template(&selected, options.include_stats),
        ReportTemplate::Marketing => marketing_template(&selected, options.include_stats),
    };

    tracing::debug!(
        template = options.template.as_str(),
        selected = selected.len(),
        total = keywords.len(),
        length = report.len(),
        "Keyword report generated"
    );
    report
}

fn basic_template(keywords: &[ScoredKeyword], include_stats: bool) -> String {
    let mut out = String::from("## 키워드 분석 결과\n\n");
    if let Some(top) = keywords.first() {
        let _ = write!(
            out,
            "이번 분석된 키워드 중 **'{}'**가 가장 높은 추천 점수인 {}점을 기록했습니다.\n\n",
            top.keyword,
            format_number(top.score)
        );
    }

    out.push_str("### 추천 키워드 목록\n\n");
    for kw in keywords {
        let stats = if include_stats {
            format!(
                ": 검색량 {}회, 점수 {}점",
                group_thousands(kw.monthly_searches),
                format_number(kw.score)
            )
        } else {
            String::new()
        };
        let _ = writeln!(out, "- **{}**{}", kw.keyword, stats);
    }

    out.push_str("\n80점 이상 키워드는 콘텐츠 제작 우선순위로 고려하세요.");
    out
}

fn detailed_template(keywords: &[ScoredKeyword], include_stats: bool) -> String {
    let mut out = String::from("## 상세 키워드 분석 보고서\n\n");
    if let Some(top) = keywords.first() {
        let _ = write!(
            out,
            "총 {}개 키워드를 분석한 결과, **'{}'**가 {}점으로 최고 점수를 기록했습니다.\n\n",
            keywords.len(),
            top.keyword,
            format_number(top.score)
        );
    }

    if include_stats {
        out.push_str("### 분석 지표 설명\n\n");
        out.push_str("- **검색량**: 월간 검색 횟수\n");
        out.push_str("- **경쟁률**: 0~1 사이 값 (높을수록 경쟁 치열)\n");
        out.push_str("- **점수**: 검색량과 경쟁률을 고려한 종합 점수 (100점 만점)\n\n");
    }

    out.push_str("### 주요 추천 키워드\n\n");
    out.push_str("| 키워드 | 검색량 | 경쟁률 | 종합 점수 |\n");
    out.push_str("|--------|---------|---------|----------|\n");
    for kw in keywords {
        let _ = writeln!(
            out,
            "| {} | {} | {:.2} | {} |",
            kw.keyword,
            group_thousands(kw.monthly_searches),
            kw.competition_rate,
            format_number(kw.score)
        );
    }

    out.push_str("\n### 활용 전략\n\n");
    out.push_str("- 80점 이상: 핵심 콘텐츠로 개발\n");
    out.push_str("- 70-79점: 보조 콘텐츠로 활용\n");
    out.push_str("- 60-69점: 장기적 콘텐츠 계획에 포함\n");
    out
}

fn marketing_template(keywords: &[ScoredKeyword], include_stats: bool) -> String {
    let high: Vec<&ScoredKeyword> = keywords.iter().filter(|kw| kw.score >= 80.0).collect();
    let mid: Vec<&ScoredKeyword> = keywords
        .iter()
        .filter(|kw| kw.score >= 70.0 && kw.score < 80.0)
        .collect();

    let entry = |kw: &ScoredKeyword| {
        if include_stats {
            format!(
                "- **{}** (점수: {}, 검색량: {})\n",
                kw.keyword,
                format_number(kw.score),
                group_thousands(kw.monthly_searches)
            )
        } else {
            format!("- **{}**\n", kw.keyword)
        }
    };

    let mut out = String::from("## 마케팅 키워드 인사이트\n\n");

    if !high.is_empty() {
        out.push_str("### 🔥 우선순위 키워드\n\n");
        high.iter().for_each(|kw| out.push_str(&entry(kw)));
        out.push('\n');
    }

    if !mid.is_empty() {
        out.push_str("### ⭐ 잠재력 키워드\n\n");
        mid.iter().for_each(|kw| out.push_str(&entry(kw)));
        out.push('\n');
    }

    out.push_str("### 마케팅 전략 제안\n\n");
    if let Some(first) = high.first() {
        let second = high
            .get(1)
            .map(|kw| format!("와(과) **{}**", kw.keyword))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "- **{}**{}를 중심으로 핵심 콘텐츠 개발",
            first.keyword, second
        );
    }

    out.push_str("- 검색 광고, SEO, 소셜 미디어에 이 키워드들 중점적으로 활용\n");
    out.push_str("- 단기 트래픽 증가는 우선순위 키워드, 장기적 성장은 잠재력 키워드에 집중\n");
    out
}

/// Integer-valued numbers print without a fraction
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(keyword: &str, searches: u64, rate: f64, score: f64) -> ScoredKeyword {
        ScoredKeyword {
            keyword: keyword.to_string(),
            monthly_searches: searches,
            competition_rate: rate,
            score,
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_categorize_keyword() {
        assert_eq!(categorize_keyword("ChatGPT 활용"), KeywordCategory::AiTechnology);
        assert_eq!(categorize_keyword("seo 전략"), KeywordCategory::DigitalMarketing);
        assert_eq!(categorize_keyword("모바일 앱 디자인"), KeywordCategory::AppDevelopment);
        assert_eq!(categorize_keyword("온라인 강의 플랫폼"), KeywordCategory::Education);
        assert_eq!(categorize_keyword("다이어트 식단"), KeywordCategory::Health);
        assert_eq!(categorize_keyword("재테크 방법"), KeywordCategory::Finance);
        assert_eq!(categorize_keyword("blender 튜토리얼"), KeywordCategory::Modeling3d);
        assert_eq!(categorize_keyword("   "), KeywordCategory::General);
        assert_eq!(categorize_keyword("캠핑"), KeywordCategory::General);
    }

    #[test]
    fn test_categorize_checks_categories_in_order() {
        // "AI" matches before "3D"
        assert_eq!(categorize_keyword("AI 3D 모델링"), KeywordCategory::AiTechnology);
        assert_eq!(KeywordCategory::Modeling3d.label(), "3D 모델링/AI");
    }

    #[test]
    fn test_analysis_empty_input() {
        let prefs = AnalysisPreferences::default();
        assert_eq!(generate_keyword_analysis(&[], &prefs), "분석할 키워드가 없습니다.");

        let prefs = AnalysisPreferences {
            language: Language::En,
            ..Default::default()
        };
        assert_eq!(generate_keyword_analysis(&[], &prefs), "No keywords to analyze.");
    }

    #[test]
    fn test_analysis_korean_layout() {
        let text = generate_keyword_analysis(
            &strings(&["GPT 활용법", "프롬프트"]),
            &AnalysisPreferences::default(),
        );
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "## GPT 활용법 키워드 분석");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "### 주요 인사이트");
        assert!(lines[3].starts_with("- AI 기술은"));
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "### 콘텐츠 제작 전략");
        assert!(lines[8].starts_with("1. "));
        assert_eq!(lines.len(), 11);
    }

    #[test]
    fn test_analysis_industry_override_and_counts() {
        let prefs = AnalysisPreferences {
            language: Language::En,
            industry: Some("Digital Marketing".to_string()),
            insight_count: Some(1),
            strategy_count: Some(10),
        };
        let text = generate_keyword_analysis(&strings(&["캠핑"]), &prefs);

        assert!(text.starts_with("## 캠핑 Keyword Analysis"));
        assert!(text.contains("- Content marketing delivers 3x more leads"));
        assert!(!text.contains("Video content generates"));
        assert!(text.contains("3. Publish data-driven case studies"));
    }

    #[test]
    fn test_analysis_categories_without_lines_use_general() {
        let text = generate_keyword_analysis(
            &strings(&["주식 투자"]),
            &AnalysisPreferences::default(),
        );
        assert!(text.contains("특정 질문에 답하는 콘텐츠는"));
    }

    #[test]
    fn test_select_keywords_filters_sorts_and_limits() {
        let options = ReportOptions {
            max_keywords: 2,
            ..Default::default()
        };
        let selected = select_keywords(
            &[
                kw("a", 100, 0.1, 61.0),
                kw("b", 100, 0.1, 59.9),
                kw("c", 100, 0.1, 95.0),
                kw("d", 100, 0.1, 70.0),
            ],
            &options,
        );
        let names: Vec<&str> = selected.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(names, vec!["c", "d"]);
    }

    #[test]
    fn test_report_not_enough_keywords() {
        let report = generate_report(&[kw("a", 1, 0.5, 10.0)], &ReportOptions::default());
        assert_eq!(report, NOT_ENOUGH_KEYWORDS);
    }

    #[test]
    fn test_basic_report() {
        let report = generate_report(
            &[kw("블렌더", 42700, 0.31, 92.0), kw("MCP", 1200, 0.2, 65.0)],
            &ReportOptions::default(),
        );
        assert!(report.starts_with("## 키워드 분석 결과\n\n"));
        assert!(report.contains("**'블렌더'**가 가장 높은 추천 점수인 92점"));
        assert!(report.contains("- **블렌더**: 검색량 42,700회, 점수 92점\n"));
        assert!(report.ends_with("80점 이상 키워드는 콘텐츠 제작 우선순위로 고려하세요."));
    }

    #[test]
    fn test_detailed_report_table() {
        let options = ReportOptions {
            template: ReportTemplate::Detailed,
            include_stats: false,
            ..Default::default()
        };
        let report = generate_report(&[kw("블렌더", 42700, 0.3, 92.0)], &options);
        assert!(report.contains("총 1개 키워드를 분석한 결과"));
        assert!(report.contains("| 블렌더 | 42,700 | 0.30 | 92 |\n"));
        assert!(!report.contains("### 분석 지표 설명"));
    }

    #[test]
    fn test_marketing_report_sections() {
        let options = ReportOptions {
            template: ReportTemplate::Marketing,
            ..Default::default()
        };
        let report = generate_report(
            &[
                kw("a", 1000, 0.1, 90.0),
                kw("b", 2000, 0.1, 85.0),
                kw("c", 3000, 0.1, 75.0),
                kw("d", 4000, 0.1, 65.0),
            ],
            &options,
        );
        assert!(report.contains("### 🔥 우선순위 키워드\n\n- **a** (점수: 90, 검색량: 1,000)\n"));
        assert!(report.contains("### ⭐ 잠재력 키워드\n\n- **c**"));
        assert!(!report.contains("- **d**"));
        assert!(report.contains("- **a**와(과) **b**를 중심으로 핵심 콘텐츠 개발\n"));
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(format_number(92.0), "92");
        assert_eq!(format_number(87.5), "87.5");
    }
}
