//! Trend data: trending keyword tables, related keywords and synthetic trend series

use crate::contract::{TimeRange, TrendCategory, TrendPoint, TrendingKeyword};
use chrono::{DateTime, Duration, Months, Timelike, Utc};
use rand::Rng;

/// Upper bound accepted for related keyword counts
pub const MAX_RELATED: usize = 50;

type Row = (&'static str, u32, i32);

const TRENDING_ALL: [Row; 10] = [
    ("MCP 블렌더", 342, 120),
    ("블랙 프라이데이", 267, 85),
    ("인공지능 챗봇", 211, 15),
    ("월드컵 예선", 189, -5),
    ("대입 수능", 175, 200),
    ("겨울 여행지", 162, 30),
    ("다이어트 식단", 154, -20),
    ("메타버스 투자", 143, 10),
    ("전기차 충전소", 132, 5),
    ("에어팟 프로", 128, -15),
];

const TRENDING_BUSINESS: [Row; 10] = [
    ("비트코인 전망", 278, 50),
    ("주식 시장 전망", 245, 15),
    ("스타트업 투자", 221, 30),
    ("부동산 시장", 209, -20),
    ("원자재 가격", 195, 25),
    ("디지털 마케팅", 187, 40),
    ("금리 전망", 176, 10),
    ("재택근무 기업", 168, -10),
    ("전자상거래 트렌드", 155, 20),
    ("블록체인 비즈니스", 143, 35),
];

const TRENDING_TECHNOLOGY: [Row; 10] = [
    ("MCP 블렌더 튜토리얼", 312, 150),
    ("AI 생성 모델", 285, 70),
    ("React 18 기능", 246, 25),
    ("Next.js 14", 232, 80),
    ("GPT-5 루머", 217, 110),
    ("Apple M3 성능", 201, 15),
    ("Web3 개발", 189, 10),
    ("양자 컴퓨팅", 178, 30),
    ("사이버 보안 트렌드", 166, 5),
    ("5G 활용 사례", 154, -10),
];

const TRENDING_ENTERTAINMENT: [Row; 10] = [
    ("신규 넷플릭스 시리즈", 298, 40),
    ("인기 웹툰", 267, 25),
    ("디즈니플러스 영화", 245, 15),
    ("인디 게임 추천", 231, 60),
    ("연말 콘서트", 222, 85),
    ("핫한 유튜버", 210, 30),
    ("오디오북 추천", 195, 20),
    ("전시회 일정", 183, 5),
    ("새 앨범 발매", 176, 15),
    ("MBTI 테스트", 168, -10),
];

const TRENDING_HEALTH: [Row; 10] = [
    ("겨울철 건강관리", 287, 45),
    ("면역력 높이는 음식", 265, 30),
    ("홈트레이닝 루틴", 246, 20),
    ("건강한 수면습관", 232, 15),
    ("비타민 추천", 218, 25),
    ("근력운동 방법", 206, 10),
    ("디지털 디톡스", 193, 60),
    ("채식주의 식단", 187, 35),
    ("목 스트레칭", 175, 5),
    ("겨울 스포츠", 168, 40),
];

const RELATED_SEEDS: [(&str, [&str; 10]); 3] = [
    (
        "MCP 블렌더",
        [
            "MCP 블렌더 튜토리얼",
            "MCP 블렌더 다운로드",
            "Blender MCP 설치 방법",
            "MCP 블렌더 윈도우 11",
            "Claude AI 블렌더 연동",
            "블렌더 MCP 모델링",
            "MCP 3D 작품 갤러리",
            "MCP vs Midjourney",
            "AI 3D 모델링 도구",
            "MCP 블렌더 최적화",
        ],
    ),
    (
        "AI 생성 모델",
        [
            "GPT-4 기능",
            "Stable Diffusion 최신 버전",
            "AI 이미지 생성",
            "DALL-E 3 특징",
            "Claude AI 사용법",
            "Midjourney 프롬프트",
            "AI 텍스트 생성",
            "오픈소스 AI 모델",
            "AI 음악 생성",
            "AI 동영상 생성",
        ],
    ),
    (
        "디지털 마케팅",
        [
            "SEO 최적화 방법",
            "소셜 미디어 마케팅",
            "콘텐츠 마케팅 전략",
            "이메일 마케팅 툴",
            "PPC 광고 효과",
            "SNS 마케팅 트렌드",
            "인플루언서 마케팅 비용",
            "퍼포먼스 마케팅 성과",
            "디지털 마케팅 ROI",
            "마케팅 자동화 도구",
        ],
    ),
];

const RELATED_SUFFIXES: [&str; 10] = [
    "사용법", "리뷰", "추천", "비교", "가격", "장단점", "튜토리얼", "2023", "최신", "대안",
];

/// Trending keywords of a category, at most `count` rows
pub fn trending_keywords(category: TrendCategory, count: usize) -> Vec<TrendingKeyword> {
    let table: &[Row] = match category {
        TrendCategory::All => &TRENDING_ALL,
        TrendCategory::Business => &TRENDING_BUSINESS,
        TrendCategory::Technology => &TRENDING_TECHNOLOGY,
        TrendCategory::Entertainment => &TRENDING_ENTERTAINMENT,
        TrendCategory::Health => &TRENDING_HEALTH,
    };

    table
        .iter()
        .take(count)
        .map(|&(keyword, searches, change)| TrendingKeyword {
            keyword: keyword.to_string(),
            count: searches,
            change: Some(change),
        })
        .collect()
}

/// Related search terms, at most `count` entries
pub fn related_keywords(keyword: &str, count: usize) -> Vec<String> {
    let lower = keyword.to_lowercase();

    if let Some((_, related)) = RELATED_SEEDS
        .iter()
        .find(|(seed, _)| lower.contains(&seed.to_lowercase()))
    {
        return related.iter().take(count).map(|s| s.to_string()).collect();
    }

    RELATED_SUFFIXES
        .iter()
        .take(count)
        .map(|suffix| format!("{} {}", keyword, suffix))
        .collect()
}

/// Date labels of a trend series, oldest first
pub fn trend_dates(range: TimeRange, now: DateTime<Utc>) -> Vec<String> {
    let days_back = |days: i64| -> Vec<String> {
        (0..=days)
            .rev()
            .map(|i| (now - Duration::days(i)).format("%Y-%m-%d").to_string())
            .collect()
    };

    match range {
        TimeRange::Day => days_back(1)
            .into_iter()
            .map(|date| format!("{} {}:00", date, now.hour()))
            .collect(),
        TimeRange::Week => days_back(7),
        TimeRange::Month => days_back(30),
        TimeRange::Year => (0..12u32)
            .rev()
            .map(|i| {
                now.checked_sub_months(Months::new(i))
                    .unwrap_or(now)
                    .format("%Y-%m")
                    .to_string()
            })
            .collect(),
    }
}

/// Synthetic trend series for a keyword
///
/// MCP-Blender keywords grow steadily, AI keywords oscillate around 50 and
/// everything else is uniform noise between 40 and 80.
pub fn keyword_trend<R: Rng + ?Sized>(
    keyword: &str,
    range: TimeRange,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<TrendPoint> {
    let dates = trend_dates(range, now);
    let lower = keyword.to_lowercase();
    let len = dates.len() as f64;

    dates
        .into_iter()
        .enumerate()
        .map(|(index, date)| {
            let i = index as f64;
            let noise = rng.random::<f64>() * 10.0 - 5.0;
            let value = if lower.contains("mcp") && lower.contains("블렌더") {
                30.0 + i / len * 70.0 + noise
            } else if lower.contains("ai") || lower.contains("인공지능") {
                50.0 + (i / 5.0).sin() * 15.0 + noise
            } else {
                40.0 + rng.random::<f64>() * 40.0
            };
            TrendPoint {
                date,
                value: value.round().max(0.0) as u32,
            }
        })
        .collect()
}
