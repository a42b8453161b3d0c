//! Keyword scoring and suggestion generation
//!
//! Volumes and competition rates are synthetic. The score is a plain function of
//! both: `clamp(round(volume / 1000 * (1 - competition)), 0, 100)`.

use crate::contract::{KeywordMetrics, Recommendation};
use rand::Rng;

/// Topic family a search term falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    McpBlender,
    Ai,
    Marketing,
    Generic,
}

impl Topic {
    pub fn detect(keyword: &str) -> Self {
        let lower = keyword.to_lowercase();
        if lower.contains("mcp") && lower.contains("블렌더") {
            Self::McpBlender
        } else if lower.contains("ai") || lower.contains("인공지능") {
            Self::Ai
        } else if lower.contains("마케팅") || lower.contains("광고") {
            Self::Marketing
        } else {
            Self::Generic
        }
    }
}

/// Generation constants of a topic family
struct Family {
    suffixes: &'static [&'static str],
    /// The bare keyword is the first row
    include_base: bool,
    volume_base: f64,
    volume_step: f64,
    volume_jitter: f64,
    competition_base: f64,
    competition_step: f64,
    competition_jitter: f64,
}

const AI_FAMILY: Family = Family {
    suffixes: &[
        "튜토리얼",
        "활용 사례",
        "vs 다른 모델",
        "API 사용법",
        "가이드",
        "최신 기능",
        "무료 대안",
        "성능 비교",
        "한계점",
        "초보자 가이드",
    ],
    include_base: false,
    volume_base: 40000.0,
    volume_step: 3500.0,
    volume_jitter: 2000.0,
    competition_base: 0.2,
    competition_step: 0.05,
    competition_jitter: 0.15,
};

const MARKETING_FAMILY: Family = Family {
    suffixes: &[
        "전략",
        "ROI 분석",
        "트렌드",
        "성공 사례",
        "예산 계획",
        "타겟팅 방법",
        "콘텐츠 전략",
        "KPI 설정",
        "효과 측정",
        "실패 사례와 교훈",
    ],
    include_base: false,
    volume_base: 45000.0,
    volume_step: 4000.0,
    volume_jitter: 3000.0,
    competition_base: 0.15,
    competition_step: 0.06,
    competition_jitter: 0.1,
};

const GENERIC_FAMILY: Family = Family {
    suffixes: &[
        "사용법", "리뷰", "비교", "가격", "장단점", "추천", "초보자", "최신", "대안",
    ],
    include_base: true,
    volume_base: 35000.0,
    volume_step: 3000.0,
    volume_jitter: 2500.0,
    competition_base: 0.25,
    competition_step: 0.05,
    competition_jitter: 0.12,
};

const MCP_BLENDER_TABLE: [(&str, u64, f64, u8); 10] = [
    ("BlenderMCP AI 모델링", 42700, 0.31, 92),
    ("Claude AI + Blender MCP 사용법", 38400, 0.22, 87),
    ("MCP 블렌더 3D 모델 생성", 29800, 0.35, 81),
    ("블렌더 MCP 플러그인 설치", 25200, 0.28, 79),
    ("BlenderMCP 튜토리얼", 21500, 0.33, 73),
    ("MCP 블렌더 윈도우 11 설정", 18900, 0.41, 65),
    ("Blender MCP vs Midjourney 3D", 15600, 0.52, 54),
    ("MCP 블렌더 작품 예시", 12400, 0.61, 42),
    ("Blender MCP 최적화 설정", 9300, 0.58, 38),
    ("MCP 블렌더 초보자 가이드", 7800, 0.67, 29),
];

/// Score in 0..=100 for a search volume and a competition rate
pub fn generate_score(volume: f64, competition: f64) -> u8 {
    let base = (volume / 1000.0) * (1.0 - competition);
    base.round().clamp(0.0, 100.0) as u8
}

/// Round to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Generate ten keyword suggestions for a search term
///
/// The keyword must already be trimmed and non-empty.
pub fn generate_keywords<R: Rng + ?Sized>(keyword: &str, rng: &mut R) -> Vec<KeywordMetrics> {
    match Topic::detect(keyword) {
        Topic::McpBlender => mcp_blender_keywords(),
        Topic::Ai => family_keywords(keyword, &AI_FAMILY, rng),
        Topic::Marketing => family_keywords(keyword, &MARKETING_FAMILY, rng),
        Topic::Generic => family_keywords(keyword, &GENERIC_FAMILY, rng),
    }
}

fn mcp_blender_keywords() -> Vec<KeywordMetrics> {
    MCP_BLENDER_TABLE
        .iter()
        .map(|&(keyword, monthly_searches, competition_rate, score)| KeywordMetrics {
            keyword: keyword.to_string(),
            monthly_searches,
            competition_rate,
            score,
            recommendation: Recommendation::from_score(score),
        })
        .collect()
}

fn family_keywords<R: Rng + ?Sized>(
    keyword: &str,
    family: &Family,
    rng: &mut R,
) -> Vec<KeywordMetrics> {
    let base = family.include_base.then(|| keyword.to_string());
    let variants = family
        .suffixes
        .iter()
        .map(|suffix| format!("{} {}", keyword, suffix));

    base.into_iter()
        .chain(variants)
        .enumerate()
        .map(|(index, text)| {
            let i = index as f64;
            let volume = (family.volume_base - i * family.volume_step
                + rng.random::<f64>() * family.volume_jitter)
                .round()
                .max(0.0);
            let competition = family.competition_base
                + i * family.competition_step
                + rng.random::<f64>() * family.competition_jitter;
            let score = generate_score(volume, competition);

            KeywordMetrics {
                keyword: text,
                monthly_searches: volume as u64,
                competition_rate: round2(competition),
                score,
                recommendation: Recommendation::from_score(score),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_score_clamps() {
        assert_eq!(generate_score(0.0, 0.5), 0);
        assert_eq!(generate_score(40000.0, 0.2), 32);
        assert_eq!(generate_score(500_000.0, 0.1), 100);
        assert_eq!(generate_score(10_000.0, 1.5), 0);
    }

    #[test]
    fn test_recommendation_thresholds() {
        assert_eq!(Recommendation::from_score(80), Recommendation::Strong);
        assert_eq!(Recommendation::from_score(79), Recommendation::Recommended);
        assert_eq!(Recommendation::from_score(50), Recommendation::Recommended);
        assert_eq!(Recommendation::from_score(49), Recommendation::LowPriority);
        assert_eq!(Recommendation::Strong.label(), "🟢 강력 추천");
    }

    #[test]
    fn test_topic_detection() {
        assert_eq!(Topic::detect("MCP 블렌더"), Topic::McpBlender);
        assert_eq!(Topic::detect("mcp 블렌더 설치"), Topic::McpBlender);
        assert_eq!(Topic::detect("OpenAI"), Topic::Ai);
        assert_eq!(Topic::detect("인공지능 윤리"), Topic::Ai);
        assert_eq!(Topic::detect("유튜브 광고"), Topic::Marketing);
        assert_eq!(Topic::detect("캠핑 의자"), Topic::Generic);
    }

    #[test]
    fn test_mcp_blender_table_is_fixed() {
        let mut rng = StdRng::seed_from_u64(7);
        let rows = generate_keywords("MCP 블렌더", &mut rng);

        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].keyword, "BlenderMCP AI 모델링");
        assert_eq!(rows[0].score, 92);
        assert_eq!(rows[3].recommendation, Recommendation::Recommended);
        assert_eq!(rows[9].recommendation, Recommendation::LowPriority);
    }

    #[test]
    fn test_generic_family_starts_with_bare_keyword() {
        let mut rng = StdRng::seed_from_u64(42);
        let rows = generate_keywords("캠핑 의자", &mut rng);

        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].keyword, "캠핑 의자");
        assert_eq!(rows[1].keyword, "캠핑 의자 사용법");
        assert_eq!(rows[9].keyword, "캠핑 의자 대안");
    }

    #[test]
    fn test_generated_rows_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(1234);
        for keyword in ["ChatGPT AI", "퍼포먼스 마케팅", "자전거"] {
            for row in generate_keywords(keyword, &mut rng) {
                assert!(row.score <= 100);
                assert!(row.competition_rate > 0.0 && row.competition_rate < 1.0);
                assert_eq!(row.competition_rate, round2(row.competition_rate));
                assert_eq!(row.recommendation, Recommendation::from_score(row.score));
            }
        }
    }

    #[test]
    fn test_ai_volumes_follow_family_constants() {
        let mut rng = StdRng::seed_from_u64(99);
        let rows = generate_keywords("AI 그림", &mut rng);

        assert_eq!(rows[0].keyword, "AI 그림 튜토리얼");
        for (i, row) in rows.iter().enumerate() {
            let low = 40000 - i as u64 * 3500;
            assert!(row.monthly_searches >= low);
            assert!(row.monthly_searches <= low + 2000);
        }
    }
}
