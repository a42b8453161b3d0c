//! Input validation and parsing of loosely typed request values

use super::trends::MAX_RELATED;
use crate::contract::{
    EventType, KeywordPulseError, Language, ParseMode, ReportTemplate, ScoredKeyword, TimeRange,
    TrendCategory,
};
use serde_json::Value;

pub const SEARCH_KEYWORD_REQUIRED: &str = "검색 키워드가 제공되지 않았습니다.";
pub const ANALYZE_KEYWORDS_REQUIRED: &str = "분석할 키워드가 제공되지 않았습니다.";
pub const TREND_KEYWORD_REQUIRED: &str = "키워드 파라미터가 필요합니다.";
pub const RELATED_KEYWORD_REQUIRED: &str = "키워드가 제공되지 않았습니다.";
pub const INVALID_TIME_RANGE: &str =
    "유효하지 않은 시간 범위입니다. day, week, month, year 중 하나를 사용하세요.";
pub const INVALID_RELATED_COUNT: &str = "키워드 수는 1-50 사이의 정수여야 합니다.";
pub const INVALID_TRENDING_COUNT: &str = "키워드 수는 0 이상의 정수여야 합니다.";
pub const INVALID_CATEGORY: &str =
    "유효하지 않은 카테고리입니다. all, business, technology, entertainment, health 중 하나를 사용하세요.";
pub const SYNC_KEYWORDS_REQUIRED: &str = "저장할 키워드 데이터가 제공되지 않았습니다.";
pub const RELAY_TEXT_REQUIRED: &str = "전송할 분석 텍스트가 제공되지 않았습니다.";
pub const INVALID_PARSE_MODE: &str = "parseMode는 HTML, Markdown, MarkdownV2 중 하나여야 합니다.";
pub const NOTIFY_CREDENTIALS_REQUIRED: &str = "필수 파라미터가 누락되었습니다. (token, chat_id)";
pub const NOTIFY_CONTENT_REQUIRED: &str =
    "전송할 메시지 내용이 누락되었습니다. (customMessage 또는 keyword)";
pub const BOT_TOKEN_REQUIRED: &str = "텔레그램 봇 토큰이 필요합니다.";
pub const CHAT_ID_REQUIRED: &str = "텔레그램 채팅 ID가 필요합니다.";
pub const VALIDATE_CHAT_ID_REQUIRED: &str = "유효성을 검사할 텔레그램 채팅 ID가 필요합니다.";
pub const TEST_CREDENTIALS_REQUIRED: &str = "텔레그램 봇 토큰과 채팅 ID가 필요합니다.";
pub const REPORT_KEYWORDS_REQUIRED: &str = "분석할 키워드 데이터가 없습니다.";
pub const REPORT_KEYWORDS_INVALID: &str = "유효한 키워드 데이터가 없습니다.";
pub const CHAT_IDS_REQUIRED: &str = "최소 하나 이상의 유효한 채팅 ID가 필요합니다.";
pub const INVALID_CHAT_ID_FORMAT: &str =
    "유효하지 않은 채팅 ID 형식입니다. 숫자 또는 @username 형식이어야 합니다.";
pub const FEEDBACK_TEXT_REQUIRED: &str = "피드백 내용을 입력해주세요.";
pub const INVALID_RATING: &str = "평점은 1-5 사이의 정수여야 합니다.";
pub const INVALID_METRIC: &str = "Invalid metric data";
pub const INVALID_METRIC_BATCH: &str = "Invalid metrics batch data";
pub const INVALID_EVENT: &str = "Invalid event data";
pub const CREDENTIALS_REQUIRED: &str = "이메일과 비밀번호를 입력해주세요.";
pub const PASSWORD_TOO_SHORT: &str = "비밀번호는 6자 이상이어야 합니다.";
pub const LOGIN_REQUIRED: &str = "로그인이 필요합니다.";

const DEFAULT_COUNT: usize = 10;
const MIN_PASSWORD_CHARS: usize = 6;

/// Trimmed, non-empty value or a validation error with `message`
pub fn require<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, KeywordPulseError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| KeywordPulseError::validation(message))
}

/// `timeRange` query value; absent means month
pub fn parse_time_range(value: Option<&str>) -> Result<TimeRange, KeywordPulseError> {
    match value.filter(|v| !v.is_empty()) {
        None => Ok(TimeRange::Month),
        Some(v) => TimeRange::parse(v).ok_or_else(|| KeywordPulseError::validation(INVALID_TIME_RANGE)),
    }
}

/// Related keyword count in 1..=50; absent means 10
pub fn parse_related_count(value: Option<&str>) -> Result<usize, KeywordPulseError> {
    let count = match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => return Ok(DEFAULT_COUNT),
        Some(v) => v
            .parse::<i64>()
            .map_err(|_| KeywordPulseError::validation(INVALID_RELATED_COUNT))?,
    };
    validate_related_count(count)
}

pub fn validate_related_count(count: i64) -> Result<usize, KeywordPulseError> {
    if (1..=MAX_RELATED as i64).contains(&count) {
        Ok(count as usize)
    } else {
        Err(KeywordPulseError::validation(INVALID_RELATED_COUNT))
    }
}

/// Trending keyword count; absent means 10
pub fn parse_trending_count(value: Option<&str>) -> Result<usize, KeywordPulseError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_COUNT),
        Some(v) => v
            .parse::<usize>()
            .map_err(|_| KeywordPulseError::validation(INVALID_TRENDING_COUNT)),
    }
}

/// Trending category; absent means all
pub fn parse_category(value: Option<&str>) -> Result<TrendCategory, KeywordPulseError> {
    match value.filter(|v| !v.is_empty()) {
        None => Ok(TrendCategory::All),
        Some(v) => TrendCategory::parse(v).ok_or_else(|| KeywordPulseError::validation(INVALID_CATEGORY)),
    }
}

/// Output language; anything but `en` is Korean
pub fn parse_language(value: Option<&str>) -> Language {
    value.and_then(Language::parse).unwrap_or_default()
}

/// Report template; unknown names render the basic template
pub fn parse_template(value: Option<&str>, default: ReportTemplate) -> ReportTemplate {
    match value {
        None => default,
        Some(v) => ReportTemplate::parse(v).unwrap_or(ReportTemplate::Basic),
    }
}

/// Telegram parse mode; absent means HTML
pub fn parse_parse_mode(value: Option<&str>) -> Result<ParseMode, KeywordPulseError> {
    match value.filter(|v| !v.is_empty()) {
        None => Ok(ParseMode::Html),
        Some(v) => ParseMode::parse(v).ok_or_else(|| KeywordPulseError::validation(INVALID_PARSE_MODE)),
    }
}

/// Tracked event type
pub fn parse_event_type(value: Option<&str>) -> Result<EventType, KeywordPulseError> {
    value
        .and_then(EventType::parse)
        .ok_or_else(|| KeywordPulseError::validation(INVALID_EVENT))
}

/// Rating in 1..=5
pub fn validate_rating(rating: Option<i64>) -> Result<Option<u8>, KeywordPulseError> {
    match rating {
        None => Ok(None),
        Some(r) if (1..=5).contains(&r) => Ok(Some(r as u8)),
        Some(_) => Err(KeywordPulseError::validation(INVALID_RATING)),
    }
}

/// Email and password are present and the password is long enough
pub fn validate_credentials<'a>(
    email: Option<&'a str>,
    password: Option<&'a str>,
) -> Result<(&'a str, &'a str), KeywordPulseError> {
    let email = require(email, CREDENTIALS_REQUIRED)?;
    let password = password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| KeywordPulseError::validation(CREDENTIALS_REQUIRED))?;
    Ok((email, password))
}

pub fn validate_new_password(password: &str) -> Result<(), KeywordPulseError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(KeywordPulseError::validation(PASSWORD_TOO_SHORT));
    }
    Ok(())
}

/// Report input rows: objects with a string `keyword` and a numeric `score`
///
/// Other entries are dropped; missing `monthlySearches`/`competitionRate` become 0.
pub fn scored_keywords(values: &[Value]) -> Vec<ScoredKeyword> {
    values
        .iter()
        .filter_map(|value| {
            let keyword = value.get("keyword")?.as_str()?;
            let score = value.get("score")?.as_f64()?;
            let monthly_searches = value
                .get("monthlySearches")
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(|v| v.round() as u64)
                .unwrap_or(0);
            let competition_rate = value
                .get("competitionRate")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            Some(ScoredKeyword {
                keyword: keyword.to_string(),
                monthly_searches,
                competition_rate,
                score,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_trims() {
        assert_eq!(require(Some("  AI "), "x").unwrap(), "AI");
        assert_eq!(
            require(Some("   "), SEARCH_KEYWORD_REQUIRED),
            Err(KeywordPulseError::validation(SEARCH_KEYWORD_REQUIRED))
        );
        assert!(require(None, "x").is_err());
    }

    #[test]
    fn test_time_range() {
        assert_eq!(parse_time_range(None).unwrap(), TimeRange::Month);
        assert_eq!(parse_time_range(Some("day")).unwrap(), TimeRange::Day);
        assert_eq!(
            parse_time_range(Some("decade")),
            Err(KeywordPulseError::validation(INVALID_TIME_RANGE))
        );
    }

    #[test]
    fn test_related_count_bounds() {
        assert_eq!(parse_related_count(None).unwrap(), 10);
        assert_eq!(parse_related_count(Some("1")).unwrap(), 1);
        assert_eq!(parse_related_count(Some("50")).unwrap(), 50);
        assert!(parse_related_count(Some("0")).is_err());
        assert!(parse_related_count(Some("51")).is_err());
        assert!(parse_related_count(Some("many")).is_err());
    }

    #[test]
    fn test_category_and_trending_count() {
        assert_eq!(parse_category(None).unwrap(), TrendCategory::All);
        assert_eq!(parse_category(Some("health")).unwrap(), TrendCategory::Health);
        assert!(parse_category(Some("sports")).is_err());
        assert_eq!(parse_trending_count(Some("3")).unwrap(), 3);
        assert!(parse_trending_count(Some("-1")).is_err());
    }

    #[test]
    fn test_lenient_language_and_template() {
        assert_eq!(parse_language(Some("en")), Language::En);
        assert_eq!(parse_language(Some("jp")), Language::Ko);
        assert_eq!(parse_template(None, ReportTemplate::Detailed), ReportTemplate::Detailed);
        assert_eq!(parse_template(Some("fancy"), ReportTemplate::Detailed), ReportTemplate::Basic);
    }

    #[test]
    fn test_rating() {
        assert_eq!(validate_rating(None).unwrap(), None);
        assert_eq!(validate_rating(Some(5)).unwrap(), Some(5));
        assert!(validate_rating(Some(0)).is_err());
        assert!(validate_rating(Some(6)).is_err());
    }

    #[test]
    fn test_scored_keywords_filters_invalid_entries() {
        let rows = scored_keywords(&[
            json!({"keyword": "a", "score": 81, "monthlySearches": 1200, "competitionRate": 0.3}),
            json!({"keyword": "b", "score": "high"}),
            json!({"score": 50}),
            json!("c"),
            json!({"keyword": "d", "score": 60.5}),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].monthly_searches, 1200);
        assert_eq!(rows[1].keyword, "d");
        assert_eq!(rows[1].monthly_searches, 0);
        assert_eq!(rows[1].competition_rate, 0.0);
    }

    #[test]
    fn test_credentials() {
        assert!(validate_credentials(Some("a@b.c"), Some("secret")).is_ok());
        assert!(validate_credentials(Some(""), Some("secret")).is_err());
        assert!(validate_credentials(Some("a@b.c"), None).is_err());
        assert!(validate_new_password("12345").is_err());
        assert!(validate_new_password("123456").is_ok());
    }
}
