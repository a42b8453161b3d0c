//! Telegram message formatting
//!
//! All templates produce Telegram HTML. Values coming from callers are escaped
//! before they are placed inside markup.

use super::analysis::format_number;
use crate::contract::{NewFeedback, TrendChange};
use chrono::{DateTime, FixedOffset, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

/// Hard limit of the Bot API for one message
pub const MAX_MESSAGE_CHARS: usize = 4096;
/// Length kept when a message has to be truncated
const TRUNCATED_CHARS: usize = 4090;
/// Part size used when splitting long messages
pub const SPLIT_PART_CHARS: usize = 4000;

pub const CONTINUED_SUFFIX: &str = "\n\n(계속...)";
pub const CONTINUATION_PREFIX: &str = "(...계속)\n\n";

pub const DEFAULT_BROADCAST_MESSAGE: &str = "이것은 KeywordPulse에서 보낸 테스트 메시지입니다.";

static BOLD: Lazy<Regex> = Lazy::new(|| pattern(r"\*\*(.*?)\*\*"));
static ITALIC: Lazy<Regex> = Lazy::new(|| pattern(r"\*(.*?)\*"));
static CODE: Lazy<Regex> = Lazy::new(|| pattern(r"`(.*?)`"));
static NUMERIC_CHAT_ID: Lazy<Regex> = Lazy::new(|| pattern(r"^-?[0-9]+$"));
static USERNAME_CHAT_ID: Lazy<Regex> = Lazy::new(|| pattern(r"^@[a-zA-Z0-9_]{4,}$"));

#[allow(clippy::expect_used)]
fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static pattern compiles")
}

/// Escape `&`, `<` and `>` for Telegram HTML
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Convert inline markdown (`**bold**`, `*italic*`, `` `code` ``) to Telegram HTML
pub fn markdown_to_html(markdown: &str) -> String {
    let text = BOLD.replace_all(markdown, "<b>$1</b>");
    let text = ITALIC.replace_all(&text, "<i>$1</i>");
    CODE.replace_all(&text, "<code>$1</code>").into_owned()
}

/// Cut text above the Bot API limit to 4090 characters plus `...`
pub fn truncate_message(text: &str) -> String {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return text.to_string();
    }
    tracing::warn!("Telegram message exceeds {} characters and is truncated", MAX_MESSAGE_CHARS);
    let mut cut: String = text.chars().take(TRUNCATED_CHARS).collect();
    cut.push_str("...");
    cut
}

/// Split text into parts of at most `max_chars` characters plus continuation markers
///
/// Breaks prefer the last newline, then the last `". "`, then the last space, each
/// only when it lies past the half-way mark of the part.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars || max_chars == 0 {
        return vec![text.to_string()];
    }

    let mut pieces = Vec::new();
    let mut rest: &[char] = &chars;
    while !rest.is_empty() {
        let split = if rest.len() > max_chars {
            split_point(rest, max_chars)
        } else {
            rest.len()
        };
        pieces.push(rest[..split].iter().collect::<String>());
        rest = &rest[split..];
    }

    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| {
            if i == 0 {
                format!("{}{}", piece, CONTINUED_SUFFIX)
            } else {
                format!("{}{}", CONTINUATION_PREFIX, piece)
            }
        })
        .collect()
}

fn split_point(rest: &[char], max_chars: usize) -> usize {
    let half = max_chars / 2;
    let window = &rest[..max_chars];

    let last_newline = window.iter().rposition(|c| *c == '\n');
    if let Some(i) = last_newline.filter(|i| *i > half) {
        return i + 1;
    }

    let last_period = window.windows(2).rposition(|w| w[0] == '.' && w[1] == ' ');
    if let Some(i) = last_period.filter(|i| *i > half) {
        return i + 2;
    }

    let last_space = window.iter().rposition(|c| *c == ' ');
    if let Some(i) = last_space.filter(|i| *i > half) {
        return i + 1;
    }

    max_chars
}

/// Analysis notification for a keyword
pub fn format_analysis_notification(keyword: &str, score: f64, trends: &[TrendChange]) -> String {
    let mut message = String::from("<b>키워드 분석 결과</b>\n\n");
    let _ = writeln!(message, "<b>키워드:</b> {}", escape_html(keyword));
    let _ = write!(message, "<b>점수:</b> {}\n\n", format_number(score));

    if !trends.is_empty() {
        message.push_str("<b>트렌드 변화:</b>\n");
        for trend in trends {
            let symbol = if trend.change > 0.0 {
                "📈"
            } else if trend.change < 0.0 {
                "📉"
            } else {
                "➡️"
            };
            let _ = writeln!(
                message,
                "{}: {} {}%",
                escape_html(&trend.period),
                symbol,
                format_number(trend.change.abs())
            );
        }
    }

    message.push_str("\n<i>자세한 분석 결과는 KeywordPulse 웹사이트에서 확인하세요</i>");
    message
}

/// Convert a markdown report to HTML and add the KeywordPulse header and footer
pub fn wrap_report(markdown: &str) -> String {
    let html = markdown_to_html(&escape_html(markdown));
    format!(
        "<b>🔍 KeywordPulse 분석 결과</b>\n\n{}\n\n<i>KeywordPulse에서 더 자세한 분석을 확인하세요.</i>",
        html
    )
}

/// Error notice for chat delivery
pub fn format_error_message(message: &str) -> String {
    format!(
        "\n<b>❌ 오류 발생</b>\n\n{}\n\n오류가 계속되면 관리자에게 문의하세요.\n",
        escape_html(message)
    )
}

/// User-facing explanation of a Bot API error code
pub fn telegram_error_message(code: u16) -> String {
    match code {
        400 => "잘못된 요청입니다. 매개변수를 확인하세요.".to_string(),
        401 => "인증에 실패했습니다. 올바른 봇 토큰을 사용하고 있는지 확인하세요.".to_string(),
        403 => "권한이 없습니다. 봇이 해당 채팅방에 추가되었는지 확인하세요.".to_string(),
        404 => "사용자 또는 채팅방을 찾을 수 없습니다. 채팅 ID를 확인하세요.".to_string(),
        409 => "충돌이 발생했습니다. 나중에 다시 시도하세요.".to_string(),
        429 => "너무 많은 요청을 보냈습니다. 잠시 후 다시 시도하세요.".to_string(),
        500 | 502 | 503 | 504 => {
            "텔레그램 서버 오류가 발생했습니다. 나중에 다시 시도하세요.".to_string()
        }
        other => format!("알 수 없는 오류가 발생했습니다. (오류 코드: {})", other),
    }
}

/// Admin alert for newly stored feedback
pub fn format_feedback_alert(feedback: &NewFeedback) -> String {
    let mut message = String::from("📝 <b>새 피드백 접수</b>\n\n");
    let _ = writeln!(message, "<b>내용:</b> {}", escape_html(&feedback.text));
    if let Some(name) = &feedback.name {
        let _ = writeln!(message, "<b>이름:</b> {}", escape_html(name));
    }
    if let Some(email) = &feedback.email {
        let _ = writeln!(message, "<b>이메일:</b> {}", escape_html(email));
    }
    if let Some(rating) = feedback.rating {
        let _ = writeln!(message, "<b>평점:</b> {}/5", rating);
    }
    let _ = writeln!(message, "<b>카테고리:</b> {}", escape_html(&feedback.category));
    if let Some(page) = &feedback.page {
        let _ = writeln!(message, "<b>페이지:</b> {}", escape_html(page));
    }
    let _ = write!(message, "<b>시간:</b> {}", korean_time(feedback.created_at));
    message
}

/// Default message of the connection test
pub fn default_test_message(now: DateTime<Utc>) -> String {
    format!(
        "<b>KeywordPulse 텔레그램 연결 테스트</b>\n\n\
         ✅ 성공적으로 연결되었습니다!\n\
         🔔 이제 키워드 분석 결과를 이 채팅으로 받을 수 있습니다.\n\n\
         ✨ <i>현재 시간: {}</i>",
        korean_time(now)
    )
}

/// Timestamp in Korean Standard Time, e.g. `2024. 3. 31. 23:05:00`
pub fn korean_time(at: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(9 * 3600) {
        Some(kst) => at.with_timezone(&kst).format("%Y. %-m. %-d. %H:%M:%S").to_string(),
        None => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    }
}

/// Numeric chat id (optionally negative) or `@username` with at least four word characters
pub fn is_valid_chat_id(chat_id: &str) -> bool {
    NUMERIC_CHAT_ID.is_match(chat_id) || USERNAME_CHAT_ID.is_match(chat_id)
}

/// Korean label of a Telegram chat type
pub fn chat_type_label(chat_type: &str) -> &str {
    match chat_type {
        "private" => "개인",
        "group" => "그룹",
        "supergroup" => "슈퍼그룹",
        "channel" => "채널",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_markdown_to_html() {
        assert_eq!(
            markdown_to_html("**굵게** 그리고 *기울임* `code`"),
            "<b>굵게</b> 그리고 <i>기울임</i> <code>code</code>"
        );
        assert_eq!(markdown_to_html("plain"), "plain");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & c > d"), "a &lt; b &amp; c &gt; d");
    }

    #[test]
    fn test_truncate_message() {
        let short = "가".repeat(MAX_MESSAGE_CHARS);
        assert_eq!(truncate_message(&short), short);

        let long = "가".repeat(MAX_MESSAGE_CHARS + 1);
        let cut = truncate_message(&long);
        assert_eq!(cut.chars().count(), 4093);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_split_short_message_is_single_part() {
        assert_eq!(split_message("hello", 10), vec!["hello"]);
    }

    #[test]
    fn test_split_prefers_newline_past_half() {
        let text = format!("{}\n{}", "a".repeat(7), "b".repeat(6));
        let parts = split_message(&text, 10);

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], format!("{}\n{}", "a".repeat(7), CONTINUED_SUFFIX));
        assert_eq!(parts[1], format!("{}{}", CONTINUATION_PREFIX, "b".repeat(6)));
    }

    #[test]
    fn test_split_ignores_early_newline() {
        let text = format!("ab\n{}", "c".repeat(20));
        let parts = split_message(&text, 10);
        assert_eq!(parts[0], format!("ab\n{}{}", "c".repeat(7), CONTINUED_SUFFIX));
    }

    #[test]
    fn test_split_parts_respect_limit() {
        let sentence = "키워드 분석은 중요합니다. ";
        let text = sentence.repeat(600);
        let parts = split_message(&text, SPLIT_PART_CHARS);

        assert!(parts.len() > 1);
        let marker = CONTINUED_SUFFIX.chars().count().max(CONTINUATION_PREFIX.chars().count());
        for part in &parts {
            assert!(part.chars().count() <= SPLIT_PART_CHARS + marker);
        }
        let rejoined: String = parts
            .iter()
            .map(|p| {
                p.trim_start_matches(CONTINUATION_PREFIX)
                    .trim_end_matches(CONTINUED_SUFFIX)
                    .to_string()
            })
            .collect();
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_analysis_notification() {
        let message = format_analysis_notification(
            "AI <도구>",
            85.0,
            &[
                TrendChange {
                    period: "1주".to_string(),
                    change: 12.5,
                },
                TrendChange {
                    period: "1개월".to_string(),
                    change: -3.0,
                },
                TrendChange {
                    period: "1년".to_string(),
                    change: 0.0,
                },
            ],
        );

        assert!(message.starts_with("<b>키워드 분석 결과</b>\n\n<b>키워드:</b> AI &lt;도구&gt;\n<b>점수:</b> 85\n\n"));
        assert!(message.contains("<b>트렌드 변화:</b>\n1주: 📈 12.5%\n1개월: 📉 3%\n1년: ➡️ 0%\n"));
        assert!(message.ends_with("<i>자세한 분석 결과는 KeywordPulse 웹사이트에서 확인하세요</i>"));
    }

    #[test]
    fn test_analysis_notification_without_trends() {
        let message = format_analysis_notification("캠핑", 0.0, &[]);
        assert!(!message.contains("트렌드 변화"));
    }

    #[test]
    fn test_wrap_report() {
        let wrapped = wrap_report("## 제목\n- **굵게**");
        assert!(wrapped.starts_with("<b>🔍 KeywordPulse 분석 결과</b>\n\n## 제목\n- <b>굵게</b>"));
        assert!(wrapped.ends_with("<i>KeywordPulse에서 더 자세한 분석을 확인하세요.</i>"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(telegram_error_message(403), "권한이 없습니다. 봇이 해당 채팅방에 추가되었는지 확인하세요.");
        assert_eq!(telegram_error_message(502), telegram_error_message(504));
        assert_eq!(telegram_error_message(418), "알 수 없는 오류가 발생했습니다. (오류 코드: 418)");
    }

    #[test]
    fn test_error_message_wrapper() {
        assert_eq!(
            format_error_message("실패"),
            "\n<b>❌ 오류 발생</b>\n\n실패\n\n오류가 계속되면 관리자에게 문의하세요.\n"
        );
    }

    #[test]
    fn test_chat_id_formats() {
        for valid in ["123456", "-1001234567890", "@keyword_bot", "@abcd"] {
            assert!(is_valid_chat_id(valid), "{valid} should be valid");
        }
        for invalid in ["", "12a", "@abc", "keyword_bot", "@bad-name", "- 12"] {
            assert!(!is_valid_chat_id(invalid), "{invalid} should be invalid");
        }
    }

    #[test]
    fn test_feedback_alert_skips_missing_fields() {
        let feedback = NewFeedback {
            text: "좋아요 <3".to_string(),
            email: None,
            name: Some("홍길동".to_string()),
            rating: Some(5),
            category: "일반".to_string(),
            page: None,
            ip: None,
            user_agent: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 31, 14, 5, 0).unwrap(),
        };
        let alert = format_feedback_alert(&feedback);

        assert!(alert.contains("<b>내용:</b> 좋아요 &lt;3\n"));
        assert!(alert.contains("<b>이름:</b> 홍길동\n"));
        assert!(alert.contains("<b>평점:</b> 5/5\n"));
        assert!(!alert.contains("이메일"));
        assert!(alert.ends_with("<b>시간:</b> 2024. 3. 31. 23:05:00"));
    }

    #[test]
    fn test_chat_type_labels() {
        assert_eq!(chat_type_label("supergroup"), "슈퍼그룹");
        assert_eq!(chat_type_label("unknown"), "unknown");
    }
}
