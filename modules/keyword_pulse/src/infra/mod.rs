//! Infrastructure layer - adapters for the external services

pub mod sheets;
pub mod supabase;
pub mod telegram;

pub use sheets::StubSheetsExporter;
pub use supabase::SupabaseClient;
pub use telegram::TelegramClient;

use crate::contract::UpstreamError;

/// Classify a reqwest failure
pub(crate) fn request_error(err: reqwest::Error) -> UpstreamError {
    if err.is_decode() {
        UpstreamError::Decode(err.to_string())
    } else {
        UpstreamError::Transport(err.to_string())
    }
}
