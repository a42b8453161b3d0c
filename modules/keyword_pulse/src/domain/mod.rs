//! Domain layer - business logic and services

pub mod analysis;
pub mod analytics;
pub mod formatting;
pub mod repository;
pub mod scoring;
pub mod service;
pub mod trends;
pub mod validation;

pub use analytics::{AnalyticsEvent, AnalyticsPublisher, TracingAnalyticsPublisher};
pub use repository::{
    AuthProvider, FeedbackRepository, ProfileRepository, SheetsExporter, TelegramGateway,
};
pub use service::{Ports, Service};
