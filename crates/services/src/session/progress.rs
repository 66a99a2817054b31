use assess_core::Severity;
use assess_core::model::SessionState;

/// Aggregated view of an attempt, useful for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionProgress {
    pub state: SessionState,
    pub current_index: usize,
    pub question_count: usize,
    pub answered: usize,
    pub completion_percent: f64,
    pub remaining_secs: u32,
    pub remaining_display: String,
    pub severity: Severity,
}
