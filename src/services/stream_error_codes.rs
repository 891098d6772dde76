use crate::enums::stream_error_code::StreamErrorCode;

const BUDGET_PATTERNS: &[&str] = &["exceeded your current quota", "insufficient_quota", "billing"];
const RATE_LIMIT_PATTERNS: &[&str] = &["rate limit", "rate_limit", "too many requests"];
const CONTEXT_LENGTH_PATTERNS: &[&str] = &["context length", "context_length_exceeded", "maximum context"];

/// Code for a provider run-failure message, matched case-insensitively.
pub fn map_stream_error_code(message: &str) -> StreamErrorCode {
    let message = message.to_lowercase();
    let matches = |patterns: &[&str]| patterns.iter().any(|pattern| message.contains(pattern));

    if matches(BUDGET_PATTERNS) {
        StreamErrorCode::BudgetExceeded
    } else if matches(RATE_LIMIT_PATTERNS) {
        StreamErrorCode::RateLimited
    } else if matches(CONTEXT_LENGTH_PATTERNS) {
        StreamErrorCode::ContextLengthExceeded
    } else {
        StreamErrorCode::RunFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_provider_messages() {
        assert_eq!(
            map_stream_error_code("You exceeded your current quota, please check your plan"),
            StreamErrorCode::BudgetExceeded
        );
        assert_eq!(
            map_stream_error_code("Rate limit reached for gpt-4o in organization"),
            StreamErrorCode::RateLimited
        );
        assert_eq!(
            map_stream_error_code("This model's maximum context length is 128000 tokens"),
            StreamErrorCode::ContextLengthExceeded
        );
        assert_eq!(map_stream_error_code("Something odd happened"), StreamErrorCode::RunFailed);
    }
}
