const MAX_ERROR_MESSAGE_LEN: usize = 256;

pub(crate) fn truncate_message(body: &str) -> String {
    let compact = body.trim().replace('\n', " ");
    compact.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
}

pub(crate) fn non_empty(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}

pub(crate) fn elapsed_millis(started: std::time::Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::{non_empty, truncate_message};

    #[test]
    fn truncate_message_compacts_newlines_and_limits_length() {
        let input = "line-1\nline-2";
        let truncated = truncate_message(input);

        assert_eq!(truncated, "line-1 line-2");

        let long = "x".repeat(512);
        let truncated = truncate_message(&long);
        assert_eq!(truncated.len(), 256);
    }

    #[test]
    fn non_empty_keeps_surrounding_whitespace() {
        assert_eq!(non_empty("  text \n"), Some("  text \n"));
        assert_eq!(non_empty(" \n"), None);
    }
}
