/// Hard ceiling on rows fetched by a single list command.
pub const MAX_LIMIT: u32 = 500;

/// Compute effective limit with precedence: local arg -> global flag ->
/// configured default, capped at [`MAX_LIMIT`].
#[must_use]
pub fn effective_limit(local: Option<u32>, global: Option<u32>, fallback: u32) -> u32 {
    local.or(global).unwrap_or(fallback).clamp(1, MAX_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::{MAX_LIMIT, effective_limit};

    #[test]
    fn local_takes_precedence() {
        assert_eq!(effective_limit(Some(5), Some(10), 20), 5);
    }

    #[test]
    fn global_used_when_local_missing() {
        assert_eq!(effective_limit(None, Some(10), 20), 10);
    }

    #[test]
    fn fallback_used_when_none_set() {
        assert_eq!(effective_limit(None, None, 20), 20);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(effective_limit(Some(0), None, 20), 1);
        assert_eq!(effective_limit(Some(10_000), None, 20), MAX_LIMIT);
    }
}
