//! Per-resource view state with stale-preservation semantics

/// State one synchronizer keeps for its page.
///
/// On fetch failure `value` retains its previous contents while `error` is
/// set; on success `value` is replaced and `error` cleared. `loading` is true
/// only until the first cycle resolves, so the shell shows a full spinner
/// only when there is no cached value to display.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    pub value: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> ViewState<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            loading: true,
            error: None,
        }
    }

    /// Replace the value and clear any prior error
    pub fn apply_success(&mut self, value: T) {
        self.value = Some(value);
        self.error = None;
        self.loading = false;
    }

    /// Record a failed cycle; the last good value stays untouched
    pub fn apply_failure(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
        self.loading = false;
    }

    /// True before the very first cycle has resolved
    pub fn is_first_load(&self) -> bool {
        self.loading && self.value.is_none()
    }
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state: ViewState<u32> = ViewState::new();
        assert!(state.value.is_none());
        assert!(state.loading);
        assert!(state.error.is_none());
        assert!(state.is_first_load());
    }

    #[test]
    fn test_success_replaces_and_clears_error() {
        let mut state = ViewState::new();
        state.apply_failure("boom");
        state.apply_success(41);
        state.apply_success(42);
        assert_eq!(state.value, Some(42));
        assert!(state.error.is_none());
        assert!(!state.loading);
    }

    #[test]
    fn test_failure_preserves_value() {
        let mut state = ViewState::new();
        state.apply_success(vec![1, 2, 3]);
        state.apply_failure("request timed out");
        assert_eq!(state.value, Some(vec![1, 2, 3]));
        assert_eq!(state.error.as_deref(), Some("request timed out"));
        assert!(!state.is_first_load());
    }
}
