//! Policy engine for deciding whether and how long a notification shows

use crate::config::PolicyConfig;
use crate::protocol::NotificationRequest;
use crate::sink::Notification;

/// Outcome of evaluating a request against the policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Show the notification with its resolved timeout
    Show(Notification),
    /// Suppressed by policy
    Filtered,
}

/// Policy engine that evaluates parsed requests
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    policy: PolicyConfig,
}

impl PolicyEngine {
    pub fn new(policy: PolicyConfig) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Check whether a notification of this type and URL may be displayed
    pub fn should_show(&self, kind: &str, url: Option<&str>) -> bool {
        if !self.policy.show_types.contains(kind) {
            return false;
        }

        if self.policy.require_url && url.map_or(true, str::is_empty) {
            return false;
        }

        true
    }

    /// Resolve the display timeout in seconds; 0 means persistent
    ///
    /// An explicit caller timeout always wins over the per-type table.
    pub fn effective_timeout(&self, kind: &str, explicit: Option<u64>) -> u64 {
        if let Some(secs) = explicit {
            return secs;
        }

        self.policy
            .type_timeouts
            .get(kind)
            .copied()
            .unwrap_or(self.policy.default_timeout)
    }

    /// Decide what to do with a request
    pub fn evaluate(&self, request: NotificationRequest) -> Decision {
        if !self.should_show(&request.kind, request.url.as_deref()) {
            return Decision::Filtered;
        }

        let timeout_secs = self.effective_timeout(&request.kind, request.timeout_secs);

        Decision::Show(Notification {
            title: request.title,
            message: request.message,
            url: request.url,
            timeout_secs,
            kind: request.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::parse_request_line;

    fn default_engine() -> PolicyEngine {
        PolicyEngine::new(PolicyConfig::default())
    }

    #[test]
    fn test_show_types_allow_list() {
        let engine = default_engine();

        assert!(engine.should_show("error", None));
        assert!(engine.should_show("warning", None));
        assert!(engine.should_show("needs_input", None));
        assert!(engine.should_show("task_complete", None));
        assert!(!engine.should_show("info", None));
        assert!(!engine.should_show("success", None));
        assert!(!engine.should_show("custom", Some("https://example.com")));
    }

    #[test]
    fn test_require_url() {
        let engine = PolicyEngine::new(PolicyConfig {
            require_url: true,
            ..PolicyConfig::default()
        });

        assert!(!engine.should_show("error", None));
        assert!(engine.should_show("error", Some("https://example.com")));
        // URL cannot rescue a type that is not allow-listed
        assert!(!engine.should_show("info", Some("https://example.com")));
    }

    #[test]
    fn test_effective_timeout_from_type_table() {
        let engine = default_engine();

        assert_eq!(engine.effective_timeout("info", None), 10);
        assert_eq!(engine.effective_timeout("success", None), 15);
        assert_eq!(engine.effective_timeout("task_start", None), 5);
        assert_eq!(engine.effective_timeout("error", None), 0);
    }

    #[test]
    fn test_effective_timeout_falls_back_to_default() {
        let engine = PolicyEngine::new(PolicyConfig {
            default_timeout: 42,
            ..PolicyConfig::default()
        });

        assert_eq!(engine.effective_timeout("unlisted", None), 42);
        // A zero entry in the table is a real value, not a miss
        assert_eq!(engine.effective_timeout("error", None), 0);
    }

    #[test]
    fn test_explicit_timeout_wins() {
        let engine = default_engine();

        assert_eq!(engine.effective_timeout("info", Some(3)), 3);
        assert_eq!(engine.effective_timeout("error", Some(60)), 60);
        assert_eq!(engine.effective_timeout("info", Some(0)), 0);
    }

    #[test]
    fn test_evaluate_filtered_type() {
        let engine = default_engine();
        let request = parse_request_line("NOTIFY|Build|Compilation finished").unwrap();

        assert_eq!(engine.evaluate(request), Decision::Filtered);
    }

    #[test]
    fn test_evaluate_shown_with_resolved_timeout() {
        let engine = default_engine();
        let request = parse_request_line("NOTIFY|Build|Compilation failed||| error").unwrap();

        match engine.evaluate(request) {
            Decision::Show(notification) => {
                assert_eq!(notification.title, "Build");
                assert_eq!(notification.message, "Compilation failed");
                assert_eq!(notification.kind, "error");
                assert_eq!(notification.timeout_secs, 0);
                assert_eq!(notification.url, None);
            }
            Decision::Filtered => panic!("Expected error notification to show"),
        }
    }

    #[test]
    fn test_evaluate_explicit_timeout_overrides_policy() {
        let engine = default_engine();
        let request = parse_request_line("NOTIFY|Heads up|Disk low||7|warning").unwrap();

        match engine.evaluate(request) {
            Decision::Show(notification) => assert_eq!(notification.timeout_secs, 7),
            Decision::Filtered => panic!("Expected warning notification to show"),
        }
    }
}
