//! Log line parsing and the log table.

use super::{LogEntry, View};

use std::sync::Arc;

/// Placeholder for a line without a usable timestamp.
pub const NO_TIMESTAMP: &str = "N/A";

/// Split a raw activator log line into timestamp and message.
///
/// `"[ts] message"` yields `ts` and the trimmed remainder. Anything else is
/// kept whole as the message with an `N/A` timestamp.
pub fn parse_log_line(line: &str) -> LogEntry {
    if line.starts_with('[') {
        if let Some(end) = line.find(']') {
            let timestamp = &line[1..end];
            return LogEntry {
                timestamp: if timestamp.is_empty() {
                    NO_TIMESTAMP.to_string()
                } else {
                    timestamp.to_string()
                },
                message: line[end + 1..].trim().to_string(),
            };
        }
    }

    LogEntry {
        timestamp: NO_TIMESTAMP.to_string(),
        message: line.to_string(),
    }
}

/// Renders raw log lines into the view's log table.
#[derive(Clone)]
pub struct LogReconciler {
    view: Arc<dyn View>,
}

impl LogReconciler {
    pub fn new(view: Arc<dyn View>) -> Self {
        Self { view }
    }

    /// Replace the table body with one row per line, in input order.
    pub fn render(&self, lines: &[String]) {
        let rows = lines.iter().map(|line| parse_log_line(line)).collect();
        self.view.replace_log_rows(rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::RenderTree;

    #[test]
    fn test_parse_bracketed_timestamp() {
        let entry = parse_log_line("[2024-01-01T00:00:00Z] disk check ok");
        assert_eq!(entry.timestamp, "2024-01-01T00:00:00Z");
        assert_eq!(entry.message, "disk check ok");
    }

    #[test]
    fn test_parse_without_timestamp() {
        let entry = parse_log_line("no timestamp here");
        assert_eq!(entry.timestamp, "N/A");
        assert_eq!(entry.message, "no timestamp here");
    }

    #[test]
    fn test_parse_malformed_lines() {
        // Unclosed bracket stays whole.
        let entry = parse_log_line("[2024-01-01 restart pending");
        assert_eq!(entry.timestamp, "N/A");
        assert_eq!(entry.message, "[2024-01-01 restart pending");

        // Bracket not at the start is not a timestamp.
        let entry = parse_log_line("restart [web1] failed");
        assert_eq!(entry.timestamp, "N/A");

        let entry = parse_log_line("[]   empty stamp ");
        assert_eq!(entry.timestamp, "N/A");
        assert_eq!(entry.message, "empty stamp");

        let entry = parse_log_line("[2024-01-04T16:30] ");
        assert_eq!(entry.timestamp, "2024-01-04T16:30");
        assert_eq!(entry.message, "");

        let entry = parse_log_line("");
        assert_eq!(entry.message, "");
    }

    #[test]
    fn test_render_replaces_in_order() {
        let tree = Arc::new(RenderTree::new(Vec::new()));
        let reconciler = LogReconciler::new(tree.clone());

        reconciler.render(&["[t1] first".to_string(), "[t2] second".to_string()]);
        assert_eq!(tree.log_rows().len(), 2);

        let lines = vec![
            "[t3] c".to_string(),
            "plain".to_string(),
            "[t3] c".to_string(),
        ];
        reconciler.render(&lines);
        let messages: Vec<_> = tree.log_rows().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["c", "plain", "c"]);

        reconciler.render(&[]);
        assert!(tree.log_rows().is_empty());
    }
}
