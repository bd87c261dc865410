//! Operator console: reads commands from stdin and dispatches them.

use crate::catalog::ServiceCatalog;
use crate::dashboard::Dashboard;
use crate::dispatch::Dispatch;
use crate::view::{NotificationId, RenderTree};

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub const USAGE: &str = "Commands:
  restart <statusKey>   restart one service
  trigger               trigger a manual activator run
  refresh               ask the backend to refresh all statuses
  logs                  show/hide the full activator log
  show                  print the dashboard
  dismiss <id>          dismiss a notification
  help                  print this help
  quit                  exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Restart(String),
    Trigger,
    Refresh,
    Logs,
    Show,
    Dismiss(NotificationId),
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. The error is a hint for the operator.
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "restart" if rest.is_empty() => Err("usage: restart <statusKey>".to_string()),
            "restart" => Ok(Command::Restart(rest.to_string())),
            "trigger" => Ok(Command::Trigger),
            "refresh" => Ok(Command::Refresh),
            "logs" => Ok(Command::Logs),
            "show" | "status" => Ok(Command::Show),
            "dismiss" => rest
                .parse()
                .map(Command::Dismiss)
                .map_err(|_| "usage: dismiss <id>".to_string()),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command '{}', type 'help'", other)),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn report_busy(outcome: Dispatch, what: &str) {
    if outcome == Dispatch::Busy {
        println!("{} is already in progress", what);
    }
}

/// Run the console until `quit`, end of input or Ctrl-C.
///
/// Actions run in the background so the operator can keep issuing commands.
pub async fn run(
    dashboard: &Dashboard,
    catalog: &ServiceCatalog,
    view: &Arc<RenderTree>,
    confirm_restart: bool,
) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", USAGE);

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => break,
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(hint) => {
                println!("{}", hint);
                continue;
            }
        };

        let dispatcher = dashboard.dispatcher();
        match command {
            Command::Restart(key) => {
                let Some(entry) = catalog.get(&key).cloned() else {
                    println!("unknown service '{}'", key);
                    continue;
                };
                if confirm_restart {
                    let d = &entry.descriptor;
                    println!(
                        "Are you sure you want to restart the service \"{}\" on server \"{}\" ({})? [y/N]",
                        d.service_name, d.server_name, d.server_ip
                    );
                    let answer = lines.next_line().await?.unwrap_or_default();
                    if !is_yes(&answer) {
                        continue;
                    }
                }
                tokio::spawn(async move {
                    let outcome = dispatcher
                        .restart_service(&entry.status_key, &entry.descriptor)
                        .await;
                    report_busy(outcome, &format!("restart of {}", entry.status_key));
                });
            }
            Command::Trigger => {
                tokio::spawn(async move {
                    report_busy(dispatcher.trigger_manual_restart().await, "manual restart");
                });
            }
            Command::Refresh => {
                tokio::spawn(async move {
                    report_busy(dispatcher.refresh_status().await, "status refresh");
                });
            }
            Command::Logs => {
                tokio::spawn(async move {
                    report_busy(dispatcher.toggle_logs().await, "log view");
                });
            }
            Command::Show => print!("{}", view.render_text()),
            Command::Dismiss(id) => {
                if !dashboard.notices().dismiss(id) {
                    println!("no notification #{}", id);
                }
            }
            Command::Help => println!("{}", USAGE),
            Command::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("restart billing|prod|web1|nginx"),
            Ok(Command::Restart("billing|prod|web1|nginx".to_string()))
        );
        assert_eq!(
            Command::parse("  RESTART   my app|prod|web 1|svc  "),
            Ok(Command::Restart("my app|prod|web 1|svc".to_string()))
        );
        assert_eq!(Command::parse("trigger"), Ok(Command::Trigger));
        assert_eq!(Command::parse("refresh"), Ok(Command::Refresh));
        assert_eq!(Command::parse("logs"), Ok(Command::Logs));
        assert_eq!(Command::parse("show"), Ok(Command::Show));
        assert_eq!(Command::parse("dismiss 4"), Ok(Command::Dismiss(4)));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("restart").is_err());
        assert!(Command::parse("dismiss soon").is_err());
        let err = Command::parse("reboot everything").unwrap_err();
        assert!(err.contains("reboot"));
    }

    #[test]
    fn test_confirmation_answers() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }
}
