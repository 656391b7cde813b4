//! Console output for the `call`, `models` and `config` commands

use agent_gateway_domain::{ConfigIssue, Envelope, ModelCard};
use colored::Colorize;
use serde::Serialize;

/// Formats gateway data for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One raw envelope as a compact JSON line, exactly as received.
    pub fn envelope_line(envelope: &Envelope) -> String {
        envelope.raw.to_string()
    }

    /// Listed models as `id  owned_by` rows.
    pub fn model_list(cards: &[ModelCard]) -> String {
        if cards.is_empty() {
            return "No models configured\n".dimmed().to_string();
        }
        let width = cards.iter().map(|c| c.id.len()).max().unwrap_or(0);
        let mut output = String::new();
        for card in cards {
            output.push_str(&format!(
                "  {:width$}  {}\n",
                card.id.cyan(),
                card.owned_by.dimmed(),
                width = width
            ));
        }
        output
    }

    /// Startup banner printed by `serve`.
    pub fn server_banner(address: &str, auth: bool) -> String {
        let mut output = format!(
            "{} listening on {}\n",
            "agent-gateway".bold(),
            format!("http://{address}").green()
        );
        if auth {
            output.push_str(&format!("  {} bearer token required\n", "auth:".dimmed()));
        }
        output
    }

    /// Configuration issues, errors first.
    pub fn issues(issues: &[ConfigIssue]) -> String {
        let mut sorted: Vec<&ConfigIssue> = issues.iter().collect();
        sorted.sort_by_key(|issue| !issue.is_error());

        let mut output = String::new();
        for issue in sorted {
            let label = if issue.is_error() {
                "error:".red().bold()
            } else {
                "warning:".yellow().bold()
            };
            output.push_str(&format!("{} {}\n", label, issue.message));
        }
        output
    }

    /// Pretty TOML rendering of any serializable config value.
    pub fn toml<T: Serialize>(value: &T) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(value)
    }

    pub fn section_header(title: &str) -> String {
        format!("{}\n", title.cyan().bold())
    }
}
