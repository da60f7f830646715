//! Terminal implementations of the core's presentation seams.

use async_trait::async_trait;
use feedback_core::{AttachmentView, Confirm, ListView, Notification, NotificationLevel, Notifier};
use std::io::{BufRead, Write};

/// Prints notifications as single status lines. Errors go to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => println!("✔ {}", notification.message),
            NotificationLevel::Error => eprintln!("✘ {}", notification.message),
        }
    }
}

/// Asks on stdin and accepts `y` or `yes`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let prompt = format!("{prompt} [y/N] ");
        match tokio::task::spawn_blocking(move || prompt_line(&prompt)).await {
            Ok(Ok(answer)) => is_yes(&answer),
            Ok(Err(e)) => {
                tracing::error!("failed to read confirmation: {}", e);
                false
            }
            Err(e) => {
                tracing::error!("confirmation prompt aborted: {}", e);
                false
            }
        }
    }
}

/// Confirms without asking, for `--yes`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

#[async_trait]
impl Confirm for AssumeYes {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Write `prompt` to stdout and read one line from stdin, without the line ending.
pub fn prompt_line(prompt: &str) -> std::io::Result<String> {
    let mut stdout = std::io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Text rendering of the moderation list.
pub fn render_list(view: &ListView) -> String {
    match view {
        ListView::Loading => "Loading feedback...".to_string(),
        ListView::Error(message) => message.clone(),
        ListView::Empty => "No feedback found.".to_string(),
        ListView::Entries(rows) => {
            let mut out = String::new();
            for row in rows {
                out.push_str(&format!("[{}] {}\n", row.category, row.id));
                out.push_str(&format!("  {}\n", row.body));
                out.push_str(&format!(
                    "  Name: {}  Email: {}  Date: {}\n",
                    row.name, row.email, row.date
                ));
                match &row.attachment {
                    Some(AttachmentView::InlineImage { url, .. }) => {
                        out.push_str(&format!("  Image: {url}\n"));
                    }
                    Some(AttachmentView::ExternalLink { url, label }) => {
                        out.push_str(&format!("  {label}: {url}\n"));
                    }
                    None => {}
                }
            }
            out
        }
    }
}
