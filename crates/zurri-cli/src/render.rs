//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use zurri_chat::api::{Agent, FundingSession, Transaction, Wallet};
use zurri_chat::{Message, StagedInfo};
use zurri_config::ChatConfig;

/// Coarse relative time: "just now", "5m ago", "3h ago", "2d ago".
pub fn format_relative(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

pub fn format_message(message: &Message, options: &ChatConfig, now: DateTime<Utc>) -> String {
    let mut out = format!("[{}] {}", message.role, message.content);
    if message.is_pending() {
        out.push_str("  (sending)");
    } else if options.show_timestamps {
        let _ = write!(out, "  ({})", format_relative(message.created_at, now));
    }
    if options.show_attachments {
        for file in &message.attachments {
            let _ = write!(out, "\n    attachment: {} <{}>", file.name, file.reference);
        }
    }
    out
}

pub fn format_staged(index: usize, staged: &StagedInfo) -> String {
    let mut out = format!(
        "{}. {} ({}, {})",
        index + 1,
        staged.name,
        staged.mime_type,
        format_size(staged.byte_size)
    );
    if let Some(uri) = &staged.preview_uri {
        let _ = write!(out, " preview: {uri}");
    }
    out
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

pub fn agent_line(agent: &Agent) -> String {
    format!(
        "{:<26} {:<28} {:>4.1}  {:>4} pts  {}",
        agent.id,
        agent.name,
        agent.reputation,
        agent.points_per_task,
        agent.category.as_deref().unwrap_or("-")
    )
}

pub fn agent_detail(agent: &Agent) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", agent.name, agent.id);
    let _ = writeln!(out, "  status:     {}", wire_name(&agent.status));
    if let Some(category) = &agent.category {
        let _ = writeln!(out, "  category:   {category}");
    }
    let _ = writeln!(
        out,
        "  reputation: {:.1} ({} ratings)",
        agent.reputation, agent.rating_count
    );
    let _ = writeln!(out, "  cost:       {} points per task", agent.points_per_task);
    let _ = writeln!(out, "  used:       {} times", agent.usage_count);
    if !agent.capabilities.is_empty() {
        let _ = writeln!(out, "  can:        {}", agent.capabilities.join(", "));
    }
    if !agent.description.is_empty() {
        let _ = write!(out, "\n{}", agent.description);
    }
    out.trim_end().to_string()
}

pub fn wallet_summary(wallet: &Wallet) -> String {
    format!(
        "Balance: {} points (${:.2}), {} free tasks remaining",
        wallet.balance, wallet.balance_in_dollars, wallet.free_tasks_remaining
    )
}

pub fn funding_summary(session: &FundingSession) -> String {
    let payment = &session.payment;
    format!(
        "{} {} buys {} points (${})\nComplete payment at {}",
        payment.amount,
        payment.currency,
        payment.points,
        payment.amount_in_dollars,
        session.authorization_url
    )
}

pub fn transaction_line(tx: &Transaction, now: DateTime<Utc>) -> String {
    let when = tx
        .created_at
        .map(|at| format_relative(at, now))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>+6}  {:<10} {:<9} {:>8}  {}  {}",
        tx.amount,
        wire_name(&tx.kind),
        wire_name(&tx.status),
        tx.balance_after,
        when,
        tx.description.as_deref().unwrap_or("")
    )
}

/// A unit enum's wire name.
fn wire_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => "?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use zurri_chat::{MessageId, RemoteAttachment, Role};

    use super::*;

    fn message(content: &str, at: DateTime<Utc>) -> Message {
        Message {
            id: MessageId::Remote("m1".into()),
            role: Role::Assistant,
            content: content.into(),
            agent_id: "a1".into(),
            conversation_id: None,
            attachments: vec![RemoteAttachment {
                reference: "https://cdn/r.pdf".into(),
                name: "r.pdf".into(),
                mime_type: None,
            }],
            metadata: None,
            created_at: at,
        }
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(format_relative(now - Duration::seconds(20), now), "just now");
        assert_eq!(format_relative(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(format_relative(now - Duration::hours(3), now), "3h ago");
        assert_eq!(format_relative(now - Duration::days(2), now), "2d ago");
    }

    #[test]
    fn future_timestamps_read_as_now() {
        let now = Utc::now();
        assert_eq!(format_relative(now + Duration::minutes(3), now), "just now");
    }

    #[test]
    fn message_shows_time_and_attachments() {
        let now = Utc::now();
        let text = format_message(
            &message("here", now - Duration::minutes(5)),
            &ChatConfig::default(),
            now,
        );
        assert_eq!(
            text,
            "[assistant] here  (5m ago)\n    attachment: r.pdf <https://cdn/r.pdf>"
        );
    }

    #[test]
    fn display_options_are_honoured() {
        let now = Utc::now();
        let options = ChatConfig {
            show_timestamps: false,
            show_attachments: false,
        };
        assert_eq!(
            format_message(&message("here", now), &options, now),
            "[assistant] here"
        );
    }

    #[test]
    fn funding_summary_shows_checkout_link() {
        let session: FundingSession = serde_json::from_value(serde_json::json!({
            "reference": "ref-1",
            "authorization_url": "https://checkout.example.com/ref-1",
            "payment": {
                "reference": "ref-1",
                "amount": 5000,
                "currency": "NGN",
                "points": 330,
                "amountInDollars": "3.30"
            }
        }))
        .unwrap();
        assert_eq!(
            funding_summary(&session),
            "5000 NGN buys 330 points ($3.30)\nComplete payment at https://checkout.example.com/ref-1"
        );
    }

    #[test]
    fn staged_line_is_one_based() {
        let staged = StagedInfo {
            name: "a.png".into(),
            byte_size: 2048,
            mime_type: "image/png".into(),
            preview_uri: None,
        };
        assert_eq!(format_staged(0, &staged), "1. a.png (image/png, 2.0 KB)");
    }
}
