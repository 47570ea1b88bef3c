//! Plain-text rendering of a synchronizer snapshot

use chrono::{DateTime, Utc};
use std::fmt::Write;

use chatdesk_core::{Message, Role, SyncSnapshot};

pub const HELP: &str = "\
Type a message and press Enter to chat.
  /new                start a new chat
  /list               show chats
  /switch <n|id>      open a chat
  /rename <n|id>      rename a chat (next line is the title, empty line cancels)
  /delete <n|id>      delete a chat
  /cancel             leave rename mode
  /help               this text
  /quit               exit";

pub fn render(snapshot: &SyncSnapshot) {
    print!("{}", format_view(snapshot, Utc::now()));
}

pub fn render_sessions(snapshot: &SyncSnapshot) {
    print!("{}", format_sessions(snapshot, Utc::now()));
}

pub fn format_view(snapshot: &SyncSnapshot, now: DateTime<Utc>) -> String {
    let mut out = format_sessions(snapshot, now);

    out.push('\n');
    if snapshot.messages.is_empty() {
        out.push_str("  No messages yet. Start the conversation!\n");
    }
    for message in &snapshot.messages {
        let _ = writeln!(out, "{}", format_message(message));
    }

    if let Some(status) = &snapshot.status {
        let _ = writeln!(out, "[{status}]");
    }

    out
}

pub fn format_sessions(snapshot: &SyncSnapshot, now: DateTime<Utc>) -> String {
    let mut out = String::from("Chats\n");

    for (i, session) in snapshot.sessions.iter().enumerate() {
        let marker = if session.id == snapshot.active_session_id {
            '*'
        } else {
            ' '
        };
        let title = match &snapshot.editing {
            Some(draft) if draft.session_id == session.id => format!("{} (renaming)", session.title),
            _ => session.title.clone(),
        };
        let _ = writeln!(
            out,
            "{marker} {:>2}. {}  ·  {}  ·  {} messages",
            i + 1,
            title,
            relative_time(session.updated_at_utc(), now),
            session.message_count
        );
    }

    if snapshot.sessions.is_empty() {
        out.push_str("  (none)\n");
    }

    out
}

fn format_message(message: &Message) -> String {
    let label = match message.role {
        Role::User => "you",
        Role::Assistant => "bot",
    };

    let content = if message.content.is_empty() && message.streaming {
        "Responding..."
    } else {
        message.content.as_str()
    };

    format!("{label}> {content}")
}

/// Short age of a timestamp: "just now", "5 min ago", "today", "yesterday",
/// "3 days ago", then a plain date
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if hours < 1 {
        format!("{minutes} min ago")
    } else if days == 0 {
        "today".to_string()
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 7 {
        format!("{days} days ago")
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatdesk_core::{RenameDraft, Session};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn session(id: &str, title: &str, updated: DateTime<Utc>, count: u64) -> Session {
        let at = updated.timestamp() as f64;
        Session {
            id: id.to_string(),
            title: title.to_string(),
            created_at: at,
            updated_at: at,
            message_count: count,
        }
    }

    #[test]
    fn test_relative_time() {
        let now = now();
        assert_eq!(relative_time(now - Duration::seconds(30), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 min ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "today");
        assert_eq!(relative_time(now - Duration::hours(30), now), "yesterday");
        assert_eq!(relative_time(now - Duration::days(4), now), "4 days ago");
        assert_eq!(relative_time(now - Duration::days(20), now), "2024-02-24");
    }

    #[test]
    fn test_format_view() {
        let now = now();
        let snapshot = SyncSnapshot {
            active_session_id: "b".to_string(),
            sessions: vec![
                session("a", "Orders", now - Duration::days(2), 4),
                session("b", "Refunds", now, 2),
            ],
            messages: vec![
                Message::user("refund please"),
                Message::assistant_placeholder(),
            ],
            status: Some("Calling API...".to_string()),
            editing: Some(RenameDraft {
                session_id: "a".to_string(),
                title: "Orders".to_string(),
            }),
        };

        let text = format_view(&snapshot, now);
        assert!(text.contains("   1. Orders (renaming)  ·  2 days ago  ·  4 messages"));
        assert!(text.contains("*  2. Refunds  ·  just now  ·  2 messages"));
        assert!(text.contains("you> refund please\nbot> Responding...\n"));
        assert!(text.ends_with("[Calling API...]\n"));
    }

    #[test]
    fn test_empty_view() {
        let snapshot = SyncSnapshot {
            active_session_id: "x".to_string(),
            sessions: Vec::new(),
            messages: Vec::new(),
            status: None,
            editing: None,
        };

        let text = format_view(&snapshot, now());
        assert!(text.contains("(none)"));
        assert!(text.contains("No messages yet"));
    }
}
