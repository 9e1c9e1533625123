//! Interactive chat: read lines from stdin, drive a `ChatSession`.

use std::io::Write as _;
use std::sync::Arc;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};
use zurri_chat::{ChatSession, FileSelection, SendOutcome, ZurriClient};
use zurri_common::{Event, Result};
use zurri_config::ChatConfig;

use crate::render;

const HELP: &str = "\
commands:
  /attach <path>...  stage files for the next message
  /detach <n>        unstage file n
  /files             list staged files
  /meta <json>       attach a JSON object to the next message
  /history           reload the conversation
  /quit              leave the chat
start a message with // to send a literal leading /";

/// One line of user input.
#[derive(Debug, PartialEq)]
enum Input {
    Text(String),
    Attach(Vec<String>),
    Detach(usize),
    Files,
    Meta(String),
    History,
    Help,
    Quit,
    Invalid(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if let Some(literal) = line.strip_prefix("//") {
        return Input::Text(format!("/{literal}"));
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Text(line.to_string());
    };
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((command, ""));
    match name {
        "attach" if !rest.is_empty() => {
            Input::Attach(rest.split_whitespace().map(String::from).collect())
        }
        "detach" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => Input::Detach(n - 1),
            _ => Input::Invalid("usage: /detach <n>".into()),
        },
        "files" => Input::Files,
        "meta" => Input::Meta(rest.to_string()),
        "history" => Input::History,
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        "attach" => Input::Invalid("usage: /attach <path>...".into()),
        other => Input::Invalid(format!("unknown command /{other}, try /help")),
    }
}

pub async fn run(client: ZurriClient, options: &ChatConfig, agent_id: &str) -> Result<()> {
    let client = Arc::new(client);
    let session = ChatSession::new(client.clone(), client);
    let mut events = session.subscribe();
    session.initialize(agent_id).await;
    print_thread(&session, options).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Text(text) => {
                session.set_composing_text(text).await;
                send(&session, options).await;
            }
            Input::Attach(paths) => attach(&session, &paths).await,
            Input::Detach(index) => {
                if !session.unstage_attachment(index).await {
                    println!("no staged file {}", index + 1);
                }
            }
            Input::Files => {
                let staged = session.staged().await;
                if staged.is_empty() {
                    println!("no files staged");
                }
                for (i, file) in staged.iter().enumerate() {
                    println!("{}", render::format_staged(i, file));
                }
            }
            Input::Meta(raw) => {
                let raw = (!raw.is_empty()).then_some(raw);
                session.set_metadata_text(raw).await;
            }
            Input::History => {
                session.initialize(agent_id).await;
                print_thread(&session, options).await;
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
            Input::Invalid(message) => println!("{message}"),
        }

        if login_required(&mut events) {
            eprintln!("Session expired or not logged in. Run `zurri login` and try again.");
            break;
        }
    }

    session.close().await;
    Ok(())
}

/// Drain pending session events. Returns `true` once the backend has
/// asked for a fresh login.
fn login_required(events: &mut broadcast::Receiver<Event>) -> bool {
    let mut required = false;
    loop {
        match events.try_recv() {
            Ok(Event::LoginRequired) => required = true,
            Ok(event) => debug!(?event, "session event"),
            Err(TryRecvError::Lagged(skipped)) => debug!(skipped, "session events lagged"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => return required,
        }
    }
}

async fn send(session: &ChatSession, options: &ChatConfig) {
    let outcome = match session.send().await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    match outcome {
        SendOutcome::Delivered { reply_text, .. } => match session.messages().await.last() {
            Some(last) => println!("{}", render::format_message(last, options, Utc::now())),
            None => println!("{reply_text}"),
        },
        SendOutcome::Failed(failure) => {
            if failure.shows_in_thread() {
                if let Some(last) = session.messages().await.last() {
                    println!("{}", render::format_message(last, options, Utc::now()));
                }
            } else {
                eprintln!("{failure}");
            }
        }
        // Reported through the event bus.
        SendOutcome::LoginRequired | SendOutcome::Skipped | SendOutcome::Stale => {}
    }
}

async fn attach(session: &ChatSession, paths: &[String]) {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match FileSelection::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!(path = %path, error = %e, "cannot attach file");
                eprintln!("cannot attach {path}: {e}");
                return;
            }
        }
    }
    let count = files.len();
    match session.stage_attachments(files).await {
        Ok(()) => println!("{count} file(s) staged"),
        Err(e) => eprintln!("{e}"),
    }
}

async fn print_thread(session: &ChatSession, options: &ChatConfig) {
    let messages = session.messages().await;
    if messages.is_empty() {
        println!("(new conversation, /help for commands)");
        return;
    }
    let now = Utc::now();
    for message in &messages {
        println!("{}", render::format_message(message, options, now));
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_text() {
        assert_eq!(parse_input("  hello there \n"), Input::Text("hello there".into()));
        assert_eq!(parse_input(""), Input::Text(String::new()));
    }

    #[test]
    fn double_slash_sends_literal_text() {
        assert_eq!(parse_input("//help me"), Input::Text("/help me".into()));
        assert_eq!(parse_input("  //etc/hosts"), Input::Text("/etc/hosts".into()));
        assert_eq!(parse_input("//"), Input::Text("/".into()));
    }

    #[test]
    fn login_event_ends_the_chat() {
        let bus = zurri_common::EventBus::default();
        let mut events = bus.subscribe();
        assert!(!login_required(&mut events));

        bus.publish(Event::HistoryLoaded {
            agent_id: "a1".into(),
            count: 0,
        });
        assert!(!login_required(&mut events));

        bus.publish(Event::ConversationAssigned {
            agent_id: "a1".into(),
            conversation_id: zurri_common::ConversationId::new("c1"),
        });
        bus.publish(Event::LoginRequired);
        assert!(login_required(&mut events));
        assert!(!login_required(&mut events));
    }

    #[test]
    fn attach_takes_several_paths() {
        assert_eq!(
            parse_input("/attach a.png  docs/b.pdf"),
            Input::Attach(vec!["a.png".into(), "docs/b.pdf".into()])
        );
        assert!(matches!(parse_input("/attach"), Input::Invalid(_)));
    }

    #[test]
    fn detach_is_one_based() {
        assert_eq!(parse_input("/detach 2"), Input::Detach(1));
        assert!(matches!(parse_input("/detach 0"), Input::Invalid(_)));
        assert!(matches!(parse_input("/detach x"), Input::Invalid(_)));
    }

    #[test]
    fn meta_keeps_raw_json() {
        assert_eq!(
            parse_input(r#"/meta {"a": [1, 2]}"#),
            Input::Meta(r#"{"a": [1, 2]}"#.into())
        );
        assert_eq!(parse_input("/meta"), Input::Meta(String::new()));
    }

    #[test]
    fn other_commands() {
        assert_eq!(parse_input("/files"), Input::Files);
        assert_eq!(parse_input("/history"), Input::History);
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input("/help"), Input::Help);
        assert!(matches!(parse_input("/nope"), Input::Invalid(_)));
    }
}
