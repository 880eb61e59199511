// src/cli/chat.rs — Interactive REPL
//
// Plays the role of the original browser UI: owns the session store,
// drives the gateway operations, and renders annotated text through the
// matcher. Gateway failures never leave a turn hanging — chat failures
// append a synthetic model message, translate/annotate failures store a
// sentinel and still mark the result visible.

use std::sync::Arc;

use crate::gateway;
use crate::infra::config::Config;
use crate::matcher::{self, Segment};
use crate::provider::{Content, ModelProvider, Role};
use crate::session::storage::JsonFileStorage;
use crate::session::{Annotation, Message, MessageRole, SessionStore};

const CHAT_FAILURE_MESSAGE: &str = "An error occurred. Please try again.";
const TRANSLATION_FAILURE_SENTINEL: &str = "Translation failed.";
const ANNOTATION_FAILURE_SENTINEL: &str = "Annotation failed.";

/// Run the interactive chat REPL.
pub async fn run_chat(
    provider: Arc<dyn ModelProvider>,
    config: &Config,
    session_id: Option<&str>,
) -> anyhow::Result<()> {
    let mut store = SessionStore::open(Box::new(JsonFileStorage::new()));
    if let Some(id) = session_id {
        store.load_session(id);
    }

    {
        let session = store
            .active_session()
            .ok_or_else(|| anyhow::anyhow!("no active session"))?;
        eprintln!(
            "kotoba v{} | {} | {} | {} → {}\ntype a message, /help for commands, /quit to leave\n",
            env!("CARGO_PKG_VERSION"),
            config.gateway.model,
            session.name,
            session.native_language,
            session.learning_language,
        );
    }

    while let Some(input) = read_input() {
        let trimmed = input.trim();

        if trimmed == "quit" || trimmed == "exit" || trimmed == "/quit" {
            break;
        }

        if trimmed.starts_with('/') {
            handle_slash_command(trimmed, &mut store, provider.as_ref(), config).await;
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }

        send_message(trimmed, &mut store, provider.as_ref(), config).await;
    }

    Ok(())
}

/// One chat turn: append the user message, call the gateway with the
/// session's history, append the reply (or the failure message).
async fn send_message(
    text: &str,
    store: &mut SessionStore,
    provider: &dyn ModelProvider,
    config: &Config,
) {
    let Some(session) = store.active_session() else {
        return;
    };
    let session_id = session.id.clone();
    let native = session.native_language.clone();
    let learning = session.learning_language.clone();

    // History as the gateway sees it — everything before this turn.
    let history: Vec<Content> = session
        .messages
        .iter()
        .map(|m| Content {
            role: match m.role {
                MessageRole::User => Role::User,
                MessageRole::Model => Role::Model,
            },
            text: m.parts.clone(),
        })
        .collect();

    let mut messages = session.messages.clone();
    messages.push(Message::user(text));
    store.update_current_session_messages(messages.clone());

    let token = store.begin_request(&session_id);
    let result = gateway::chat(
        provider,
        &config.gateway.model,
        &history,
        &native,
        &learning,
        text,
    )
    .await;

    // A completion for a superseded request must not touch state.
    if !store.is_current(&token) {
        tracing::debug!("discarding stale chat response for session {session_id}");
        return;
    }

    let reply = match result {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("chat turn failed: {e}");
            CHAT_FAILURE_MESSAGE.to_string()
        }
    };

    println!("{reply}\n");
    messages.push(Message::model(reply));
    store.update_current_session_messages(messages);
}

async fn handle_slash_command(
    input: &str,
    store: &mut SessionStore,
    provider: &dyn ModelProvider,
    config: &Config,
) {
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" => {
            eprintln!("  /translate [n]   translate model message n (default: last)");
            eprintln!("  /annotate [n]    annotate model message n (default: last)");
            eprintln!("  /history         show the conversation so far");
            eprintln!("  /new [native] [learning]   start a new session");
            eprintln!("  /sessions        list sessions");
            eprintln!("  /switch          pick another session");
            eprintln!("  /delete          delete the current session");
            eprintln!("  /languages <native> <learning>   change this session's languages");
            eprintln!("  /status          session summary");
            eprintln!("  /quit            leave");
        }

        "/status" => {
            if let Some(session) = store.active_session() {
                eprintln!("  Session: {} ({})", session.name, session.id);
                eprintln!(
                    "  Languages: {} → {}",
                    session.native_language, session.learning_language
                );
                eprintln!("  Messages: {}", session.messages.len());
                eprintln!("  Model: {}", config.gateway.model);
            }
        }

        "/translate" => {
            translate_message(parse_index(arg), store, provider, config).await;
        }

        "/annotate" => {
            annotate_message(parse_index(arg), store, provider, config).await;
        }

        "/history" => {
            if let Some(session) = store.active_session() {
                for msg in &session.messages {
                    let speaker = match msg.role {
                        MessageRole::User => "you",
                        MessageRole::Model => " ai",
                    };
                    eprintln!("  {speaker}: {}", msg.parts);
                }
            }
        }

        "/new" => {
            let mut words = arg.split_whitespace();
            let native = words.next().map(str::to_string);
            let learning = words.next().map(str::to_string);
            let session = store.create_session(
                native.or_else(|| Some(config.languages.native_default.clone())),
                learning.or_else(|| Some(config.languages.learning_default.clone())),
            );
            eprintln!(
                "  Started {} ({} → {})",
                session.name, session.native_language, session.learning_language
            );
        }

        "/sessions" => {
            let active_id = store.active_session().map(|s| s.id.clone());
            for session in store.sessions() {
                let marker = if Some(&session.id) == active_id.as_ref() {
                    "*"
                } else {
                    " "
                };
                eprintln!(
                    "  {marker} {} | {} → {} | {} message(s)",
                    session.name,
                    session.native_language,
                    session.learning_language,
                    session.messages.len()
                );
            }
        }

        "/switch" => {
            if let Some(id) = pick_session(store) {
                store.load_session(&id);
                if let Some(session) = store.active_session() {
                    eprintln!("  Switched to {}", session.name);
                }
            }
        }

        "/delete" => {
            if let Some(session) = store.active_session() {
                let id = session.id.clone();
                let name = session.name.clone();
                store.delete_session(&id);
                let next = store.active_session().map(|s| s.name.clone());
                eprintln!(
                    "  Deleted {name}; now on {}",
                    next.unwrap_or_else(|| "a fresh session".into())
                );
            }
        }

        "/languages" => {
            let mut words = arg.split_whitespace();
            match (words.next(), words.next()) {
                (Some(native), Some(learning)) => {
                    if let Some(session) = store.active_session() {
                        let id = session.id.clone();
                        store.update_session_languages(&id, native, learning);
                        eprintln!("  Languages set to {native} → {learning}");
                    }
                }
                _ => eprintln!("  usage: /languages <native> <learning>"),
            }
        }

        _ => eprintln!("  Unknown command {cmd} — try /help"),
    }
}

/// Fetch (or toggle) the translation of a model message. The translation
/// goes from the learning language back to the native language.
async fn translate_message(
    index: Option<usize>,
    store: &mut SessionStore,
    provider: &dyn ModelProvider,
    config: &Config,
) {
    let Some(session) = store.active_session() else {
        return;
    };
    let session_id = session.id.clone();
    let native = session.native_language.clone();
    let learning = session.learning_language.clone();
    let mut messages = session.messages.clone();

    let Some(index) = resolve_model_index(&messages, index) else {
        eprintln!("  No model message to translate.");
        return;
    };

    // Already fetched once: just toggle visibility.
    if messages[index].translated_text.is_some() {
        let shown = messages[index].show_translation.unwrap_or(false);
        messages[index].show_translation = Some(!shown);
        if !shown {
            if let Some(ref t) = messages[index].translated_text {
                eprintln!("  {t}");
            }
        }
        store.update_current_session_messages(messages);
        return;
    }

    let token = store.begin_request(&session_id);
    let result = gateway::translate(
        provider,
        &config.gateway.model,
        &messages[index].parts,
        &learning,
        &native,
    )
    .await;
    if !store.is_current(&token) {
        return;
    }

    let translated = match result {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("translation failed: {e}");
            TRANSLATION_FAILURE_SENTINEL.to_string()
        }
    };

    eprintln!("  {translated}");
    messages[index].translated_text = Some(translated);
    messages[index].show_translation = Some(true);
    store.update_current_session_messages(messages);
}

/// Fetch (or toggle) annotations for a model message and render the text
/// with annotated spans marked and explained.
async fn annotate_message(
    index: Option<usize>,
    store: &mut SessionStore,
    provider: &dyn ModelProvider,
    config: &Config,
) {
    let Some(session) = store.active_session() else {
        return;
    };
    let session_id = session.id.clone();
    let native = session.native_language.clone();
    let learning = session.learning_language.clone();
    let mut messages = session.messages.clone();

    let Some(index) = resolve_model_index(&messages, index) else {
        eprintln!("  No model message to annotate.");
        return;
    };

    // Already fetched once: just toggle visibility.
    if messages[index].annotations.is_some() {
        if let Some(annotations) = toggle_annotations(&mut messages[index]) {
            render_annotated(&messages[index].parts, &annotations);
        }
        store.update_current_session_messages(messages);
        return;
    }

    let token = store.begin_request(&session_id);
    let result = gateway::annotate(
        provider,
        &config.gateway.model,
        &messages[index].parts,
        &learning,
        &native,
    )
    .await;
    if !store.is_current(&token) {
        return;
    }

    let annotations = match result {
        Ok(annotations) => annotations,
        Err(e) => {
            tracing::error!("annotation failed: {e}");
            vec![Annotation {
                word: String::new(),
                explanation: ANNOTATION_FAILURE_SENTINEL.to_string(),
            }]
        }
    };

    render_annotated(&messages[index].parts, &annotations);
    messages[index].annotations = Some(annotations);
    messages[index].show_annotations = Some(true);
    store.update_current_session_messages(messages);
}

/// Flip annotation visibility on a message that already has annotations;
/// returns them when they just became visible (the caller re-renders).
fn toggle_annotations(message: &mut Message) -> Option<Vec<Annotation>> {
    let annotations = message.annotations.clone()?;
    let shown = message.show_annotations.unwrap_or(false);
    message.show_annotations = Some(!shown);
    (!shown).then_some(annotations)
}

/// Print the text with annotated words bracketed, then the explanations.
fn render_annotated(text: &str, annotations: &[Annotation]) {
    let segments = matcher::segment_text(text, annotations);

    let mut line = String::from("  ");
    for segment in &segments {
        match segment {
            Segment::Plain(t) => line.push_str(t),
            Segment::Annotated { word, .. } => {
                line.push('[');
                line.push_str(word);
                line.push(']');
            }
        }
    }
    eprintln!("{line}");

    for annotation in annotations {
        if annotation.word.is_empty() {
            eprintln!("    {}", annotation.explanation);
        } else {
            eprintln!("    {} — {}", annotation.word, annotation.explanation);
        }
    }
}

/// Resolve which model message to act on: an explicit 1-based message
/// number, or the last model message when omitted.
fn resolve_model_index(messages: &[Message], requested: Option<usize>) -> Option<usize> {
    match requested {
        Some(n) => {
            let index = n.checked_sub(1)?;
            (index < messages.len() && messages[index].role == MessageRole::Model).then_some(index)
        }
        None => messages
            .iter()
            .rposition(|m| m.role == MessageRole::Model),
    }
}

fn parse_index(arg: &str) -> Option<usize> {
    arg.parse().ok()
}

fn pick_session(store: &SessionStore) -> Option<String> {
    let labels: Vec<String> = store
        .sessions()
        .iter()
        .map(|s| {
            format!(
                "{} ({} → {}, {} message(s))",
                s.name,
                s.native_language,
                s.learning_language,
                s.messages.len()
            )
        })
        .collect();
    if labels.is_empty() {
        return None;
    }

    let choice = inquire::Select::new("Session:", labels.clone()).prompt().ok()?;
    let position = labels.iter().position(|l| l == &choice)?;
    Some(store.sessions()[position].id.clone())
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line),
        Err(_) => None,
    }
}
