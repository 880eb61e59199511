// src/cli/sessions.rs — Non-interactive session management

use chrono::DateTime;

use crate::cli::SessionAction;
use crate::infra::config::Config;
use crate::session::storage::JsonFileStorage;
use crate::session::SessionStore;

pub fn run_sessions(action: Option<SessionAction>, config: &Config) -> anyhow::Result<()> {
    let mut store = SessionStore::open(Box::new(JsonFileStorage::new()));

    match action.unwrap_or(SessionAction::List) {
        SessionAction::List => {
            let active_id = store.active_session().map(|s| s.id.clone());
            for session in store.sessions() {
                let marker = if Some(&session.id) == active_id.as_ref() {
                    "*"
                } else {
                    " "
                };
                let created = DateTime::from_timestamp_millis(session.created_at)
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "unknown".into());
                println!(
                    "{marker} {}  {}  {} → {}  {} message(s)  {}",
                    session.id,
                    session.name,
                    session.native_language,
                    session.learning_language,
                    session.messages.len(),
                    created,
                );
            }
        }

        SessionAction::New { native, learning } => {
            let session = store.create_session(
                native.or_else(|| Some(config.languages.native_default.clone())),
                learning.or_else(|| Some(config.languages.learning_default.clone())),
            );
            println!(
                "Created {} ({} → {})",
                session.name, session.native_language, session.learning_language
            );
        }

        SessionAction::Delete { id } => {
            let id = match id {
                Some(id) => id,
                None => match pick_session_id(&store)? {
                    Some(id) => id,
                    None => return Ok(()),
                },
            };
            if !store.sessions().iter().any(|s| s.id == id) {
                anyhow::bail!("no session with id '{id}'");
            }
            store.delete_session(&id);
            println!("Deleted. {} session(s) remain.", store.sessions().len());
        }

        SessionAction::Use { id } => {
            if !store.sessions().iter().any(|s| s.id == id) {
                anyhow::bail!("no session with id '{id}'");
            }
            store.load_session(&id);
            let session = store.active_session().expect("just activated");
            println!("Now on {}", session.name);
        }
    }

    Ok(())
}

fn pick_session_id(store: &SessionStore) -> anyhow::Result<Option<String>> {
    let labels: Vec<String> = store
        .sessions()
        .iter()
        .map(|s| format!("{} ({} message(s))", s.name, s.messages.len()))
        .collect();

    match inquire::Select::new("Delete which session?", labels.clone()).prompt() {
        Ok(choice) => {
            let position = labels.iter().position(|l| l == &choice);
            Ok(position.map(|p| store.sessions()[p].id.clone()))
        }
        Err(_) => Ok(None), // cancelled
    }
}
