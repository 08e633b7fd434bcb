//! Terminal front-end
//!
//! A reader thread owns the settings store and turns stdin lines into poller
//! commands; the poller itself runs on the async runtime and is the only
//! thing that talks to the network.

use crate::api::ChatGptClient;
use crate::poller::{Command, Poller};
use crate::settings::{
    KEY_AUTH_TOKEN, KEY_CUTOFF, KEY_LANGUAGE, KEY_OPENAI_API_KEY, KEY_RETRIEVAL_SPEED,
    SettingsStore,
};
use crate::sink::TerminalSink;
use crate::translate::OpenAiTranslator;
use crate::transliteration::RomanizationMap;
use anyhow::{Context, Result};
use futures::channel::mpsc::{self, UnboundedSender};
use std::io::{BufRead, Write};

pub const HELP: &str = "commands: start | stop | toggle | clear | settings | set <key> <value> | translit <text> | help | quit";

#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Poll(Command),
    ShowSettings,
    Set { key: String, value: String },
    Translit(String),
    Help,
    Unknown(String),
    Empty,
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word.to_ascii_lowercase().as_str() {
        "start" | "retrieve" => Input::Poll(Command::Start),
        "stop" => Input::Poll(Command::Stop),
        "toggle" => Input::Poll(Command::Toggle),
        "clear" => Input::Poll(Command::Clear),
        "quit" | "exit" => Input::Poll(Command::Quit),
        "settings" => Input::ShowSettings,
        "help" | "?" => Input::Help,
        "translit" => Input::Translit(rest.to_string()),
        "set" => match rest.split_once(char::is_whitespace) {
            Some((key, value)) => Input::Set {
                key: key.to_string(),
                value: value.trim().to_string(),
            },
            None => Input::Set {
                key: rest.to_string(),
                value: String::new(),
            },
        },
        _ => Input::Unknown(line.to_string()),
    }
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        "(not set)".to_string()
    } else {
        format!("{}…", secret.chars().take(6).collect::<String>())
    }
}

/// Handle one line of input. Returns the command to forward to the poller, if any.
pub fn apply_input(
    store: &mut SettingsStore,
    input: Input,
    out: &mut impl Write,
) -> std::io::Result<Option<Command>> {
    match input {
        Input::Poll(command) => return Ok(Some(command)),
        Input::Empty => {}
        Input::Help => writeln!(out, "{HELP}")?,
        Input::Unknown(line) => writeln!(out, "unknown command: {line}\n{HELP}")?,
        Input::ShowSettings => {
            let settings = store.settings();
            writeln!(out, "{KEY_AUTH_TOKEN} = {}", mask(&settings.auth_token))?;
            writeln!(out, "{KEY_RETRIEVAL_SPEED} = {:.2}s", settings.retrieval_speed)?;
            writeln!(out, "{KEY_CUTOFF} = {:.2}s", settings.latest_conversation_cutoff)?;
            writeln!(out, "{KEY_LANGUAGE} = {}", settings.selected_language)?;
            writeln!(out, "{KEY_OPENAI_API_KEY} = {}", mask(&settings.openai_api_key))?;
            writeln!(out, "(stored in {})", store.path().display())?;
        }
        Input::Set { key, value } => match store.set(&key, &value) {
            Ok(settings) => {
                writeln!(out, "saved {key}")?;
                return Ok(Some(Command::UpdateSettings(settings.clone())));
            }
            Err(err) => writeln!(out, "{err}")?,
        },
        Input::Translit(text) => {
            let dir = store
                .path()
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            match RomanizationMap::for_language(&store.settings().selected_language, &dir) {
                Ok(Some(map)) => writeln!(out, "{}", map.transliterate(&text))?,
                Ok(None) => writeln!(out, "no romanization for the selected language")?,
                Err(err) => writeln!(out, "{err}")?,
            }
        }
    }
    Ok(None)
}

fn read_commands(mut store: SettingsStore, tx: UnboundedSender<Command>) {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!("failed to read stdin: {}", err);
                break;
            }
        };
        match apply_input(&mut store, parse_input(&line), &mut stdout) {
            Ok(Some(command)) => {
                let quit = command == Command::Quit;
                if tx.unbounded_send(command).is_err() || quit {
                    return;
                }
            }
            Ok(None) => {}
            Err(err) => tracing::warn!("failed to write to terminal: {}", err),
        }
    }
    let _ = tx.unbounded_send(Command::Quit);
}

/// Run the terminal front-end until `quit` or end of input.
pub async fn run(store: SettingsStore) -> Result<()> {
    let client = ChatGptClient::from_env().context("Failed to create HTTP client")?;
    tracing::info!("polling {}", client.base_url());
    let settings = store.settings().clone();

    println!("{HELP}");
    let (tx, rx) = mpsc::unbounded();
    std::thread::spawn(move || read_commands(store, tx));

    let mut poller = Poller::new(client, TerminalSink::stdio(), settings)
        .with_translator(OpenAiTranslator::default());
    poller.run(rx).await;
    Ok(())
}
