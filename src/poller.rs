//! Poll scheduler
//!
//! One logical task drives everything: it waits on the next user command, the
//! single pending timer or the translation in flight, and runs at most one
//! conversation request at a time. Stopping drops the pending timer and any
//! queued translations, so nothing fires afterwards.

use crate::api::ConversationSource;
use crate::error::PollError;
use crate::reconcile::{SeenIds, reconcile};
use crate::settings::Settings;
use crate::sink::DisplaySink;
use crate::translate::{Translator, wants_translation};
use crate::types::{ConversationSnapshot, DisplayedMessage, Translation};
use futures::{Stream, StreamExt};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::time::Sleep;

/// Upper bound on a single translation request.
pub const TRANSLATION_TIMEOUT: Duration = Duration::from_secs(30);

type PendingTranslation = Pin<Box<dyn Future<Output = (String, Translation)> + Send>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollState {
    Idle,
    LocatingConversation,
    Listening,
}

impl PollState {
    pub fn label(&self) -> &'static str {
        match self {
            PollState::Idle => "idle",
            PollState::LocatingConversation => "searching for conversations...",
            PollState::Listening => "listening",
        }
    }
}

/// What a start attempt ended with.
#[derive(Clone, Debug, PartialEq)]
pub enum LocateOutcome {
    Attached { conversation_id: String },
    /// Latest conversation is older than the cutoff; nothing was fetched.
    Stale { age_secs: f64 },
    NoConversation,
    AlreadyRunning,
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Start,
    Stop,
    Toggle,
    Clear,
    UpdateSettings(Settings),
    Quit,
}

enum Event {
    Command(Option<Command>),
    TimerFired,
    Translated(String, Translation),
}

pub struct Poller<S: ConversationSource, D: DisplaySink> {
    source: S,
    sink: D,
    settings: Settings,
    translator: Option<Arc<dyn Translator>>,
    state: PollState,
    conversation_id: Option<String>,
    conversation_title: Option<String>,
    snapshot: ConversationSnapshot,
    seen: SeenIds,
    displayed: Vec<DisplayedMessage>,
    timer: Option<Pin<Box<Sleep>>>,
    translation_queue: VecDeque<DisplayedMessage>,
    translation: Option<PendingTranslation>,
}

impl<S: ConversationSource, D: DisplaySink> Poller<S, D> {
    pub fn new(source: S, sink: D, settings: Settings) -> Self {
        Self {
            source,
            sink,
            settings,
            translator: None,
            state: PollState::Idle,
            conversation_id: None,
            conversation_title: None,
            snapshot: ConversationSnapshot::default(),
            seen: SeenIds::new(),
            displayed: Vec::new(),
            timer: None,
            translation_queue: VecDeque::new(),
            translation: None,
        }
    }

    pub fn with_translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Some(Arc::new(translator));
        self
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn conversation_title(&self) -> Option<&str> {
        self.conversation_title.as_deref()
    }

    pub fn seen(&self) -> &SeenIds {
        &self.seen
    }

    pub fn displayed(&self) -> &[DisplayedMessage] {
        &self.displayed
    }

    pub fn snapshot(&self) -> &ConversationSnapshot {
        &self.snapshot
    }

    pub fn timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Queued plus in-flight translations.
    pub fn pending_translations(&self) -> usize {
        self.translation_queue.len() + usize::from(self.translation.is_some())
    }

    /// Locate the latest conversation and, if it is fresh enough, attach to it,
    /// run one cycle right away and arm the timer.
    pub async fn start(&mut self) -> LocateOutcome {
        if self.state != PollState::Idle {
            tracing::debug!("start ignored, already {}", self.state.label());
            return LocateOutcome::AlreadyRunning;
        }

        if !self.settings.has_auth_token() {
            self.fail(PollError::MissingCredential);
            return LocateOutcome::Failed;
        }

        self.set_state(PollState::LocatingConversation);

        let summary = match self
            .source
            .find_latest_conversation(&self.settings.auth_token)
            .await
        {
            Ok(Some(summary)) => summary,
            Ok(None) => {
                tracing::info!("no conversations found");
                self.set_state(PollState::Idle);
                return LocateOutcome::NoConversation;
            }
            Err(err) => {
                self.fail(err);
                return LocateOutcome::Failed;
            }
        };

        let age_secs = (OffsetDateTime::now_utc() - summary.update_time).as_seconds_f64();
        tracing::debug!("time since last conversation update: {:.1}s", age_secs);
        if age_secs > self.settings.latest_conversation_cutoff {
            tracing::info!(
                "conversation {} is too old ({:.0}s > {:.0}s)",
                summary.id,
                age_secs,
                self.settings.latest_conversation_cutoff
            );
            self.set_state(PollState::Idle);
            return LocateOutcome::Stale { age_secs };
        }

        if self.conversation_id.as_deref() != Some(summary.id.as_str()) {
            self.reset_conversation();
            self.sink.clear();
        }
        tracing::info!("attached to conversation {}", summary.id);
        self.conversation_id = Some(summary.id.clone());
        self.conversation_title = summary.title.clone();
        self.sink.attached(&summary.id, summary.title.as_deref());
        self.set_state(PollState::Listening);

        self.cycle().await;
        LocateOutcome::Attached {
            conversation_id: summary.id,
        }
    }

    /// Cancel the pending timer and queued translations, and go idle.
    pub fn stop(&mut self) {
        if self.timer.take().is_some() {
            tracing::debug!("pending poll cancelled");
        }
        self.cancel_translations();
        if self.state != PollState::Idle {
            tracing::info!("stopped listening");
            self.set_state(PollState::Idle);
        }
    }

    pub async fn toggle(&mut self) {
        if self.state == PollState::Idle {
            self.start().await;
        } else {
            self.stop();
        }
    }

    /// Drop the snapshot, the seen set and everything shown. The attachment
    /// and the listening state are kept, so the next cycle shows the
    /// conversation again from the top.
    pub fn clear(&mut self) {
        self.reset_conversation();
        self.sink.clear();
    }

    /// Takes effect from the next cycle; the interval applies on the next re-arm.
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Timer fired: one fetch-reconcile-display cycle.
    pub async fn tick(&mut self) {
        self.timer = None;
        if self.state != PollState::Listening {
            return;
        }
        self.cycle().await;
    }

    pub async fn handle(&mut self, command: Command) {
        match command {
            Command::Start => {
                self.start().await;
            }
            Command::Stop => self.stop(),
            Command::Toggle => self.toggle().await,
            Command::Clear => self.clear(),
            Command::UpdateSettings(settings) => self.update_settings(settings),
            Command::Quit => self.stop(),
        }
    }

    /// Serve commands until `Quit` or the stream ends. Translations run here,
    /// one at a time, between commands and timer fires.
    pub async fn run<C>(&mut self, mut commands: C)
    where
        C: Stream<Item = Command> + Unpin,
    {
        loop {
            self.begin_translation();

            let event = tokio::select! {
                command = commands.next() => Event::Command(command),
                _ = fire(&mut self.timer) => Event::TimerFired,
                (id, translation) = finish(&mut self.translation) => {
                    Event::Translated(id, translation)
                }
            };

            match event {
                Event::TimerFired => self.tick().await,
                Event::Translated(id, translation) => {
                    self.translation = None;
                    self.apply_translation(&id, translation);
                }
                Event::Command(None) | Event::Command(Some(Command::Quit)) => {
                    self.stop();
                    break;
                }
                Event::Command(Some(command)) => self.handle(command).await,
            }
        }
    }

    async fn cycle(&mut self) {
        if !self.settings.has_auth_token() {
            self.fail(PollError::MissingCredential);
            return;
        }
        let Some(id) = self.conversation_id.clone() else {
            self.set_state(PollState::Idle);
            return;
        };

        tracing::debug!("retrieving messages from conversation {}", id);
        let snapshot = match self
            .source
            .fetch_conversation(&self.settings.auth_token, &id)
            .await
        {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.fail(err);
                return;
            }
        };

        if snapshot.title.is_some() && snapshot.title != self.conversation_title {
            self.conversation_title = snapshot.title.clone();
            self.sink.attached(&id, self.conversation_title.as_deref());
        }

        let fresh = reconcile(&snapshot, &mut self.seen);
        self.snapshot = snapshot;
        if !fresh.is_empty() {
            tracing::debug!("{} new message(s)", fresh.len());
            self.sink.append(&fresh);
            self.displayed.extend(fresh.iter().cloned());
            if self.translator.is_some() && wants_translation(&self.settings) {
                self.translation_queue.extend(fresh);
            }
        }

        if self.state == PollState::Listening {
            self.timer = Some(Box::pin(tokio::time::sleep(self.settings.poll_interval())));
        }
    }

    /// Start the next queued translation unless one is already in flight.
    fn begin_translation(&mut self) {
        if self.translation.is_some() {
            return;
        }
        let Some(translator) = self.translator.clone() else {
            return;
        };
        let Some(message) = self.translation_queue.pop_front() else {
            return;
        };
        let settings = self.settings.clone();
        self.translation = Some(Box::pin(async move {
            let request = translator.translate(&message.text, &settings);
            let translation = match tokio::time::timeout(TRANSLATION_TIMEOUT, request).await {
                Ok(text) if text.is_empty() => Translation::Unavailable,
                Ok(text) => Translation::Done(text),
                Err(_) => {
                    tracing::warn!("translation of {} timed out", message.id);
                    Translation::Unavailable
                }
            };
            (message.id, translation)
        }));
    }

    fn apply_translation(&mut self, id: &str, translation: Translation) {
        let Some(shown) = self.displayed.iter_mut().find(|m| m.id == id) else {
            return;
        };
        shown.translation = translation.clone();
        self.sink.translated(id, &translation);
    }

    fn cancel_translations(&mut self) {
        if self.translation.take().is_some() || !self.translation_queue.is_empty() {
            tracing::debug!("pending translations dropped");
        }
        self.translation_queue.clear();
    }

    fn fail(&mut self, err: PollError) {
        if err.is_user_facing() {
            tracing::error!("Error: {}", err);
            self.sink.report_error(&err);
        } else {
            tracing::warn!("polling stopped: {}", err);
        }
        self.stop();
    }

    fn reset_conversation(&mut self) {
        self.cancel_translations();
        self.snapshot = ConversationSnapshot::default();
        self.seen.clear();
        self.displayed.clear();
    }

    fn set_state(&mut self, state: PollState) {
        if self.state != state {
            self.state = state;
            self.sink.state_changed(state);
        }
    }
}

async fn fire(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(timer) => timer.as_mut().await,
        None => std::future::pending().await,
    }
}

async fn finish(translation: &mut Option<PendingTranslation>) -> (String, Translation) {
    match translation {
        Some(translation) => translation.as_mut().await,
        None => std::future::pending().await,
    }
}
