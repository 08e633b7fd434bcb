use crate::error::PollError;
use crate::poller::PollState;
use crate::types::{DisplayedMessage, Translation};
use std::io::Write;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

/// Receives reconciled messages in emission order.
pub trait DisplaySink {
    fn append(&mut self, messages: &[DisplayedMessage]);

    fn clear(&mut self);

    /// Errors the user must see (missing or rejected credential).
    fn report_error(&mut self, error: &PollError);

    fn attached(&mut self, _conversation_id: &str, _title: Option<&str>) {}

    fn translated(&mut self, _message_id: &str, _translation: &Translation) {}

    fn state_changed(&mut self, _state: PollState) {}
}

/// In-memory display buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub messages: Vec<DisplayedMessage>,
    pub errors: Vec<String>,
    pub conversation: Option<(String, Option<String>)>,
    pub states: Vec<PollState>,
}

impl DisplaySink for MemorySink {
    fn append(&mut self, messages: &[DisplayedMessage]) {
        self.messages.extend_from_slice(messages);
    }

    fn clear(&mut self) {
        self.messages.clear();
    }

    fn report_error(&mut self, error: &PollError) {
        self.errors.push(error.to_string());
    }

    fn attached(&mut self, conversation_id: &str, title: Option<&str>) {
        self.conversation = Some((conversation_id.to_string(), title.map(str::to_string)));
    }

    fn translated(&mut self, message_id: &str, translation: &Translation) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == message_id) {
            message.translation = translation.clone();
        }
    }

    fn state_changed(&mut self, state: PollState) {
        self.states.push(state);
    }
}

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour padding:zero]:[minute padding:zero]:[second padding:zero]");

/// Wall-clock time of a message in the local offset, UTC when that is unknown.
pub(crate) fn format_create_time(create_time: Option<f64>) -> Option<String> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    format_create_time_at(create_time?, offset)
}

fn format_create_time_at(secs: f64, offset: UtcOffset) -> Option<String> {
    let at = OffsetDateTime::from_unix_timestamp(secs as i64).ok()?;
    at.to_offset(offset).format(MESSAGE_TIME_FORMAT).ok()
}

/// Line-oriented sink for the terminal front-end.
pub struct TerminalSink<W: Write, E: Write> {
    out: W,
    err: E,
}

impl TerminalSink<std::io::Stdout, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl<W: Write, E: Write> TerminalSink<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_parts(self) -> (W, E) {
        (self.out, self.err)
    }

    fn write_out(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}").and_then(|_| self.out.flush()) {
            tracing::warn!("failed to write to terminal: {}", err);
        }
    }
}

impl<W: Write, E: Write> DisplaySink for TerminalSink<W, E> {
    fn append(&mut self, messages: &[DisplayedMessage]) {
        for message in messages {
            let prefix = if message.is_user { "you>" } else { "oai>" };
            let line = match format_create_time(message.create_time) {
                Some(ts) => format!("[{ts}] {prefix} {}", message.text),
                None => format!("{prefix} {}", message.text),
            };
            self.write_out(&line);
        }
    }

    fn clear(&mut self) {
        self.write_out("--- cleared ---");
    }

    fn report_error(&mut self, error: &PollError) {
        if let Err(err) = writeln!(self.err, "Error: {error}") {
            tracing::warn!("failed to write error to terminal: {}", err);
        }
    }

    fn attached(&mut self, conversation_id: &str, title: Option<&str>) {
        let title = title.unwrap_or("New Conversation");
        self.write_out(&format!("--- {title} ({conversation_id}) ---"));
    }

    fn translated(&mut self, _message_id: &str, translation: &Translation) {
        if let Translation::Done(text) = translation {
            if !text.is_empty() {
                self.write_out(&format!("  en: {text}"));
            }
        }
    }

    fn state_changed(&mut self, state: PollState) {
        self.write_out(&format!("[{}]", state.label()));
    }
}
