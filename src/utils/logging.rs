use crate::core::message::ChatMessage;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Install the global diagnostics subscriber.
///
/// Diagnostics go to `log_file` when one is given. Without one, one-shot
/// commands log to stderr and the full-screen UI logs nowhere, since any
/// stray write would corrupt the alternate screen.
pub fn init_diagnostics(
    log_file: Option<&Path>,
    interactive: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None if interactive => builder.with_writer(std::io::sink).try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|err| err.to_string().into())
}

/// Plain-text record of a chat session, one message per paragraph.
pub struct Transcript {
    file_path: Option<String>,
}

impl Transcript {
    pub fn new(file_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = &file_path {
            test_file_access(path)?;
        }
        Ok(Self { file_path })
    }

    pub fn is_active(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn log_message(&self, message: &ChatMessage) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = &self.file_path else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        let mut lines = message.text.lines();
        let first = lines.next().unwrap_or_default();
        writeln!(
            writer,
            "[{}] {}: {first}",
            message.time,
            message.sender.display_name()
        )?;
        for line in lines {
            writeln!(writer, "{line}")?;
        }
        // Blank line between messages, as on screen
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }

    pub fn status_string(&self) -> String {
        match &self.file_path {
            None => "off".to_string(),
            Some(path) => Path::new(path)
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned(),
        }
    }
}

fn test_file_access(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    // Fail at startup rather than on the first message
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    #[test]
    fn transcript_writes_sender_time_and_every_line() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("chat.txt");
        let transcript =
            Transcript::new(Some(path.to_string_lossy().into_owned())).expect("writable");
        let at = Local
            .with_ymd_and_hms(2025, 10, 10, 9, 5, 0)
            .single()
            .expect("valid time");

        transcript
            .log_message(&ChatMessage::outgoing("Need a room", at))
            .expect("logged");
        transcript
            .log_message(&ChatMessage::reply("Sure!\nFor how many?", at))
            .expect("logged");

        let written = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(
            written,
            "[09:05] You: Need a room\n\n[09:05] Aastha: Sure!\nFor how many?\n\n"
        );
        assert_eq!(transcript.status_string(), "chat.txt");
    }

    #[test]
    fn disabled_transcript_is_a_no_op() {
        let transcript = Transcript::new(None).expect("nothing to open");
        assert!(!transcript.is_active());
        assert_eq!(transcript.status_string(), "off");
        let at = Local::now();
        transcript
            .log_message(&ChatMessage::outgoing("hi", at))
            .expect("no-op");
    }

    #[test]
    fn unwritable_transcript_path_fails_up_front() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("missing").join("chat.txt");
        assert!(Transcript::new(Some(path.to_string_lossy().into_owned())).is_err());
    }
}
