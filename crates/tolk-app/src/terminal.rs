//! Line-oriented stand-in for the widget: stdin in, stdout out.
//!
//! Plain lines replace the input text. Lines starting with `:` are the
//! selector/button actions.

use std::io::BufRead;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tolk_core::types::{AppEvent, CharCountLevel, SpeakTarget, TranslationResult, ViewUpdate};
use tolk_core::{LanguageCode, LanguageError, SourceLanguage};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0} (try :help)")]
    Unknown(String),

    #[error("{command} needs a language code")]
    MissingArgument { command: &'static str },

    #[error(transparent)]
    Language(#[from] LanguageError),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Event(AppEvent),
    Help,
}

pub fn parse_line(line: &str) -> Result<Command, CommandError> {
    let Some(command) = line.trim_end().strip_prefix(':') else {
        return Ok(Command::Event(AppEvent::TextChanged(line.trim_end().to_string())));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    let event = match name {
        "from" => {
            let code = arg.ok_or(CommandError::MissingArgument { command: ":from" })?;
            AppEvent::SetSource(code.parse::<SourceLanguage>()?)
        }
        "to" => {
            let code = arg.ok_or(CommandError::MissingArgument { command: ":to" })?;
            AppEvent::SetTarget(code.parse::<LanguageCode>()?)
        }
        "swap" => AppEvent::Swap,
        "mic" => AppEvent::ToggleMic,
        "speak-in" => AppEvent::Speak(SpeakTarget::Input),
        "speak-out" => AppEvent::Speak(SpeakTarget::Output),
        "clear" => AppEvent::TextChanged(String::new()),
        "quit" | "q" => AppEvent::Shutdown,
        "help" | "h" => return Ok(Command::Help),
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Command::Event(event))
}

pub fn help_text(can_listen: bool, can_speak: bool) -> String {
    let mut lines = vec![
        "Type text to translate it.".to_string(),
        "  :from <code|auto>   source language".to_string(),
        "  :to <code>          target language".to_string(),
        "  :swap               swap languages and texts".to_string(),
    ];
    if can_listen {
        lines.push("  :mic                start/stop voice input".to_string());
    }
    if can_speak {
        lines.push("  :speak-in           read the input aloud".to_string());
        lines.push("  :speak-out          read the translation aloud".to_string());
    }
    lines.push("  :clear              clear the input".to_string());
    lines.push("  :quit               exit".to_string());

    lines.push("Languages:".to_string());
    lines.push("  auto (source only)".to_string());
    for lang in LanguageCode::ALL {
        lines.push(format!("  {:<4} {}", lang.code(), lang.english_name()));
    }
    lines.join("\n")
}

/// Text printed for a view update, if any
pub fn format_update(update: &ViewUpdate) -> Option<String> {
    match update {
        ViewUpdate::Input { .. } => None,
        ViewUpdate::Languages { source, target } => Some(format!("[{} -> {}]", source, target)),
        ViewUpdate::Loading => Some("Translating...".to_string()),
        ViewUpdate::Output { result, .. } => Some(match result {
            TranslationResult::Translated { text } => format!("= {}", text),
            TranslationResult::Failed { reason } => format!("! {}", reason),
        }),
        ViewUpdate::Recording(true) => Some("Recording...".to_string()),
        ViewUpdate::Recording(false) => None,
        ViewUpdate::Notice(message) => Some(format!("! {}", message)),
    }
}

/// Read stdin on a dedicated thread until EOF or `:quit`.
///
/// Blocking reads live outside the runtime so an idle prompt never holds up
/// shutdown.
pub fn spawn_input_thread(
    events_tx: AsyncSender<AppEvent>,
    help: String,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    let handle = Handle::current();

    std::thread::Builder::new()
        .name("tolk-stdin".to_string())
        .spawn(move || {
            if atty::is(atty::Stream::Stdin) {
                eprintln!("{}", help);
            }

            let send = |event: AppEvent| {
                if let Err(e) = handle.block_on(events_tx.send(event)) {
                    tracing::error!("Failed to send input event: {}", e);
                    return false;
                }
                true
            };

            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::error!("Failed to read stdin: {}", e);
                        break;
                    }
                };

                match parse_line(&line) {
                    Ok(Command::Event(AppEvent::Shutdown)) => break,
                    Ok(Command::Event(event)) => {
                        if !send(event) {
                            return;
                        }
                    }
                    Ok(Command::Help) => eprintln!("{}", help),
                    Err(e) => eprintln!("{}", e),
                }
            }

            tracing::info!("Input closed");
            send(AppEvent::Shutdown);
        })
}

/// Print view updates to stdout
pub async fn render_view(
    view_rx: AsyncReceiver<ViewUpdate>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        // Drain what is queued before honouring cancellation
        let update = tokio::select! {
            biased;
            update = view_rx.recv() => update?,
            _ = cancel.cancelled() => break,
        };

        if let ViewUpdate::Input {
            chars,
            level: CharCountLevel::Warning | CharCountLevel::Critical,
            ..
        } = &update
        {
            eprintln!("({} characters)", chars);
        }

        if let Some(text) = format_update(&update) {
            println!("{}", text);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tolk_core::types::PipelineState;

    use super::*;

    #[test]
    fn test_plain_line_is_text_change() {
        assert_eq!(
            parse_line("selamat pagi\n"),
            Ok(Command::Event(AppEvent::TextChanged("selamat pagi".into())))
        );
    }

    #[test]
    fn test_language_commands() {
        assert_eq!(
            parse_line(":from auto"),
            Ok(Command::Event(AppEvent::SetSource(SourceLanguage::Auto)))
        );
        assert_eq!(
            parse_line(":to ja"),
            Ok(Command::Event(AppEvent::SetTarget(LanguageCode::Ja)))
        );
        assert_eq!(
            parse_line(":to auto"),
            Err(CommandError::Language(LanguageError::AutoAsTarget))
        );
        assert_eq!(
            parse_line(":from"),
            Err(CommandError::MissingArgument { command: ":from" })
        );
    }

    #[test]
    fn test_action_commands() {
        assert_eq!(parse_line(":swap"), Ok(Command::Event(AppEvent::Swap)));
        assert_eq!(
            parse_line(":speak-out"),
            Ok(Command::Event(AppEvent::Speak(SpeakTarget::Output)))
        );
        assert_eq!(parse_line(":q"), Ok(Command::Event(AppEvent::Shutdown)));
        assert_eq!(parse_line(":help"), Ok(Command::Help));
        assert!(matches!(parse_line(":dance"), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn test_help_hides_missing_capabilities() {
        let help = help_text(false, false);
        assert!(!help.contains(":mic"));
        assert!(!help.contains(":speak-in"));
        assert!(help_text(true, true).contains(":mic"));
    }

    #[test]
    fn test_format_update() {
        let update = ViewUpdate::Output {
            state: PipelineState::Fallback,
            result: TranslationResult::Translated {
                text: "halo".into(),
            },
        };
        assert_eq!(format_update(&update).as_deref(), Some("= halo"));
        assert_eq!(
            format_update(&ViewUpdate::Languages {
                source: SourceLanguage::Auto,
                target: LanguageCode::Id
            })
            .as_deref(),
            Some("[auto -> id]")
        );
    }
}
