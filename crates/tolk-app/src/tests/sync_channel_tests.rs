use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::timeout;
use tolk_core::LanguageCode;
use tolk_core::types::{AppEvent, SpeakTarget};

use crate::terminal::{Command, parse_line};

#[tokio::test]
async fn test_tokio_spawn_from_sync_callback() {
    let (tx, rx) = kanal::unbounded_async::<AppEvent>();

    // Platform speech callbacks are plain closures
    let on_transcript = move |text: String| {
        tracing::debug!("Sync callback: spawning tokio task");
        let tx = tx.clone();
        tokio::spawn(async move {
            tx.send(AppEvent::VoiceTranscript(text))
                .await
                .expect("send failed");
        });
        tracing::debug!("Sync callback: returned immediately");
    };

    on_transcript("selamat pagi".to_string());

    let result = timeout(Duration::from_secs(2), rx.recv()).await;

    match result {
        Ok(Ok(AppEvent::VoiceTranscript(text))) => assert_eq!(text, "selamat pagi"),
        Ok(Ok(_)) => panic!("Wrong event type"),
        Ok(Err(e)) => panic!("Channel error: {}", e),
        Err(_) => panic!("Timeout - tokio::spawn from sync context failed!"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_thread_sends_through_handle() {
    let (tx, rx) = kanal::bounded_async::<AppEvent>(4);
    let handle = Handle::current();

    // Same shape as the stdin reader: a plain thread feeding the async loop
    let reader = std::thread::spawn(move || {
        let lines = [":to fr", "hello", ":help", ":speak-out"];
        for line in lines {
            if let Ok(Command::Event(event)) = parse_line(line) {
                handle.block_on(tx.send(event)).expect("send failed");
            }
        }
    });

    let mut received = Vec::new();
    let result = timeout(Duration::from_secs(2), async {
        while received.len() < 3 {
            received.push(rx.recv().await.expect("recv failed"));
        }
    })
    .await;

    assert!(result.is_ok(), "Timeout waiting for events!");
    reader.join().expect("reader thread panicked");
    assert_eq!(
        received,
        vec![
            AppEvent::SetTarget(LanguageCode::Fr),
            AppEvent::TextChanged("hello".to_string()),
            AppEvent::Speak(SpeakTarget::Output),
        ]
    );
}
