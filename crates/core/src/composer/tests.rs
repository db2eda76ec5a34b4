use std::future::ready;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use little_chat_responder::{Responder, ResponderRequest};
use little_chat_stub_responder::{PresetReply, ScriptedResponder};
use tokio::sync::watch;
use tokio::time::timeout;

use crate::attachment::{FileSource, PendingFile, decode_payload};
use crate::{
    ComposerBuilder, EncodeErrorKind, FALLBACK_REPLY_TEXT, Origin,
    RESPONDER_ERROR_TEXT, SubmitError,
};

fn idle_counter(
    builder: ComposerBuilder,
) -> (ComposerBuilder, watch::Receiver<usize>) {
    let (idle_tx, idle_rx) = watch::channel(0usize);
    let builder = builder.on_idle(move || {
        idle_tx.send_modify(|count| *count += 1);
    });
    (builder, idle_rx)
}

fn text_file(name: &str, content: &'static str) -> PendingFile {
    PendingFile::from_bytes(name, "text/plain", content.as_bytes())
}

async fn wait_idle(idle_rx: &mut watch::Receiver<usize>, times: usize) {
    timeout(Duration::from_secs(5), idle_rx.wait_for(|count| *count >= times))
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_text_message() {
    let mut responder = ScriptedResponder::default();
    responder.add_reply(PresetReply::with_text("Hi, what can I do for you?"));

    let (builder, mut idle_rx) =
        idle_counter(ComposerBuilder::with_responder(responder.clone()));
    let composer = builder.build();
    composer.set_text("hello");
    let user_id = composer.submit().await.unwrap();
    wait_idle(&mut idle_rx, 1).await;

    let entries = composer.transcript().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id(), user_id);
    assert_eq!(entries[0].origin(), Origin::User);
    assert_eq!(entries[0].text(), "hello");
    assert!(entries[0].attachment().is_none());
    assert_eq!(entries[1].origin(), Origin::Assistant);
    assert_eq!(entries[1].text(), "Hi, what can I do for you?");

    let requests = responder.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "hello");
    assert!(requests[0].attachment.is_none());
}

#[tokio::test]
async fn test_file_only_message() {
    let mut responder = ScriptedResponder::default();
    responder.add_reply(PresetReply::with_text("Got it."));

    let (builder, mut idle_rx) =
        idle_counter(ComposerBuilder::with_responder(responder.clone()));
    let composer = builder.build();

    let raw = vec![0x25u8; 2048];
    composer.set_pending_file(PendingFile::from_bytes(
        "report.pdf",
        "application/pdf",
        raw.clone(),
    ));
    composer.submit().await.unwrap();
    wait_idle(&mut idle_rx, 1).await;

    let entries = composer.transcript().await.unwrap();
    assert_eq!(entries.len(), 2);
    let user_entry = &entries[0];
    assert_eq!(user_entry.text(), "");
    let attachment = user_entry.attachment().unwrap();
    assert_eq!(attachment.name, "report.pdf");
    assert_eq!(attachment.size_bytes, 2048);
    assert_eq!(attachment.mime_type, "application/pdf");
    assert_eq!(decode_payload(&attachment.payload).unwrap(), raw);

    let sent = responder.requests()[0].attachment.clone().unwrap();
    assert_eq!(&sent, attachment);
}

#[tokio::test]
async fn test_nothing_to_submit() {
    let responder = ScriptedResponder::default();
    let composer = ComposerBuilder::with_responder(responder.clone()).build();

    assert!(!composer.can_submit().await.unwrap());
    assert_eq!(composer.submit().await, Err(SubmitError::NothingToSubmit));

    composer.set_text(" \n ");
    assert!(!composer.can_submit().await.unwrap());
    assert_eq!(composer.submit().await, Err(SubmitError::NothingToSubmit));

    assert!(composer.transcript().await.unwrap().is_empty());
    assert_eq!(composer.draft().await.unwrap().text(), " \n ");
    assert!(responder.requests().is_empty());
}

#[tokio::test]
async fn test_responder_failure() {
    let mut responder = ScriptedResponder::default();
    responder.add_reply(PresetReply::with_failure("socket hang up"));

    let (builder, mut idle_rx) =
        idle_counter(ComposerBuilder::with_responder(responder));
    let composer = builder.build();
    composer.set_text("hello");
    composer.submit().await.unwrap();
    wait_idle(&mut idle_rx, 1).await;

    let entries = composer.transcript().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].origin(), Origin::Assistant);
    assert_eq!(entries[1].text(), RESPONDER_ERROR_TEXT);
    assert!(!entries[1].text().contains("socket hang up"));
    assert!(composer.draft().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_reply() {
    let mut responder = ScriptedResponder::default();
    responder.add_reply(PresetReply::with_text(""));

    let (builder, mut idle_rx) =
        idle_counter(ComposerBuilder::with_responder(responder));
    let composer = builder.build();
    composer.set_text("hello");
    composer.submit().await.unwrap();
    wait_idle(&mut idle_rx, 1).await;

    let entries = composer.transcript().await.unwrap();
    assert_eq!(entries[1].text(), FALLBACK_REPLY_TEXT);
    assert_ne!(FALLBACK_REPLY_TEXT, RESPONDER_ERROR_TEXT);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_submissions() {
    let mut responder = ScriptedResponder::default();
    responder.add_reply(
        PresetReply::with_text("slow reply")
            .with_delay(Duration::from_millis(50)),
    );
    responder.add_reply(
        PresetReply::with_text("fast reply")
            .with_delay(Duration::from_millis(10)),
    );

    let (builder, mut idle_rx) =
        idle_counter(ComposerBuilder::with_responder(responder));
    let composer = builder.build();

    composer.set_text("first");
    composer.submit().await.unwrap();
    composer.set_text("second");
    composer.submit().await.unwrap();

    // Both user entries are there before any reply settles.
    let entries = composer.transcript().await.unwrap();
    let texts = entries.iter().map(|e| e.text()).collect::<Vec<_>>();
    assert_eq!(texts, ["first", "second"]);

    wait_idle(&mut idle_rx, 1).await;
    let entries = composer.transcript().await.unwrap();
    let texts = entries.iter().map(|e| e.text()).collect::<Vec<_>>();
    assert_eq!(texts, ["first", "second", "fast reply", "slow reply"]);
    assert_eq!(*idle_rx.borrow(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_draft_reset_before_reply() {
    let mut responder = ScriptedResponder::default();
    responder.add_reply(
        PresetReply::with_text("later").with_delay(Duration::from_millis(100)),
    );

    let (builder, mut idle_rx) =
        idle_counter(ComposerBuilder::with_responder(responder));
    let composer = builder.build();
    composer.set_text("hello");
    composer.submit().await.unwrap();

    // The reply is still pending, but the draft is already reset.
    assert!(composer.draft().await.unwrap().is_empty());
    assert_eq!(composer.transcript().await.unwrap().len(), 1);

    // The next message can be composed while waiting.
    composer.set_text("next");
    wait_idle(&mut idle_rx, 1).await;
    assert_eq!(composer.draft().await.unwrap().text(), "next");
    assert_eq!(composer.transcript().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_second_file_replaces_first() {
    let mut responder = ScriptedResponder::default();
    responder.add_reply(PresetReply::with_text("ok"));

    let (builder, mut idle_rx) =
        idle_counter(ComposerBuilder::with_responder(responder));
    let composer = builder.build();
    composer.set_pending_file(text_file("one.txt", "1"));
    composer.set_pending_file(text_file("two.txt", "22"));

    let draft = composer.draft().await.unwrap();
    assert_eq!(draft.pending_file().unwrap().name(), "two.txt");

    composer.submit().await.unwrap();
    wait_idle(&mut idle_rx, 1).await;

    let entries = composer.transcript().await.unwrap();
    let with_attachment = entries
        .iter()
        .filter(|e| e.attachment().is_some())
        .collect::<Vec<_>>();
    assert_eq!(with_attachment.len(), 1);
    assert_eq!(with_attachment[0].attachment().unwrap().name, "two.txt");
}

#[tokio::test]
async fn test_clear_attachment_and_clear() {
    let composer =
        ComposerBuilder::with_responder(ScriptedResponder::default()).build();
    composer.set_text("keep me");
    composer.set_pending_file(text_file("a.txt", "a"));

    composer.clear_attachment();
    let draft = composer.draft().await.unwrap();
    assert_eq!(draft.text(), "keep me");
    assert!(draft.pending_file().is_none());

    composer.set_pending_file(text_file("a.txt", "a"));
    composer.clear();
    assert!(composer.draft().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_encode_failure_keeps_draft() {
    let responder = ScriptedResponder::default();
    let composer = ComposerBuilder::with_responder(responder.clone()).build();

    composer.set_text("see attached");
    composer.set_pending_file(PendingFile::from_parts(
        "gone.txt",
        10,
        "text/plain",
        FileSource::Path("/definitely/not/here/gone.txt".into()),
    ));

    let err = match composer.submit().await {
        Err(SubmitError::Encode(err)) => err,
        other => panic!("unexpected result: {other:?}"),
    };
    assert_eq!(err.kind(), EncodeErrorKind::Read);

    assert!(composer.transcript().await.unwrap().is_empty());
    assert!(responder.requests().is_empty());
    let draft = composer.draft().await.unwrap();
    assert_eq!(draft.text(), "see attached");
    assert_eq!(draft.pending_file().unwrap().name(), "gone.txt");
}

#[tokio::test]
async fn test_submit_while_encoding() {
    let mut responder = ScriptedResponder::default();
    responder.add_reply(PresetReply::with_text("ok"));

    let (builder, mut idle_rx) =
        idle_counter(ComposerBuilder::with_responder(responder.clone()));
    let composer = builder.build();
    composer.set_pending_file(PendingFile::from_bytes(
        "big.bin",
        "application/octet-stream",
        vec![7u8; 64 * 1024],
    ));

    let (first, second) = tokio::join!(composer.submit(), composer.submit());
    assert!(first.is_ok());
    assert_eq!(second, Err(SubmitError::EncodingInFlight));
    wait_idle(&mut idle_rx, 1).await;

    let entries = composer.transcript().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(responder.requests().len(), 1);
}

#[tokio::test]
async fn test_file_captured_at_submit() {
    let mut responder = ScriptedResponder::default();
    responder.add_reply(PresetReply::with_text("ok"));

    let (builder, mut idle_rx) =
        idle_counter(ComposerBuilder::with_responder(responder));
    let composer = builder.build();
    composer.set_pending_file(PendingFile::from_bytes(
        "original.bin",
        "application/octet-stream",
        vec![1u8; 64 * 1024],
    ));

    let (submitted, _) = tokio::join!(composer.submit(), async {
        composer.set_pending_file(PendingFile::from_bytes(
            "late.txt",
            "text/plain",
            &b"late"[..],
        ));
    });
    submitted.unwrap();
    wait_idle(&mut idle_rx, 1).await;

    let entries = composer.transcript().await.unwrap();
    assert_eq!(entries[0].attachment().unwrap().name, "original.bin");
    // The reset after the user entry is total.
    assert!(composer.draft().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_greeting_and_append_only() {
    let mut responder = ScriptedResponder::default();
    responder.add_reply(PresetReply::with_text("one"));
    responder.add_reply(PresetReply::with_text("two"));

    let (builder, mut idle_rx) = idle_counter(
        ComposerBuilder::with_responder(responder)
            .with_greeting("Hello! Send me a message or upload a file."),
    );
    let composer = builder.build();

    let before = composer.transcript().await.unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].origin(), Origin::Assistant);

    composer.set_text("a");
    composer.submit().await.unwrap();
    wait_idle(&mut idle_rx, 1).await;
    let middle = composer.transcript().await.unwrap();

    composer.set_text("b");
    composer.submit().await.unwrap();
    wait_idle(&mut idle_rx, 2).await;
    let after = composer.transcript().await.unwrap();

    assert_eq!(middle.len(), 3);
    assert_eq!(after.len(), 5);
    assert_eq!(&after[..before.len()], &before[..]);
    assert_eq!(&after[..middle.len()], &middle[..]);
    assert!(after.windows(2).all(|w| w[0].id() < w[1].id()));
}

#[derive(Clone, Default)]
struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct LoggingResponder(EventLog);

impl Responder for LoggingResponder {
    type Error = std::convert::Infallible;

    fn respond(
        &self,
        req: &ResponderRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static
    {
        self.0.push(format!("respond:{}", req.text));
        ready(Ok(format!("re: {}", req.text)))
    }
}

#[tokio::test]
async fn test_user_entry_before_responder() {
    let log = EventLog::default();
    let (builder, mut idle_rx) = idle_counter(
        ComposerBuilder::with_responder(LoggingResponder(log.clone()))
            .on_entry({
                let log = log.clone();
                move |entry| {
                    log.push(format!("{:?}:{}", entry.origin(), entry.text()))
                }
            }),
    );
    let composer = builder.build();
    composer.set_text("ping");
    composer.submit().await.unwrap();
    wait_idle(&mut idle_rx, 1).await;

    assert_eq!(
        log.events(),
        ["User:ping", "respond:ping", "Assistant:re: ping"]
    );
}

#[tokio::test]
async fn test_reply_after_last_handle_dropped() {
    let mut responder = ScriptedResponder::default();
    responder.add_reply(
        PresetReply::with_text("late reply")
            .with_delay(Duration::from_millis(20)),
    );

    let log = EventLog::default();
    let (builder, mut idle_rx) = idle_counter(
        ComposerBuilder::with_responder(responder).on_entry({
            let log = log.clone();
            move |entry| {
                log.push(format!("{:?}:{}", entry.origin(), entry.text()))
            }
        }),
    );
    let composer = builder.build();
    composer.set_text("hello");
    composer.submit().await.unwrap();
    drop(composer);

    // The pending reply still lands in the transcript.
    wait_idle(&mut idle_rx, 1).await;
    assert_eq!(log.events(), ["User:hello", "Assistant:late reply"]);
}
