//! A simple program demonstrates how to use `little-chat` as a library.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use little_chat::SessionBuilder;
use little_chat::core::attachment::format_file_size;
use little_chat::core::{Origin, SubmitError, TranscriptEntry};
use little_chat::responders::{FormResponderConfigBuilder, StubResponder};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

enum SessionEvent {
    Idle,
    Entry(TranscriptEntry),
}

/// A line typed by the user.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Message(&'a str),
    Attach(&'a str),
    Detach,
    Clear,
    Endpoint(Option<&'a str>),
    Help,
    Quit,
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return Input::Message(line);
        };
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim())),
            None => (command, None),
        };
        match (name, arg) {
            ("attach", Some(path)) if !path.is_empty() => Input::Attach(path),
            ("detach", _) => Input::Detach,
            ("clear", _) => Input::Clear,
            ("endpoint", arg) => Input::Endpoint(arg.filter(|a| !a.is_empty())),
            ("quit" | "exit", _) => Input::Quit,
            ("help", _) => Input::Help,
            // Anything else is sent as typed.
            _ => Input::Message(line),
        }
    }
}

const BAR_CHAR: &str = "▎";

const HELP: &str = "\
/attach <path>    select a file for the next message
/detach           drop the selected file
/clear            drop the typed text and the selected file
/endpoint [url]   show or change the remote endpoint
/quit             leave";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let builder = match env::var("LITTLE_CHAT_ENDPOINT") {
        Ok(endpoint) => {
            let mut config =
                FormResponderConfigBuilder::new().with_endpoint(endpoint);
            if let Ok(page) = env::var("LITTLE_CHAT_PAGE") {
                config = config.with_page(page);
            }
            SessionBuilder::with_form_responder(config.build())
        }
        Err(_) => SessionBuilder::with_stub_responder(StubResponder::new()),
    };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let session = builder
        .on_idle({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(SessionEvent::Idle).ok();
            }
        })
        .on_entry({
            let event_tx = event_tx.clone();
            move |entry| {
                event_tx.send(SessionEvent::Entry(entry.clone())).ok();
            }
        })
        .build();

    if let Some(endpoint) = session.endpoint() {
        println!("Posting messages to {}", endpoint.bright_white());
    }
    drain_events(&mut event_rx);

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    'outer: loop {
        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line().await else {
            break;
        };

        let text = match Input::parse(&line) {
            Input::Message(text) => text,
            Input::Attach(path) => {
                match session.attach_file(path).await {
                    Ok(file) => println!(
                        "📎 {} ({})",
                        file.name().bright_white(),
                        format_file_size(file.size_bytes())
                    ),
                    Err(err) => eprintln!("Cannot attach {path}: {err}"),
                }
                continue;
            }
            Input::Detach => {
                session.detach_file();
                continue;
            }
            Input::Clear => {
                session.composer().clear();
                continue;
            }
            Input::Endpoint(None) => {
                match session.endpoint() {
                    Some(endpoint) => println!("{endpoint}"),
                    None => println!("Replying locally, there is no endpoint"),
                }
                continue;
            }
            Input::Endpoint(Some(endpoint)) => {
                if !session.set_endpoint(endpoint) {
                    eprintln!("Replying locally, there is no endpoint to change");
                }
                continue;
            }
            Input::Help => {
                println!("{HELP}");
                continue;
            }
            Input::Quit => break,
        };

        // Forget about events of earlier submissions that were not waited.
        drain_events(&mut event_rx);

        match session.send_message(text).await {
            Ok(_) => {}
            Err(SubmitError::NothingToSubmit) => continue,
            Err(err) => {
                eprintln!("{}", err.bright_red());
                continue;
            }
        }

        let mut progress_bar = None;

        loop {
            // Create a new progress bar if it has been finished.
            progress_bar
                .get_or_insert_with(|| {
                    let progress_bar = ProgressBar::new_spinner();
                    progress_bar.set_style(progress_style.clone());
                    progress_bar.set_message("📨 Waiting for a reply...");
                    progress_bar
                })
                .inc(1);

            let sleep = sleep(Duration::from_millis(100));
            let event = select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break 'outer;
                    };
                    event
                },
                _ = sleep => {
                    continue;
                }
            };

            // Finish the progress bar before printing anything else.
            if let Some(progress_bar) = &progress_bar {
                progress_bar.finish_and_clear();
            }
            progress_bar = None;

            match event {
                SessionEvent::Entry(entry) => print_entry(&entry),
                SessionEvent::Idle => break,
            }
        }
    }
}

fn drain_events(event_rx: &mut mpsc::UnboundedReceiver<SessionEvent>) {
    while let Ok(event) = event_rx.try_recv() {
        if let SessionEvent::Entry(entry) = event {
            print_entry(&entry);
        }
    }
}

fn print_entry(entry: &TranscriptEntry) {
    match entry.origin() {
        Origin::Assistant => {
            println!(
                "{}🤖 {}",
                BAR_CHAR.bright_cyan(),
                entry.text().bright_white()
            );
        }
        Origin::User => {
            // The user has seen the text already, just confirm the file.
            if let Some(attachment) = entry.attachment() {
                println!(
                    "{}📎 {} ({}) sent",
                    BAR_CHAR.bright_yellow(),
                    attachment.name,
                    format_file_size(attachment.size_bytes)
                );
            }
        }
    }
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
