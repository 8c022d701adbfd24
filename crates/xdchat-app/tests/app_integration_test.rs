//! End-to-end tests for the Runtime.
//!
//! A scripted driver types into the real App/Runtime/Session stack, which
//! talks TCP to a minimal in-process server.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - The exact lines the server received, in order
//! - App state reflects the session's state
//! - Settings changes reached the settings file

use std::{
    collections::VecDeque,
    io,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpListener,
    task::JoinHandle,
    time::timeout,
};
use xdchat_app::{App, AppAction, Driver, InputState, KeyInput, Runtime, SettingsStore};
use xdchat_client::{ConnectionState, Session, SessionConfig, TcpConnector};

const WAIT: Duration = Duration::from_secs(10);

type Condition = Box<dyn Fn(&App) -> bool + Send + Sync>;

enum Step {
    /// Type a line and press Enter.
    Line(&'static str),
    /// Press a single key.
    Key(KeyInput),
    /// Let session events flow until the App satisfies the condition.
    WaitUntil(Condition),
}

fn line(text: &'static str) -> Step {
    Step::Line(text)
}

fn wait_until(condition: impl Fn(&App) -> bool + Send + Sync + 'static) -> Step {
    Step::WaitUntil(Box::new(condition))
}

fn wait_for_log(expected: &'static str) -> Step {
    wait_until(move |app| app.log().iter().any(|l| l == expected))
}

fn wait_for_state(expected: ConnectionState) -> Step {
    wait_until(move |app| app.connection_state() == expected)
}

/// Drives the runtime from a fixed script and records every rendered frame.
struct ScriptedDriver {
    steps: VecDeque<Step>,
    input: InputState,
    frames: Arc<Mutex<Vec<App>>>,
}

impl ScriptedDriver {
    fn new(steps: Vec<Step>) -> (Self, Arc<Mutex<Vec<App>>>) {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let driver =
            Self { steps: steps.into(), input: InputState::new(), frames: Arc::clone(&frames) };
        (driver, frames)
    }
}

impl Driver for ScriptedDriver {
    type Error = io::Error;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, io::Error> {
        let waiting = match self.steps.front() {
            Some(Step::WaitUntil(condition)) => Some(condition(app)),
            _ => None,
        };
        match waiting {
            Some(true) => {
                self.steps.pop_front();
                return Ok(vec![]);
            },
            Some(false) => {
                tokio::time::sleep(Duration::from_millis(5)).await;
                return Ok(vec![]);
            },
            None => {},
        }

        match self.steps.pop_front() {
            Some(Step::Line(text)) => {
                let mut actions = Vec::new();
                for c in text.chars() {
                    actions.extend(self.input.handle_key(KeyInput::Char(c), app));
                }
                actions.extend(self.input.handle_key(KeyInput::Enter, app));
                Ok(actions)
            },
            Some(Step::Key(key)) => Ok(self.input.handle_key(key, app)),
            Some(Step::WaitUntil(_)) => Ok(vec![]),
            None => Ok(app.quit()),
        }
    }

    fn render(&mut self, app: &App) -> Result<(), io::Error> {
        self.frames.lock().unwrap().push(app.clone());
        Ok(())
    }

    fn stop(&mut self) {}
}

#[derive(Clone, Copy)]
enum ServerScript {
    /// Welcome, keep-alive probe, reply to the first message.
    Chat,
    /// Close right after registration.
    CloseAfterRegistration,
    /// Burst of notices after registration, then close.
    Flood,
}

/// Accept one client, follow `script`, return every line received.
async fn start_server(script: ServerScript) -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();
        let mut received = Vec::new();

        while let Ok(Some(line)) = lines.next_line().await {
            received.push(line.clone());

            if matches!(script, ServerScript::Flood) && line.starts_with("JOIN") {
                let flood: String = (0..500).map(|i| format!(":srv NOTICE * :flood {i}\r\n")).collect();
                write.write_all(flood.as_bytes()).await.unwrap();
                break;
            }

            let reply: &[u8] = match (script, line.split_whitespace().next()) {
                (ServerScript::CloseAfterRegistration, Some("JOIN")) => break,
                (ServerScript::Chat, Some("JOIN")) => {
                    b":irc.test 001 alice :Welcome\r\nPING :tok\r\n"
                },
                (ServerScript::Chat, Some("PONG")) => b":irc.test NOTICE alice :pong ok\r\n",
                (ServerScript::Chat, Some("PRIVMSG")) => b":bob!b@h PRIVMSG #test :hi alice\r\n",
                (_, Some("QUIT")) => break,
                _ => b"",
            };
            if !reply.is_empty() {
                write.write_all(reply).await.unwrap();
            }
        }
        received
    });

    (port, handle)
}

fn config_for(port: u16) -> SessionConfig {
    SessionConfig::default()
        .with_nickname("alice")
        .and_then(|c| c.with_channel("#test"))
        .and_then(|c| c.with_server("127.0.0.1"))
        .unwrap()
        .with_port(port)
}

fn runtime_for(
    config: SessionConfig,
    steps: Vec<Step>,
) -> (Runtime<ScriptedDriver, TcpConnector>, Arc<Mutex<Vec<App>>>) {
    runtime_with_queue(config, steps, xdchat_client::EVENT_QUEUE_CAPACITY)
}

fn runtime_with_queue(
    config: SessionConfig,
    steps: Vec<Step>,
    capacity: usize,
) -> (Runtime<ScriptedDriver, TcpConnector>, Arc<Mutex<Vec<App>>>) {
    let (driver, frames) = ScriptedDriver::new(steps);
    let (sink, events) = xdchat_client::channel_with_capacity(capacity);
    let session = Session::new(TcpConnector, config.clone(), sink);
    (Runtime::new(driver, App::new(config), session, events), frames)
}

async fn run_to_end(runtime: Runtime<ScriptedDriver, TcpConnector>) {
    timeout(WAIT, runtime.run()).await.expect("script did not finish").unwrap();
}

fn last_frame(frames: &Arc<Mutex<Vec<App>>>) -> App {
    frames.lock().unwrap().last().cloned().unwrap()
}

#[tokio::test]
async fn chat_session_end_to_end() {
    let (port, server) = start_server(ServerScript::Chat).await;
    let (runtime, frames) = runtime_for(config_for(port), vec![
        line("/connect"),
        wait_for_log(":irc.test 001 alice :Welcome"),
        wait_for_log(":irc.test NOTICE alice :pong ok"),
        line("hello"),
        wait_for_log("<alice> hello"),
        wait_for_log(":bob!b@h PRIVMSG #test :hi alice"),
        line("/quit"),
    ]);

    run_to_end(runtime).await;

    assert_eq!(server.await.unwrap(), [
        "NICK alice",
        "USER alice 0 * :XDchat IRC Client",
        "JOIN #test",
        "PONG :tok",
        "PRIVMSG #test :hello",
        "QUIT :XDchat IRC Client",
    ]);

    let app = last_frame(&frames);
    let banner = format!("=== Connected to 127.0.0.1:{port} ===");
    assert!(app.log().iter().any(|l| *l == banner));
    assert!(app.log().iter().any(|l| l == "PING :tok"));
}

#[tokio::test]
async fn f2_toggles_connection() {
    let (port, server) = start_server(ServerScript::Chat).await;
    let (runtime, _frames) = runtime_for(config_for(port), vec![
        Step::Key(KeyInput::F(2)),
        wait_for_state(ConnectionState::Connected),
        wait_for_log(":irc.test NOTICE alice :pong ok"),
        Step::Key(KeyInput::F(2)),
        wait_for_log("=== Disconnected from server ==="),
        Step::Key(KeyInput::Esc),
    ]);

    run_to_end(runtime).await;

    let received = server.await.unwrap();
    assert_eq!(received.last().map(String::as_str), Some("QUIT :XDchat IRC Client"));
    assert_eq!(received.iter().filter(|l| l.starts_with("QUIT")).count(), 1);
}

#[tokio::test]
async fn settings_change_only_while_disconnected() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.txt"));
    let (port, server) = start_server(ServerScript::Chat).await;

    let (runtime, _frames) = runtime_for(config_for(port), vec![
        line("/nick bob"),
        wait_until(|app| app.config().nickname == "bob"),
        line("/connect"),
        wait_for_state(ConnectionState::Connected),
        line("/join #elsewhere"),
        wait_until(|app| app.status_message().is_some_and(|m| m.contains("Disconnect"))),
        line("/quit"),
    ]);
    run_to_end(runtime.with_settings(store.clone())).await;

    let received = server.await.unwrap();
    assert_eq!(received[0], "NICK bob");
    assert_eq!(received[2], "JOIN #test");

    let saved = std::fs::read_to_string(store.path()).unwrap();
    assert!(saved.contains("nickname: bob\n"));
    assert!(saved.contains("channel: #test\n"));
    assert!(saved.contains("last_updated: "));
}

#[tokio::test]
async fn failed_connect_reports_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let (runtime, frames) = runtime_for(config_for(port), vec![
        line("/connect"),
        wait_until(|app| app.status_message().is_some_and(|m| m.starts_with("Error: failed to connect"))),
        line("/quit"),
    ]);

    run_to_end(runtime).await;

    let frames = frames.lock().unwrap();
    assert!(frames.iter().all(|app| app.connection_state() != ConnectionState::Connected));
}

#[tokio::test]
async fn server_close_is_reported_once() {
    let (port, server) = start_server(ServerScript::CloseAfterRegistration).await;
    let (runtime, frames) = runtime_for(config_for(port), vec![
        line("/connect"),
        wait_for_log("=== Disconnected: connection closed by server ==="),
        wait_for_state(ConnectionState::Disconnected),
        line("/disconnect"),
        line("/quit"),
    ]);

    run_to_end(runtime).await;
    server.await.unwrap();

    let app = last_frame(&frames);
    let notices = app.log().iter().filter(|l| l.starts_with("=== Disconnected")).count();
    assert_eq!(notices, 1);
    assert_eq!(app.status_message(), Some("Not connected"));
}

#[tokio::test]
async fn message_while_disconnected_is_not_sent() {
    let (runtime, frames) = runtime_for(config_for(1), vec![line("hello"), line("/quit")]);

    run_to_end(runtime).await;

    let app = last_frame(&frames);
    assert!(app.log().is_empty());
    assert!(app.status_message().is_some_and(|m| m.starts_with("Not connected")));
}

#[tokio::test]
async fn full_event_queue_does_not_strand_state() {
    let (port, server) = start_server(ServerScript::Flood).await;
    let was_connected = Arc::new(AtomicBool::new(false));
    let seen = Arc::clone(&was_connected);

    // One slot: the session drops most events, including state changes.
    let (runtime, frames) = runtime_with_queue(
        config_for(port),
        vec![
            line("/connect"),
            wait_until(move |app| {
                if app.connection_state() == ConnectionState::Connected {
                    seen.store(true, Ordering::SeqCst);
                }
                seen.load(Ordering::SeqCst) && app.connection_state() == ConnectionState::Disconnected
            }),
            line("/quit"),
        ],
        1,
    );

    run_to_end(runtime).await;
    server.await.unwrap();

    assert!(was_connected.load(Ordering::SeqCst));
    let app = last_frame(&frames);
    assert_eq!(app.connection_state(), ConnectionState::Disconnected);
    assert!(app.log().len() < 500);
}
