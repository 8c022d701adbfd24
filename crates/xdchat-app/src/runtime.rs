//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: View model
//! - [`Session`]: Connection lifecycle and wire I/O
//! - [`Driver`]: Platform-specific terminal I/O
//!
//! Input and session events are handled one at a time, so the App is only
//! ever touched from this loop even though the session's reader runs on its
//! own task.

use xdchat_client::{
    ConfigError, Connector, EventReceiver, SendError, Session, SessionConfig, SessionEvent,
};

use crate::{App, AppAction, AppEvent, Driver, SettingsStore};

/// What woke the loop up.
enum Step {
    Input(Vec<AppAction>),
    Session(SessionEvent),
}

/// Generic runtime that orchestrates App, Session and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific terminal driver
/// - `C`: Transport connector used by the session
pub struct Runtime<D, C>
where
    D: Driver,
    C: Connector,
{
    driver: D,
    app: App,
    session: Session<C>,
    events: EventReceiver,
    settings: Option<SettingsStore>,
    connect_on_start: bool,
}

impl<D, C> Runtime<D, C>
where
    D: Driver,
    C: Connector,
{
    /// Create a runtime over a session and the receiving end of its sink.
    pub fn new(driver: D, app: App, session: Session<C>, events: EventReceiver) -> Self {
        Self { driver, app, session, events, settings: None, connect_on_start: false }
    }

    /// Persist nickname and channel changes to `store`.
    #[must_use]
    pub fn with_settings(mut self, store: SettingsStore) -> Self {
        self.settings = Some(store);
        self
    }

    /// Connect as soon as the loop starts.
    #[must_use]
    pub fn connect_on_start(mut self, connect: bool) -> Self {
        self.connect_on_start = connect;
        self
    }

    /// Run the main event loop until the user quits.
    ///
    /// The session is disconnected on the way out, so quitting always sends
    /// `QUIT` to a connected server.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let result = self.run_loop().await;

        self.session.disconnect().await;
        self.driver.stop();
        result
    }

    async fn run_loop(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        if self.connect_on_start {
            let actions = self.app.connect();
            if self.process_actions(actions).await? {
                return Ok(());
            }
        }

        loop {
            if self.process_cycle().await? {
                return Ok(());
            }
        }
    }

    /// Process one input or session event.
    ///
    /// Returns `true` if the application should quit.
    async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        let step = tokio::select! {
            actions = self.driver.poll_event(&mut self.app) => Step::Input(actions?),
            Some(event) = self.events.recv() => Step::Session(event),
        };

        let mut actions = match step {
            Step::Input(actions) => actions,
            Step::Session(event) => self.app.handle(AppEvent::Session(event)),
        };
        actions.extend(self.sync_state());
        self.process_actions(actions).await
    }

    /// Catch the App up with the session state once the queue is drained.
    ///
    /// State changes travel through the event queue like everything else, and
    /// a full queue drops them. With the queue empty, every state event that
    /// made it has been applied, so any remaining mismatch was lost.
    fn sync_state(&mut self) -> Vec<AppAction> {
        let state = self.session.state();
        if !self.events.is_empty() || self.app.connection_state() == state {
            return vec![];
        }
        tracing::debug!("Resyncing connection state to {state}");
        self.app.handle(AppEvent::Session(SessionEvent::State(state)))
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    action => {
                        let follow_up = self.execute(action).await;
                        pending_actions.extend(follow_up);
                    },
                }
            }
        }
        Ok(false)
    }

    /// Apply a session action and feed the outcome back into the App.
    async fn execute(&mut self, action: AppAction) -> Vec<AppAction> {
        match action {
            AppAction::Connect => match self.session.connect().await {
                Ok(()) => vec![],
                Err(e) => self.app.handle(AppEvent::Error { message: e.to_string() }),
            },
            AppAction::Disconnect => {
                self.session.disconnect().await;
                vec![]
            },
            AppAction::Send { text } => match self.session.send(&text).await {
                Ok(()) => vec![],
                Err(SendError::NotConnected) => {
                    self.app.handle(AppEvent::Error { message: "not connected".into() })
                },
                Err(e) => self.app.handle(AppEvent::Error { message: e.to_string() }),
            },
            AppAction::SetNickname { nickname } => {
                let result = self.session.set_nickname(&nickname).await;
                self.config_result(result)
            },
            AppAction::SetChannel { channel } => {
                let result = self.session.set_channel(&channel).await;
                self.config_result(result)
            },
            AppAction::Render | AppAction::Quit => vec![action],
        }
    }

    /// Mirror an accepted change into the App and persist it.
    fn config_result(&mut self, result: Result<SessionConfig, ConfigError>) -> Vec<AppAction> {
        let config = match result {
            Ok(config) => config,
            Err(e) => return self.app.handle(AppEvent::Error { message: e.to_string() }),
        };

        let actions = self.app.handle(AppEvent::ConfigChanged(config.clone()));
        if let Some(store) = &self.settings
            && let Err(e) = store.save(&config)
        {
            tracing::warn!("{e}");
            self.app.set_status(format!("Settings not saved: {e}"));
        }
        actions
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a reference to the Session
    pub fn session(&self) -> &Session<C> {
        &self.session
    }
}
