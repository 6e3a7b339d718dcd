#![forbid(unsafe_code)]

//! Elm-style runtime for terminal applications.
//!
//! The program runtime manages the update/view loop. It separates state
//! ([`Model`]) from rendering ([`Model::view`]) and uses [`Cmd`] for side
//! effects.
//!
//! Each event is handled to completion (including any store writes the
//! model performs) before the next event is read.
//!
//! ```ignore
//! use hs_runtime::program::{Cmd, Model};
//! use hs_core::event::Event;
//! use hs_render::frame::Frame;
//!
//! struct Counter {
//!     count: i32,
//! }
//!
//! enum Msg {
//!     Increment,
//!     Quit,
//! }
//!
//! impl From<Event> for Msg {
//!     fn from(event: Event) -> Self {
//!         match event {
//!             Event::Key(k) if k.is_char('q') => Msg::Quit,
//!             _ => Msg::Increment,
//!         }
//!     }
//! }
//!
//! impl Model for Counter {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Increment => { self.count += 1; Cmd::none() }
//!             Msg::Quit => Cmd::quit(),
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         frame.print(0, 0, &self.count.to_string(), frame.width());
//!     }
//! }
//! ```

use std::io::{self, Stdout};
use std::time::Duration;

use hs_core::event::Event;
use hs_core::terminal_session::{SessionOptions, TerminalSession};
use hs_render::frame::Frame;
use hs_render::presenter::Presenter;
use tracing::{debug, info};

/// The Model trait defines application state and behavior.
pub trait Model: Sized {
    /// The message type for this model.
    ///
    /// Must be convertible from terminal events.
    type Message: From<Event> + Send + 'static;

    /// Initialize the model with startup commands.
    ///
    /// Called once, after the model is attached to a runtime and before the
    /// first frame is rendered.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Update the model in response to a message.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state to a frame.
    fn view(&self, frame: &mut Frame);
}

/// Commands represent side effects to be executed by the runtime.
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Quit the application.
    Quit,
    /// Send a message to the model.
    Msg(M),
}

impl<M: std::fmt::Debug> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
        }
    }
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a quit command.
    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Return a stable name for tracing.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Msg(_) => "Msg",
        }
    }

    /// Check if this is a no-op.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Use the alternate screen buffer.
    pub alternate_screen: bool,
    /// Enable mouse support.
    pub mouse: bool,
    /// Enable bracketed paste.
    pub bracketed_paste: bool,
    /// Input poll timeout.
    pub poll_timeout: Duration,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            mouse: true,
            bracketed_paste: true,
            poll_timeout: Duration::from_millis(100),
        }
    }
}

impl ProgramConfig {
    fn session_options(&self) -> SessionOptions {
        SessionOptions {
            alternate_screen: self.alternate_screen,
            mouse_capture: self.mouse,
            bracketed_paste: self.bracketed_paste,
        }
    }
}

/// Drives a [`Model`] against the real terminal.
pub struct Program<M: Model> {
    model: M,
    config: ProgramConfig,
    session: TerminalSession,
    presenter: Presenter<Stdout>,
    size: (u16, u16),
    running: bool,
    dirty: bool,
}

impl<M: Model> Program<M> {
    /// Create a program with the default configuration.
    pub fn new(model: M) -> io::Result<Self> {
        Self::with_config(model, ProgramConfig::default())
    }

    /// Create a program, entering raw mode as configured.
    pub fn with_config(model: M, config: ProgramConfig) -> io::Result<Self> {
        let session = TerminalSession::new(config.session_options())?;
        let size = session.size()?;
        Ok(Self {
            model,
            config,
            session,
            presenter: Presenter::new(io::stdout()),
            size,
            running: true,
            dirty: true,
        })
    }

    /// Run the update/view loop until the model quits.
    pub fn run(&mut self) -> io::Result<()> {
        info!(width = self.size.0, height = self.size.1, "program started");
        let cmd = self.model.init();
        self.execute_cmd(cmd);

        // Models that map mouse positions need the real size before input.
        let (width, height) = self.size;
        self.dispatch(Event::Resize { width, height });

        while self.running {
            if self.dirty {
                self.render()?;
            }

            if self.session.poll_event(self.config.poll_timeout)?
                && let Some(event) = self.session.read_event()?
            {
                self.handle_event(event);
            }
        }

        info!(config = ?self.config, "program stopped");
        Ok(())
    }

    /// Get a reference to the model.
    pub fn model(&self) -> &M {
        &self.model
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Resize { width, height } = event {
            self.size = (width, height);
            self.presenter.invalidate();
            self.dirty = true;
        }
        self.dispatch(event);
    }

    fn dispatch(&mut self, event: Event) {
        let msg = M::Message::from(event);
        let cmd = self.model.update(msg);
        self.execute_cmd(cmd);
        self.dirty = true;
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => {
                debug!("quit requested");
                self.running = false;
            }
            Cmd::Msg(msg) => {
                let cmd = self.model.update(msg);
                self.execute_cmd(cmd);
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let (width, height) = self.size;
        let mut frame = Frame::new(width, height);
        self.model.view(&mut frame);
        let rows = self.presenter.present(&frame)?;
        debug!(rows, "frame presented");
        self.dirty = false;
        Ok(())
    }
}
