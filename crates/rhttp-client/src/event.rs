use crossterm::event::KeyEvent;

use rhttp_core::widget::{FileOutcome, OpenRequest};

use crate::executor::{ExecutorResult, HttpRequestCmd};

/// Everything the event loop feeds into the engine, in arrival order.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Response(ExecutorResult),
    FileOpened(FileOutcome),
}

/// Work the engine asks the event loop to start. Each one resolves later
/// as an `AppEvent`.
#[derive(Debug)]
pub enum Effect {
    Send(HttpRequestCmd),
    OpenFile(OpenRequest),
    Quit,
}
