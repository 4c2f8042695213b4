use std::io::Stdout;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use ratatui::{Terminal, backend::CrosstermBackend};

use rhttp_client::HttpTool;
use rhttp_client::event::{AppEvent, Effect};
use rhttp_client::executor::HttpExecutor;

/// Run the single event loop until a quit effect or every producer is gone.
pub fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, mut tool: HttpTool) -> Result<()> {
    let (tx, rx) = mpsc::channel::<AppEvent>();

    spawn_input(tx.clone()).context("failed to start input thread")?;
    spawn_ticker(tx.clone(), tool.tick_interval()).context("failed to start ticker")?;
    let executor =
        HttpExecutor::spawn(tx.clone(), AppEvent::Response).context("failed to start executor")?;

    let size = terminal.size()?;
    tool.resize(size.width, size.height);

    loop {
        terminal.draw(|frame| tool.render(frame))?;

        let Ok(event) = rx.recv() else {
            return Ok(());
        };

        for effect in tool.handle_event(event) {
            match effect {
                Effect::Quit => {
                    tracing::info!("quit");
                    return Ok(());
                }
                Effect::Send(cmd) => {
                    if let Err(err) = executor.send(cmd) {
                        tool.abort_send(err);
                    }
                }
                Effect::OpenFile(request) => {
                    let tx = tx.clone();
                    let spawned = thread::Builder::new()
                        .name("rhttp-file".to_string())
                        .spawn(move || {
                            let _ = tx.send(AppEvent::FileOpened(request.open()));
                        });
                    if let Err(err) = spawned {
                        tool.report_error(format!("cannot open file: {err}"));
                    }
                }
            }
        }
    }
}

/// Forward key and resize events from the terminal.
fn spawn_input(tx: Sender<AppEvent>) -> std::io::Result<()> {
    thread::Builder::new()
        .name("rhttp-input".to_string())
        .spawn(move || {
            loop {
                let event = match event::read() {
                    Ok(Event::Key(key)) => AppEvent::Key(key),
                    Ok(Event::Resize(width, height)) => AppEvent::Resize(width, height),
                    Ok(_) => continue,
                    Err(err) => {
                        tracing::error!(%err, "terminal input failed");
                        break;
                    }
                };
                if tx.send(event).is_err() {
                    break; // Event loop is gone
                }
            }
        })?;
    Ok(())
}

/// Emit a tick every `interval` for the status marquee and path suggestions.
fn spawn_ticker(tx: Sender<AppEvent>, interval: Duration) -> std::io::Result<()> {
    thread::Builder::new()
        .name("rhttp-ticker".to_string())
        .spawn(move || {
            loop {
                thread::sleep(interval);
                if tx.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}
