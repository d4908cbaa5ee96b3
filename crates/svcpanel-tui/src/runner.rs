//! Terminal runner: owns the terminal and drives the engine

use ratatui::DefaultTerminal;
use svcpanel_app::{Collaborators, Engine, ExitReason, Settings};
use svcpanel_core::prelude::*;

use crate::{event, render, terminal};

/// How the control panel ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub exit: ExitReason,
    /// Process exit code; after elevation, the elevated instance's
    pub exit_code: i32,
}

/// Run the control panel until the operator quits or an elevated instance
/// takes over
pub async fn run(settings: Settings, collaborators: Collaborators) -> Result<RunOutcome> {
    terminal::install_panic_hook();

    let mut engine = Engine::new(settings, collaborators);
    let mut term = match terminal::acquire() {
        Ok(term) => term,
        Err(e) => {
            engine.shutdown();
            return Err(e);
        }
    };

    let result = run_loop(&mut term, &mut engine).await;
    engine.shutdown();

    let released = match &result {
        Ok(released) => *released,
        Err(_) => false,
    };
    if !released {
        if let Err(e) = terminal::release() {
            error!("{}", e);
        }
    }
    result?;

    let exit = engine.exit_reason().unwrap_or(ExitReason::Quit);
    let exit_code = match exit {
        ExitReason::Quit => 0,
        ExitReason::Elevated => {
            info!("Handing over to the elevated instance");
            let gate = engine.state.gate.clone();
            tokio::task::spawn_blocking(move || gate.terminate_current())
                .await
                .unwrap_or(1)
        }
    };

    Ok(RunOutcome { exit, exit_code })
}

/// Event loop. Returns whether the terminal was already released on exit.
async fn run_loop(term: &mut DefaultTerminal, engine: &mut Engine) -> Result<bool> {
    loop {
        engine.drain_pending();

        if engine.take_elevation_request() {
            // The OS prompt needs the real terminal
            terminal::release()?;
            let outcome = engine.elevate().await;
            if outcome.is_success() {
                return Ok(true);
            }
            *term = terminal::acquire()?;
            continue;
        }

        if engine.should_quit() {
            return Ok(false);
        }

        term.draw(|frame| render::view(frame, &mut engine.state))?;

        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }
}
