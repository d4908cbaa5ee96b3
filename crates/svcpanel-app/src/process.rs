//! Message processing: runs the TEA update loop and dispatches actions

use crate::actions::{handle_action, ActionContext};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message and every follow-up message it produces
pub fn process_message(state: &mut AppState, message: Message, ctx: &mut ActionContext) {
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, state, ctx);
        }

        msg = result.message;
    }
}
