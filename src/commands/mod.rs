mod capture;
mod key_press;
mod send_input;
mod wait;
mod wait_until;

pub use capture::Capture;
pub use key_press::KeyPress;
pub use send_input::SendInput;
pub use wait::Wait;
pub use wait_until::WaitUntil;

use crate::command::Action;
use crate::config::StepOrder;
use crate::session::Prompt;

/// Compile a prompt into the actions that run it, in execution order.
///
/// `capture_name` is only used when the prompt captures.
pub fn actions_for(prompt: &Prompt, capture_name: String, order: StepOrder) -> Vec<Box<dyn Action>> {
    let mut wait: Vec<Box<dyn Action>> = Vec::new();
    if let Some(pattern) = &prompt.wait_until {
        wait.push(Box::new(WaitUntil::new(pattern.clone(), prompt.wait_until_timeout())));
    } else if let Some(duration) = prompt.fixed_wait() {
        wait.push(Box::new(Wait::new(duration)));
    }

    let mut send: Vec<Box<dyn Action>> = Vec::new();
    if let Some(input) = &prompt.input {
        send.push(Box::new(SendInput::new(input.clone())));
    }
    if let Some(key) = &prompt.key {
        send.push(Box::new(KeyPress::new(key.clone())));
    }

    let mut actions = match order {
        StepOrder::WaitThenSend => [wait, send],
        StepOrder::SendThenWait => [send, wait],
    }
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();

    if prompt.capture {
        actions.push(Box::new(Capture {
            name: capture_name,
            prompt: prompt.input.clone(),
            wait: prompt.fixed_wait(),
        }));
    }
    actions
}
