pub mod input;
pub mod state;

pub use input::{input_queue, InputEvent, InputSender, InputState, Key, MovementIntent, PointerButton};
pub use state::Player;
