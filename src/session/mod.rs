pub mod debounce;
pub mod game;
pub mod interview;

pub use game::{GameAgent, GameController};
pub use interview::{CONFIG_PUSH_DEBOUNCE, InterviewController};
