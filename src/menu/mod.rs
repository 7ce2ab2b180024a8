pub mod dispatcher;

pub use dispatcher::{Dispatcher, MenuChoice, MenuState, TaskChoice};
