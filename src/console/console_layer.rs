// Console layer - the terminal front-end.
// Parses typed commands, prints notices and renders session snapshots.

pub mod commands;

pub mod render;

pub mod terminal;

pub use terminal::{run, ConsoleIo, ConsoleNotifier};
