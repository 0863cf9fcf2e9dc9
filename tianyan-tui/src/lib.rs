mod command;
mod feeders;
mod input;
mod opener;
mod state;
mod styles;
mod surface;
mod tui;
mod view;

pub use command::{Command, parse_command};
pub use feeders::{spawn_quote_fetch, spawn_tui_feeders};
pub use opener::{LinkOpener, SystemOpener};
pub use surface::TuiSurface;
pub use tui::{TuiActor, TuiMsg, TuiOptions};
