//! MultiSpace: a personal productivity workspace.
//!
//! A [`workspace::Workspace`] ties together floating app windows, named
//! projects (with notes, goals and tracked time) and a focus timer. It can
//! be driven from the terminal dashboard in [`dashboard`] or one command at
//! a time from the `multispace` binary.

pub mod actions;
pub mod analytics;
pub mod components;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod dock;
pub mod drivers;
pub mod event_loop;
pub mod keybindings;
pub mod layout;
pub mod project;
pub mod runner;
pub mod theme;
pub mod timer;
pub mod tracing_sub;
pub(crate) mod ui;
pub mod window;
pub mod workspace;
