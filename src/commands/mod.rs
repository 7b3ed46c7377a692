//! One module per `wt` command.
//!
//! Handlers receive their collaborators and output sinks as arguments.
//! Anything meant for the shell wrapper to `cd` into goes to `out`;
//! progress chatter for commands whose stdout is captured goes to `err`.

pub mod complete;
pub mod completion;
pub mod create;
pub mod gha;
pub mod jump;
pub mod list;
pub mod remove;
pub mod version;
