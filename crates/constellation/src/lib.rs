//! The `constellation` command-line tool.
//!
//! A thin shell around [`constellation_core`]: it reads a stylesheet, merges
//! options from a YAML config file and the command line, runs the transform and
//! writes the result back.
//!
//! ```text
//! constellation transform site.css                 # rewrite in place
//! constellation transform site.css out.css -t dark # write elsewhere, dark fallback
//! constellation transform site.css --check         # exit 1 if blocks are stale
//! ```

pub mod cli;
pub mod config;
pub mod detect;
pub mod report;

pub use cli::{run, Cli, Status};
