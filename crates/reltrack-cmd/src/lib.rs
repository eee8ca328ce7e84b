//! Text protocol for reltrack.
//!
//! # Syntax
//!
//! Whitespace-separated tokens, one command per keyword:
//!
//! ```text
//! addent <entity>                       // register an entity
//! delent <entity>                       // unregister it and drop its edges
//! addrel <source> <destination> <rel>   // add a typed edge
//! delrel <source> <destination> <rel>   // remove a typed edge
//! report                                // print the per-relation maxima
//! end                                   // stop
//! ```
//!
//! Tokens are capped at 63 bytes. Any other keyword is malformed input.
//!
//! # Examples
//!
//! ```
//! use reltrack_cmd::{Command, Session, parse_command};
//!
//! let command = parse_command("addrel alice bob knows").unwrap();
//! assert_eq!(command.keyword(), "addrel");
//!
//! let mut session = Session::new(Vec::new());
//! session
//!     .run("addent alice\naddent bob\naddrel alice bob knows\nreport\nend\n".as_bytes())
//!     .unwrap();
//! assert_eq!(session.into_output(), b"knows bob 1;\n");
//! ```

mod command;
mod error;
mod session;
mod token;

pub use command::{Command, CommandReader, parse_command};
pub use error::{CommandError, CommandResult};
pub use session::{Flow, RunSummary, Session};
pub use token::Tokenizer;
