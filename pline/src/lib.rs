//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Schema-directed command-line parser and completion engine for a CLI
//! shell editing configuration in a YANG-modeled datastore.
//!
//! Given a tokenized command line and a compiled schema, [`parse`] walks
//! the schema tree in lock-step with the input, producing the XPath
//! expressions addressed by the command ([`ParseLine::exprs`]) and the
//! completion candidates valid at the point the input ended
//! ([`ParseLine::compls`]).

pub mod client;
pub mod debug;
pub mod display;
pub mod error;
pub mod expr;
pub mod opts;
pub mod parser;
pub mod session;

pub use crate::client::Client;
pub use crate::error::Error;
pub use crate::expr::{Expr, Pat, PatMask};
pub use crate::opts::ParseOpts;
pub use crate::parser::{Completion, CompletionKind, ParseLine, parse};
pub use crate::session::{ContextHandle, Datastore, Session};
