//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::warn;

// Pline errors.
#[derive(Debug)]
pub enum Error {
    ConfigRead(std::io::Error),
    ConfigSyntax(usize),
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        match self {
            Error::ConfigRead(error) => {
                warn!(%error, "{}", self);
            }
            Error::ConfigSyntax(line) => {
                warn!(%line, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ConfigRead(..) => {
                write!(f, "failed to read configuration file")
            }
            Error::ConfigSyntax(..) => {
                write!(f, "invalid configuration syntax")
            }
        }
    }
}

impl std::error::Error for Error {}
