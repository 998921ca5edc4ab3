// SPDX-License-Identifier: MIT

//! Errors raised while spawning or driving the runner subprocess.

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error reading subprocess output: {0}")]
    Io(#[source] std::io::Error),

    #[error("failed to wait on subprocess: {0}")]
    Wait(#[source] std::io::Error),
}
