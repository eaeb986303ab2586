// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Input synthesis: keysym names and the X11 key sink.

pub mod keysym;
pub mod x11;

pub use keysym::Keysym;

use thiserror::Error;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to open display: {0}")]
    Connect(#[from] ConnectError),
    #[error("X11 connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("X11 request failed: {0}")]
    Reply(#[from] ReplyError),
    #[error("XTest extension not available")]
    NoXTest,
    #[error("Screen {0} not found")]
    NoScreen(usize),
    #[error("No keycode produces {0}")]
    Unmapped(Keysym),
}
