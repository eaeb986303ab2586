// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Synthetic key presses through the X11 XTest extension.

use crate::actions::key::KeySynthesizer;
use crate::input::keysym::Keysym;
use crate::input::InputError;
use tracing::{debug, info};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::xproto::{ConnectionExt as _, Keycode, Window, KEY_PRESS_EVENT, KEY_RELEASE_EVENT};
use x11rb::protocol::xtest::{self, ConnectionExt as _};
use x11rb::rust_connection::RustConnection;

/// Keyboard on an X display, opened once at startup.
///
/// Dropping it closes the display connection.
pub struct X11Keyboard {
    conn: RustConnection,
    root: Window,
    keymap: Keymap,
}

impl X11Keyboard {
    /// Open the display (`None` uses `$DISPLAY`) and load its keyboard mapping.
    pub fn open(display: Option<&str>) -> Result<Self, InputError> {
        let (conn, screen_num) = x11rb::connect(display)?;

        if conn.extension_information(xtest::X11_EXTENSION_NAME)?.is_none() {
            return Err(InputError::NoXTest);
        }
        let version = conn.xtest_get_version(2, 2)?.reply()?;
        debug!("XTest {}.{}", version.major_version, version.minor_version);

        let setup = conn.setup();
        let root = setup
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or(InputError::NoScreen(screen_num))?;
        let min_keycode = setup.min_keycode;
        let count = setup.max_keycode - min_keycode + 1;

        let mapping = conn.get_keyboard_mapping(min_keycode, count)?.reply()?;
        let keymap = Keymap {
            min_keycode,
            keysyms_per_keycode: mapping.keysyms_per_keycode,
            keysyms: mapping.keysyms,
        };

        let display_name = display.unwrap_or("(default)");
        info!("Opened X display {}", display_name);
        Ok(Self { conn, root, keymap })
    }
}

impl KeySynthesizer for X11Keyboard {
    fn synthesize_key(&mut self, keysym: Keysym) -> Result<(), InputError> {
        let keycode = self
            .keymap
            .keycode_for(keysym)
            .ok_or(InputError::Unmapped(keysym))?;

        self.conn
            .xtest_fake_input(KEY_PRESS_EVENT, keycode, x11rb::CURRENT_TIME, self.root, 0, 0, 0)?;
        self.conn
            .xtest_fake_input(KEY_RELEASE_EVENT, keycode, x11rb::CURRENT_TIME, self.root, 0, 0, 0)?;
        self.conn.flush()?;

        debug!("Sent {} (keycode {})", keysym, keycode);
        Ok(())
    }
}

/// Server keyboard mapping: `keysyms_per_keycode` entries per keycode,
/// starting at `min_keycode`.
#[derive(Debug, Clone)]
struct Keymap {
    min_keycode: Keycode,
    keysyms_per_keycode: u8,
    keysyms: Vec<u32>,
}

impl Keymap {
    fn keycode_for(&self, keysym: Keysym) -> Option<Keycode> {
        let per_keycode = usize::from(self.keysyms_per_keycode);
        if per_keycode == 0 {
            return None;
        }
        let offset = self
            .keysyms
            .chunks(per_keycode)
            .position(|syms| syms.contains(&keysym.raw()))?;
        Keycode::try_from(usize::from(self.min_keycode) + offset).ok()
    }
}
