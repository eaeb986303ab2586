// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Audio service session - PulseAudio integration.

pub mod pulse;
pub mod session;
pub mod subscription;
pub mod types;

pub use pulse::PulseSession;
pub use session::ExitOutcome;
