// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Port bindings, transition resolution and action dispatch.

pub mod binding;
pub mod dispatcher;
pub mod resolver;

pub use binding::{BindingTable, PortBinding};
pub use dispatcher::Dispatcher;
pub use resolver::resolve;
