// SPDX-License-Identifier: Apache-2.0

pub(crate) mod assets;
pub(crate) mod handlers;
pub(crate) mod metrics;
pub(crate) mod reference;
