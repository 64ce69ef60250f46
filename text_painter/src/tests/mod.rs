// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod test_outline;
mod test_paint;
mod test_staleness;
mod utils;
