// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure derived-metrics layer feeding the dashboards.
//!
//! Everything here is synchronous data transformation over rows the caller
//! already loaded: resolve a period, filter/group/sum into buckets, reshape
//! for display. No I/O, no clock reads, no shared state.

pub mod aggregate;
pub mod period;
pub mod present;

pub use aggregate::MetricBucket;
pub use period::{Period, PeriodSelection};
