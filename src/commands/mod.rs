// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod dashboard;
pub mod doctor;
pub mod exporter;
pub mod importer;
pub mod leads;
pub mod rules;
pub mod tasks;
pub mod timeclock;
pub mod transactions;
