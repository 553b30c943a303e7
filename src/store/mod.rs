// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Local persistence for simulations.
//!
//! A simulation folder stands in for the remote persistence service: it serves records,
//! bookmarks and traversals to the explorer and accepts generated turns.

pub mod simulation_folder;

pub use simulation_folder::{flatten_records, SimulationFolder, StoreError, WriteDurability};
