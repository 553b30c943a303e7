// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Parley: dialogue-tree core of a negotiation simulation explorer.
//!
//! Persisted turns become a [`model::DialogueNode`] tree ([`tree`]), which is navigated and
//! re-selected as pure snapshots, laid out top-to-bottom ([`layout`]), styled by bookmark paths
//! ([`highlight`]) and handed to a graph renderer as JSON ([`render`]). [`explorer`] drives the
//! persistence and generation collaborators; [`store`] is a folder-backed stand-in for the
//! former.

pub mod explorer;
pub mod highlight;
pub mod layout;
pub mod logging;
pub mod model;
pub mod render;
pub mod store;
pub mod tree;
