// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use refrepath_adapters::DocumentHost;
use refrepath_core::SentinelKind;

/// Reference nodes of the open document, sentinels removed, in host order.
pub fn get_references<H: DocumentHost + ?Sized>(host: &H) -> Vec<String> {
    host.list_references()
        .into_iter()
        .filter(|node| match SentinelKind::classify(node) {
            Some(kind) => {
                tracing::trace!(node = %node, kind = %kind, "skipping sentinel reference");
                false
            }
            None => true,
        })
        .collect()
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
