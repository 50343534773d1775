// This file is part of ENSNode.
//
// ENSNode is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// ENSNode is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with ENSNode.
// If not, see https://www.gnu.org/licenses/.

use metrics::{counter, gauge};

pub(crate) struct StatusMetrics;

impl StatusMetrics {
    pub(crate) fn increment_refresh_failures(reason: &'static str) {
        counter!("status_refresh_failures_total", "reason" => reason).increment(1);
    }

    pub(crate) fn set_overall_status(status: &ensnode_types::OverallIndexingStatus) {
        gauge!("status_overall_kind").set(status.kind() as u8 as f64);
        if let Some(distance) = status.overall_approx_realtime_distance() {
            gauge!("status_overall_realtime_distance_seconds").set(distance as f64);
        }
        for (chain_id, chain) in status.chains() {
            gauge!("status_chain_kind", "chain_id" => chain_id.to_string())
                .set(chain.kind() as u8 as f64);
            if let Some(block) = chain.latest_indexed_block() {
                gauge!("status_chain_latest_indexed_block", "chain_id" => chain_id.to_string())
                    .set(block.number as f64);
            }
        }
    }
}
