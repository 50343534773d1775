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

use std::time::Instant;

use metrics::{counter, histogram, Histogram};

/// How a resolution was answered
#[derive(Clone, Copy, Debug)]
pub(crate) enum ResolutionPath {
    NoResolver,
    IndexedRecords,
    Live,
}

impl ResolutionPath {
    fn as_str(self) -> &'static str {
        match self {
            Self::NoResolver => "no_resolver",
            Self::IndexedRecords => "indexed_records",
            Self::Live => "live",
        }
    }
}

pub(crate) struct ResolutionMetrics;

/// Records elapsed milliseconds on drop, so early returns are timed too
pub(crate) struct LatencyTimer {
    started: Instant,
    histogram: Histogram,
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        self.histogram
            .record(self.started.elapsed().as_secs_f64() * 1000.0);
    }
}

impl ResolutionMetrics {
    /// Time a resolution until the returned guard drops
    pub(crate) fn time(kind: &'static str) -> LatencyTimer {
        LatencyTimer {
            started: Instant::now(),
            histogram: histogram!("resolution_duration_ms", "kind" => kind),
        }
    }

    pub(crate) fn increment_resolutions(path: ResolutionPath, accelerated_discovery: bool) {
        counter!(
            "resolution_requests_total",
            "path" => path.as_str(),
            "accelerated_discovery" => accelerated_discovery.to_string()
        )
        .increment(1);
    }

    pub(crate) fn increment_deferrals(from_chain_id: u64, to_chain_id: u64) {
        counter!(
            "resolution_deferrals_total",
            "from_chain_id" => from_chain_id.to_string(),
            "to_chain_id" => to_chain_id.to_string()
        )
        .increment(1);
    }

    pub(crate) fn increment_record_call_reverts(chain_id: u64) {
        counter!("resolution_record_call_reverts_total", "chain_id" => chain_id.to_string())
            .increment(1);
    }
}
