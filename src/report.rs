use crate::board::FlightBoard;
use crate::flight::FlightKind;
use crate::minute::Minute;
use crate::pool::RunwayPool;
use crate::runway::RunwayId;
use std::fmt::Write as _;
use std::path::Path;

pub struct CompletedDetail {
    pub id: String,
    pub kind: FlightKind,
    pub emergency: bool,
    pub started_at: Minute,
    pub finished_at: Minute,
}

/// End-of-run aggregate snapshot, rendered into `report.log`.
pub struct TowerReport {
    pub minute: Minute,
    pub completed: usize,
    pub mean_wait: f64,
    pub usage: Vec<(RunwayId, u64)>,
    pub emergencies: usize,
    pub detail: Vec<CompletedDetail>,
}

impl TowerReport {
    pub fn capture(minute: Minute, board: &FlightBoard, pool: &RunwayPool) -> TowerReport {
        // wait = minutes between the expected time and the runway start,
        // clamped at 0 for flights handled early
        let waits = board
            .completed_flights()
            .filter_map(|flight| {
                let expected = flight.expected_minute()?;
                let started = flight.started_at?;
                Some(started.saturating_since(expected))
            })
            .collect::<Vec<u64>>();
        let mean_wait = if waits.is_empty() {
            0.0
        } else {
            waits.iter().sum::<u64>() as f64 / waits.len() as f64
        };

        let detail = board
            .completed_flights()
            .filter_map(|flight| {
                Some(CompletedDetail {
                    id: flight.id.to_string(),
                    kind: flight.kind,
                    emergency: flight.is_emergency(),
                    started_at: flight.started_at?,
                    finished_at: flight.finished_at?,
                })
            })
            .collect::<Vec<CompletedDetail>>();

        TowerReport {
            minute,
            completed: board.counts().completed,
            mean_wait,
            usage: pool.usage(),
            emergencies: board
                .completed_flights()
                .filter(|flight| flight.is_emergency())
                .count(),
            detail,
        }
    }

    pub fn render(&self) -> String {
        let usage = self
            .usage
            .iter()
            .map(|(id, operations)| format!("{}={} ops", id, operations))
            .collect::<Vec<String>>()
            .join(", ");

        let mut out = String::new();
        let _ = writeln!(out, "SUMMARY");
        let _ = writeln!(out, "- Simulated minutes: {}", self.minute);
        let _ = writeln!(out, "- Flights handled: {}", self.completed);
        let _ = writeln!(out, "- Mean wait (min): {:.1}", self.mean_wait);
        let _ = writeln!(out, "- Runway usage: {}", usage);
        let _ = writeln!(out, "- Emergencies handled: {}", self.emergencies);
        let _ = writeln!(out, "- Completed flight detail:");
        for flight in &self.detail {
            let extra = if flight.emergency { ", EMERGENCY" } else { "" };
            let _ = writeln!(
                out,
                "   {}  ({}{})  start={}  end={}",
                flight.id, flight.kind, extra, flight.started_at, flight.finished_at
            );
        }
        out
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.render())
    }
}
