use crate::error::RecordError;
use crate::flight::{Flight, FlightState};
use crate::minute::Minute;
use crate::runway::Runway;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Row shape of `flights.csv`. Blank optional fields mean absent.
#[derive(Debug, Serialize, Deserialize)]
pub struct FlightRecord {
    pub id: String,
    pub kind: String,
    pub expected: Option<u64>,
    pub priority: u8,
    pub fuel: Option<u64>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Row shape of `runways.csv`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunwayRecord {
    pub id: String,
    pub category: String,
    pub hold: u64,
    pub enabled: u8,
}

/// A record the loader refused, with the file line it came from.
#[derive(Debug)]
pub struct Rejected {
    pub line: u64,
    pub reason: String,
}

/// Outcome of loading one file: a bad record is dropped, never the batch.
pub struct Batch<T> {
    pub rows: Vec<T>,
    pub rejected: Vec<Rejected>,
}

impl TryFrom<FlightRecord> for Flight {
    type Error = RecordError;

    fn try_from(record: FlightRecord) -> Result<Flight, RecordError> {
        if record.id.trim().is_empty() {
            return Err(RecordError::Missing("id"));
        }
        let kind = record.kind.parse().map_err(|value| RecordError::Invalid {
            field: "kind",
            value,
        })?;
        let priority =
            record
                .priority
                .try_into()
                .map_err(|value: u8| RecordError::Invalid {
                    field: "priority",
                    value: value.to_string(),
                })?;
        let state = match record.state.as_deref() {
            None | Some("") => FlightState::Waiting,
            Some(raw) => raw.parse().map_err(|value| RecordError::Invalid {
                field: "state",
                value,
            })?,
        };

        let mut flight = Flight::new(
            Arc::from(record.id.trim().to_ascii_uppercase().as_str()),
            kind,
            record.expected.map(Minute),
            priority,
            record.fuel,
        );
        flight.state = state;
        Ok(flight)
    }
}

impl TryFrom<RunwayRecord> for Runway {
    type Error = RecordError;

    fn try_from(record: RunwayRecord) -> Result<Runway, RecordError> {
        if record.id.trim().is_empty() {
            return Err(RecordError::Missing("id"));
        }
        if record.hold == 0 {
            return Err(RecordError::Invalid {
                field: "hold",
                value: "0".to_string(),
            });
        }
        let enabled = match record.enabled {
            0 => false,
            1 => true,
            other => {
                return Err(RecordError::Invalid {
                    field: "enabled",
                    value: other.to_string(),
                });
            }
        };
        Ok(Runway::new(
            Arc::from(record.id.trim()),
            record.category,
            record.hold,
            enabled,
        ))
    }
}

fn read_batch<R, T, M>(reader: R) -> Batch<M>
where
    R: io::Read,
    T: for<'de> Deserialize<'de> + TryInto<M, Error = RecordError>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut rejected = Vec::new();
    for (index, record) in csv_reader.deserialize::<T>().enumerate() {
        // header is line 1, the first record line 2
        let line = index as u64 + 2;
        match record {
            Ok(raw) => match raw.try_into() {
                Ok(row) => rows.push(row),
                Err(err) => rejected.push(Rejected {
                    line,
                    reason: err.to_string(),
                }),
            },
            Err(err) => rejected.push(Rejected {
                line,
                reason: err.to_string(),
            }),
        }
    }
    Batch { rows, rejected }
}

pub fn read_flights<R: io::Read>(reader: R) -> Batch<Flight> {
    read_batch::<R, FlightRecord, Flight>(reader)
}

pub fn read_runways<R: io::Read>(reader: R) -> Batch<Runway> {
    read_batch::<R, RunwayRecord, Runway>(reader)
}

pub fn load_flights(path: &Path) -> io::Result<Batch<Flight>> {
    Ok(read_flights(std::fs::File::open(path)?))
}

pub fn load_runways(path: &Path) -> io::Result<Batch<Runway>> {
    Ok(read_runways(std::fs::File::open(path)?))
}

/// Writes the current flight set back out, assignment state included.
pub fn save_flights<'a>(
    path: &Path,
    flights: impl Iterator<Item = &'a Flight>,
) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut sorted = flights.collect::<Vec<&Flight>>();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    for flight in sorted {
        writer.serialize(FlightRecord {
            id: flight.id.to_string(),
            kind: flight.kind.to_string(),
            expected: flight.expected.map(|minute| minute.0),
            priority: flight.priority.into(),
            fuel: flight.fuel,
            state: Some(flight.state.to_string()),
        })?;
    }
    writer.flush()?;
    Ok(())
}
