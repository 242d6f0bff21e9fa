use crate::events::FileEventSink;
use crate::tower::autopilot::Autopilot;
use crate::tower::tower::Tower;
use clap::Parser;
use colored::Colorize;
use parking_lot::Mutex;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tabled::settings::Style;

mod board;
mod error;
mod events;
mod flight;
mod minute;
mod pool;
mod report;
mod runway;
mod store;
mod tower;

#[derive(Parser)]
struct Args {
    /// Directory holding flights.csv and runways.csv
    #[arg(short, long, value_name = "DIR", default_value = "data")]
    data: PathBuf,
    /// Directory for events.log and report.log
    #[arg(short, long, value_name = "DIR", default_value = "logs")]
    logs: PathBuf,
    /// Real seconds per simulated minute in clock mode
    #[arg(short, long, default_value_t = 5.0)]
    pace: f64,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let mut pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn())
        .expect("Failed to spawn pager");

    let mut stdin = pager.stdin.take().expect("Failed to open stdin for pager");

    if let Err(e) = stdin.write_all(content.as_bytes()) {
        // Broken pipe is common if the user quits the pager early
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("Error writing to pager: {}", e);
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

fn print_table<T: tabled::Tabled>(rows: Vec<T>) {
    let count = rows.len();
    let mut table = tabled::Table::new(&rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if count > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

fn warn_rejected(file: &str, rejected: &[store::Rejected]) {
    for bad in rejected {
        println!(
            "{} {} line {}: {}",
            "[!]".yellow(),
            file,
            bad.line,
            bad.reason
        );
    }
}

fn parse_manual_flight(parts: &[&str]) -> Option<flight::Flight> {
    let (id, kind, expected, priority) = (
        parts.get(1)?,
        parts.get(2)?,
        parts.get(3)?,
        parts.get(4)?,
    );
    let kind = match kind.to_ascii_lowercase().as_str() {
        "arr" | "arrival" => flight::FlightKind::Arrival,
        "dep" | "departure" => flight::FlightKind::Departure,
        _ => return None,
    };
    let expected = expected.parse::<u64>().ok()?;
    let priority = flight::Priority::try_from(priority.parse::<u8>().ok()?).ok()?;
    let fuel = match parts.get(5) {
        Some(raw) => Some(raw.parse::<u64>().ok()?),
        None => None,
    };
    Some(flight::Flight::new(
        Arc::from(id.to_ascii_uppercase().as_str()),
        kind,
        Some(minute::Minute(expected)),
        priority,
        fuel,
    ))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    std::fs::create_dir_all(&args.logs)?;

    let flights = store::load_flights(&args.data.join("flights.csv"))?;
    let runways = store::load_runways(&args.data.join("runways.csv"))?;
    warn_rejected("flights.csv", &flights.rejected);
    warn_rejected("runways.csv", &runways.rejected);

    println!(
        "Tower online. {} flights and {} runways on the board.",
        flights.rows.len(),
        runways.rows.len()
    );

    let sink = FileEventSink::create(&args.logs.join("events.log"))?;
    let tower = Arc::new(Mutex::new(Tower::initialize(
        flights.rows,
        runways.rows,
        Box::new(sink),
    )));
    let mut autopilot: Option<Autopilot> = None;

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "ls".to_string(),
            "runways".to_string(),
            "status".to_string(),
            "tick".to_string(),
            "run".to_string(),
            "add".to_string(),
            "report".to_string(),
            "clock".to_string(),
            "halt".to_string(),
            "save".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" => {
                        let sub = parts.get(1).map(|s| *s).unwrap_or("a");
                        let rows: Vec<board::FlightStatus> = tower
                            .lock()
                            .board()
                            .rows()
                            .into_iter()
                            .filter(|row| match sub {
                                "w" | "waiting" => row.state == "WAITING",
                                "o" | "operating" => row.state == "ASSIGNED",
                                "d" | "done" => row.state == "DONE",
                                _ => true, // 'ls' or 'ls a'
                            })
                            .collect();
                        if rows.is_empty() {
                            println!("No matching flights found.")
                        } else {
                            print_table(rows);
                        }
                    },
                    "runways" => {
                        let rows = tower.lock().pool().rows();
                        if rows.is_empty() {
                            println!("No runways on the board.")
                        } else {
                            print_table(rows);
                        }
                    },
                    "status" => {
                        let summary = tower.lock().summary();
                        println!("Simulated minute: {}", summary.minute);
                        println!("Run state:        {}", summary.state);
                        println!("Enabled runways:  {}", summary.enabled_runways);
                        println!(
                            "Flights:          {} waiting / {} operating / {} done / {} total",
                            summary.counts.waiting,
                            summary.counts.assigned,
                            summary.counts.completed,
                            summary.counts.total,
                        );
                    },
                    "tick" => {
                        let mut guard = tower.lock();
                        match guard.tick() {
                            Ok(()) => println!("{} Advanced to t={}.", "[ok]".green(), guard.minute()),
                            Err(e) => println!("{} {}", "[!]".red(), e),
                        }
                    },
                    "run" => {
                        if let Some(n) = parts.get(1).and_then(|raw| raw.parse::<u64>().ok()) {
                            let mut guard = tower.lock();
                            match guard.advance(n) {
                                Ok(()) => println!("{} Advanced to t={}.", "[ok]".green(), guard.minute()),
                                Err(e) => println!("{} {}", "[!]".red(), e),
                            }
                        } else {
                            println!("Usage: run <minutes>");
                        }
                    },
                    "add" => {
                        match parse_manual_flight(&parts) {
                            Some(new_flight) => {
                                let id = new_flight.id.clone();
                                tower.lock().add_flight(new_flight);
                                println!("{} Flight {} queued.", "[ok]".green(), id);
                            }
                            None => println!("Usage: add <id> <arr|dep> <time> <priority 0-2> [fuel]"),
                        }
                    },
                    "report" => {
                        let report = tower.lock().report();
                        let path = args.logs.join("report.log");
                        match report.write_to(&path) {
                            Ok(()) => println!("{} Report written to {}.", "[ok]".green(), path.display()),
                            Err(e) => println!("{} Could not write report: {}", "[!]".red(), e),
                        }
                        print!("{}", report.render());
                    },
                    "clock" => {
                        if autopilot.as_ref().is_some_and(|ap| ap.is_engaged()) {
                            println!("Clock already running.");
                        } else {
                            let pace = parts
                                .get(1)
                                .and_then(|raw| raw.parse::<f64>().ok())
                                .unwrap_or(args.pace);
                            if !pace.is_finite() || pace <= 0.0 {
                                println!("Usage: clock [seconds > 0]");
                                continue;
                            }
                            autopilot = Some(Autopilot::engage(
                                tower.clone(),
                                Duration::from_secs_f64(pace),
                            ));
                            println!(
                                "{} Clock engaged: {}s real = 1 simulated minute. The menu stays live.",
                                "[ok]".green(),
                                pace
                            );
                        }
                    },
                    "halt" => {
                        match autopilot.take() {
                            Some(ap) => {
                                ap.disengage();
                                println!("{} Clock halted at t={}.", "[ok]".green(), tower.lock().minute());
                            }
                            None => println!("Clock is not running."),
                        }
                    },
                    "save" => {
                        let path = args.data.join("flights_backup.csv");
                        let guard = tower.lock();
                        match store::save_flights(&path, guard.board().flights()) {
                            Ok(()) => println!("{} Flight state saved to {}.", "[ok]".green(), path.display()),
                            Err(e) => println!("{} Could not save flights: {}", "[!]".red(), e),
                        }
                    },
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls [status]                       - List flights, or filter: w - waiting, o - operating, d - done");
                        println!("  runways                           - List runways with occupancy and usage");
                        println!("  status                            - Show clock, run state and flight counts");
                        println!("  tick                              - Advance the simulation 1 minute");
                        println!("  run <m>                           - Advance the simulation <m> minutes");
                        println!("  add <id> <arr|dep> <t> <p> [fuel] - Queue a flight by hand");
                        println!("  report                            - Write report.log and print it");
                        println!("  clock [secs]                      - Tick automatically every [secs] real seconds");
                        println!("  halt                              - Stop the automatic clock");
                        println!("  save                              - Write flights_backup.csv");
                        println!("  help / ?                          - Show this help menu");
                        println!("  exit / quit                       - Finalize, save and leave\n");
                    },
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(ap) = autopilot.take() {
        ap.disengage();
    }
    {
        let mut guard = tower.lock();
        guard.finalize();
        let path = args.data.join("flights_backup.csv");
        if let Err(e) = store::save_flights(&path, guard.board().flights()) {
            println!("{} Could not save flights: {}", "[!]".red(), e);
        }
    }
    Ok(())
}
