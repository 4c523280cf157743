use std::env;
use std::fs::File;
use std::io::{self, Read};

use ingest::{parse_event, plots_from_events};
use units_core::{Granularity, RawEvent};

const DEFAULT_UNKNOWN_UNITS: f64 = 14.0;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("usage: plot_cli <events.json|-> <day|week|month|year> [unknown_default]");
        std::process::exit(2);
    }

    let granularity: Granularity = args[2].parse().unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(2);
    });
    let unknown_default = match args.get(3) {
        Some(raw) => raw.parse::<f64>().unwrap_or_else(|err| {
            eprintln!("invalid unknown_default {}: {}", raw, err);
            std::process::exit(2);
        }),
        None => DEFAULT_UNKNOWN_UNITS,
    };

    let path = &args[1];
    let mut data = String::new();
    if path == "-" {
        let mut stdin = io::stdin();
        stdin.read_to_string(&mut data).unwrap_or_else(|err| {
            eprintln!("failed to read stdin: {}", err);
            std::process::exit(1);
        });
    } else {
        let mut file = File::open(path).unwrap_or_else(|err| {
            eprintln!("failed to open {}: {}", path, err);
            std::process::exit(1);
        });
        file.read_to_string(&mut data).unwrap_or_else(|err| {
            eprintln!("failed to read {}: {}", path, err);
            std::process::exit(1);
        });
    }

    let raw: Vec<RawEvent> = serde_json::from_str(&data).unwrap_or_else(|err| {
        eprintln!("expected a JSON array of events: {}", err);
        std::process::exit(1);
    });

    let mut events = Vec::with_capacity(raw.len());
    for event in &raw {
        match parse_event(event) {
            Ok(parsed) => events.push(parsed),
            Err(err) => eprintln!("skipped: {}", err),
        }
    }
    events.sort_by_key(|event| event.date);

    let plots = plots_from_events(&events, granularity, unknown_default);
    if plots.is_empty() {
        eprintln!("no events");
        std::process::exit(3);
    }
    for plot in plots {
        println!("{} {}", plot.timestamp, plot.value);
    }
}
