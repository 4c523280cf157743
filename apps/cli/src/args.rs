use std::env;
use std::path::PathBuf;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub events_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            port: None,
            config: None,
            events_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

pub fn parse_args() -> Result<CliArgs, String> {
    parse_from(env::args().skip(1))
}

fn parse_from<I>(args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--port" => {
                let value = next_value(&mut args, "--port")?;
                let port = value
                    .parse::<u16>()
                    .map_err(|_| format!("invalid port value: {value}"))?;
                parsed.port = Some(port);
            }
            "--config" => {
                parsed.config = Some(PathBuf::from(next_value(&mut args, "--config")?));
            }
            "--events-file" => {
                parsed.events_file = Some(PathBuf::from(next_value(&mut args, "--events-file")?));
            }
            "--log-level" => {
                parsed.log_level = next_value(&mut args, "--log-level")?;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument: {arg}"));
            }
        }
    }

    Ok(parsed)
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("missing value for {flag}"))
}

pub fn print_help() {
    println!(
        "Units Tracker\n\n\
Usage:\n  units-tracker [--port <port>] [--config <path>] [--events-file <path>] [--log-level <level>]\n\n\
Options:\n  --port <port>         Override the configured port for this run only\n  --config <path>       Read settings from this TOML file\n  --events-file <path>  Calendar-list export to collect events from\n  --log-level <level>   Log filter, e.g. info or units_app=debug (default: info)\n  -h, --help            Show this help message\n"
    );
}
