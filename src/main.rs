use litehandle::config::load_config;
use litehandle::{Connection, ConnectionConfig, Result};
use std::process::ExitCode;
use tracing::info;

const USAGE: &str = "usage: litehandle <db-path> <sql>\n       litehandle --config <file> <sql>";

fn main() -> ExitCode {
    // Initialize the logging system using tracing subscriber
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config, sql) = match args.as_slice() {
        [flag, file, sql] if flag == "--config" => match load_config(file) {
            Ok(config) => (config.database, sql),
            Err(e) => {
                eprintln!("Failed to load configuration: {}", e);
                return ExitCode::FAILURE;
            }
        },
        [path, sql] => (
            ConnectionConfig {
                path: path.clone(),
                ..ConnectionConfig::default()
            },
            sql,
        ),
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    match run(&config, sql) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Prepares `sql`, prints each result row tab-separated, then reports the
/// number of changed rows for statements that return no columns.
fn run(config: &ConnectionConfig, sql: &str) -> Result<()> {
    info!("Opening database: {}", config.path);
    let mut conn = Connection::new();
    conn.open_with(config)?;

    let mut stmt = conn.prepare(sql)?;
    let columns = stmt.column_count();
    while stmt.step()? {
        let row: Vec<String> = (0..columns).map(|column| stmt.get_string(column)).collect();
        println!("{}", row.join("\t"));
    }

    if columns == 0 {
        println!("{} row(s) changed", conn.changes());
    }
    Ok(())
}
