//! Named line-oriented logger (spec.md §6): levels `DEBUG`/`INFO`/`WARN`/
//! `ERROR`, writing to stdout as `<LEVEL> - <message>`.

use std::io::Write;

use log::LevelFilter;

/// Installs the global logger. `--debug` lowers the filter to `Debug`;
/// otherwise only `Info` and above are emitted.
pub fn init(debug: bool) {
    let filter = if debug { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(filter)
        .target(env_logger::Target::Stdout)
        .format(|buf, record| writeln!(buf, "{} - {}", record.level(), record.args()))
        .init();
}
