//! Command-line driver for the distributed maze-escape search.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process;
use std::thread;

use tracing_subscriber::EnvFilter;

use maze_escape::Error;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(error) = run() {
        eprintln!("{error}");
        process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let args: Vec<String> = std::env::args().collect();
    let mut opts = getopts::Options::new();
    opts.optopt("w", "workers", "number of workers", "NUM");
    opts.optflag("h", "help", "print this help");
    let matches = opts.parse(&args[1..]).map_err(|_| Error::Usage)?;

    if matches.opt_present("h") {
        print!("{}", opts.usage("usage: maze-escape [-w NUM] <input> <output>"));
        return Ok(());
    }

    let workers = match matches.opt_str("w") {
        Some(text) => text.parse().map_err(|_| Error::Usage)?,
        None => thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1),
    };
    if workers == 0 || matches.free.len() != 2 {
        return Err(Error::Usage);
    }
    let input = PathBuf::from(&matches.free[0]);
    let output = PathBuf::from(&matches.free[1]);

    maze_escape::run(workers, &input, &output)
}
