use clap::Parser;
use env_logger::Env;
use fsquery_cli::Args;
use log::LevelFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str())).init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let stdout = std::io::stdout();
    if let Err(e) = fsquery_cli::run(&args, &mut stdout.lock()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
