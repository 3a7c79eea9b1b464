use clap::Parser;
use datalisp_cli::{datalisp_to_json, exit_on_usage, init_logging, report, ToJsonArgs};

fn main() {
    let args = ToJsonArgs::try_parse().unwrap_or_else(|err| exit_on_usage(err));
    init_logging(&args.verbosity);
    if let Err(err) = datalisp_to_json(&args) {
        std::process::exit(report(err));
    }
}
