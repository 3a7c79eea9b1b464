use clap::Parser;
use datalisp_cli::{exit_on_usage, init_logging, json_to_datalisp, report, ToDataLispArgs};

fn main() {
    let args = ToDataLispArgs::try_parse().unwrap_or_else(|err| exit_on_usage(err));
    init_logging(&args.verbosity);
    if let Err(err) = json_to_datalisp(&args) {
        std::process::exit(report(err));
    }
}
