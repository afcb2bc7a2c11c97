use fintrack_core::{cli::run_cli, init};

fn main() {
    init();

    if let Err(err) = run_cli() {
        fintrack_core::cli::output::error(&err);
        std::process::exit(1);
    }
}
