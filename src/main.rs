use std::process::ExitCode;

fn main() -> ExitCode {
    automark::cli::run()
}
