use std::process::ExitCode;

fn main() -> ExitCode {
    dokgen::cli::run()
}
