//! lorikeet-dl - fetch the transcription model snapshot

use lorikeet_dl::{StatusLine, default_target_dir, emit, fetch_snapshot};
use std::process::ExitCode;

fn main() -> ExitCode {
    let target = default_target_dir();

    match fetch_snapshot(&target) {
        Ok(()) => {
            emit(&StatusLine::complete(format!(
                "model ready at {}",
                target.display()
            )));
            ExitCode::SUCCESS
        }
        Err(e) => {
            emit(&StatusLine::error(format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}
