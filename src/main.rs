use std::io::{self, IsTerminal};
use std::process::ExitCode;

use gather::logging::{self, LogOptions};
use gather::{app, cli};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let invocation = match cli::parse_from(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(e) => {
            // help and version land here too, with a zero exit code
            let _ = e.print();
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    let options = LogOptions {
        debug: invocation.debug,
        use_color: io::stderr().is_terminal(),
    };
    if let Err(e) = logging::init(options) {
        eprintln!("[main]{e}");
    }

    match app::run(invocation).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
