use clap::Parser;
use std::process::ExitCode;
use wsfront::{Cli, run};

fn main() -> ExitCode {
    // `wsfront simulate | head` closes stdout mid-replay; exit quietly on
    // SIGPIPE instead of panicking inside println!.
    #[cfg(unix)]
    restore_default_sigpipe();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(unix)]
fn restore_default_sigpipe() {
    // SAFETY: runs before any thread is spawned; SIG_DFL is always valid.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
