pub mod types;
pub mod validation;

use clap::Parser;

pub use types::{Args, CleanArgs};

/// Parses the command line (and environment) and exits with a message if the
/// combination is unusable.
#[must_use]
pub fn args_checks() -> CleanArgs {
    let args = Args::parse();
    match args.validate() {
        Ok(clean) => clean,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}
