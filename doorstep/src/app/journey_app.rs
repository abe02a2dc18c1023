use super::JourneyOperation;
use clap::Parser;

/// command line tool for door-to-door journey planning over prepared
/// transit datasets
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct JourneyApp {
    #[command(subcommand)]
    pub op: JourneyOperation,
}
