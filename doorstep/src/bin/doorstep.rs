//! door-to-door earliest-arrival queries over a prepared transit dataset:
//! a directory of stops.csv and connections.csv files as produced by the
//! feed ingestion tooling.
use clap::Parser;
use doorstep::app::JourneyApp;

fn main() {
    env_logger::init();
    let args = JourneyApp::parse();
    args.op.run()
}
