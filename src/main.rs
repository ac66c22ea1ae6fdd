use std::process;

fn main() {
    if let Err(e) = taper::app::run() {
        tracing::error!("Fatal: {e:#}");
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
