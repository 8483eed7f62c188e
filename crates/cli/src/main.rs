fn main() {
    if let Err(error) = csspath_cli::run() {
        // run() installs the subscriber right after argument parsing.
        tracing::error!(%error, "csspath failed");
        std::process::exit(1);
    }
}
