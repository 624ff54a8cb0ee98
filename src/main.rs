fn main() {
    if let Err(err) = aastha::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
