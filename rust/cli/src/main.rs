fn main() {
    holdem_cli::logging::init_logging();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let code = holdem_cli::run(std::env::args(), &mut stdout, &mut stderr);
    std::process::exit(code);
}
