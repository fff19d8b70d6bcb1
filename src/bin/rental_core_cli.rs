use rental_core::cli::{output, run_cli};

fn main() {
    if let Err(err) = run_cli() {
        output::print_error(err);
        std::process::exit(1);
    }
}
