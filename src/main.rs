//! ce-census binary entry point.

fn main() {
    if let Err(err) = ce_census::cli::run() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
