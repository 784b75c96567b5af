use coverage_check::cli;

fn main() {
    // The only place that decides the exit status.
    match cli::run() {
        Ok(verdict) => std::process::exit(i32::from(!verdict.passed())),
        Err(err) => {
            println!("{err}");
            std::process::exit(1);
        }
    }
}
