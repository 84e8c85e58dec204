use clap::Parser;

fn main() {
    let args = cli::Args::parse();
    cli::logging::init(&args.log);

    match cli::run(&args) {
        Ok(cli::ExitStatus::Success) => std::process::exit(0),
        Ok(cli::ExitStatus::Usage) => std::process::exit(1),
        Err(err) => {
            tracing::error!(error = ?err, "modelgen failed");
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    }
}
