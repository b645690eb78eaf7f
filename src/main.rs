fn main() -> miette::Result<std::process::ExitCode> {
    dumpcheck::cli::run()
}
