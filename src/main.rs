fn main() -> std::process::ExitCode {
    prompt_cooker_lib::run()
}
