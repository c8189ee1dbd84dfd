fn main() {
    env_logger::init();
    log::info!("Starting Leafnote replay");

    if let Err(error) = leafnote_app::run(std::env::args_os()) {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}
