use holdem_odds::cli;

fn main() {
    env_logger::init();
    cli::run();
}
