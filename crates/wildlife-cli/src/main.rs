mod command;
mod config;
mod input;
mod logging;
mod render;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
