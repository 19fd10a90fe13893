mod command;
mod store;
mod tui;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
