//! Interactive console for managing an employee roster.

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Session::start().run()
}
