use anyhow::Result;

fn main() -> Result<()> {
    cxxdoc_cli::main_entry()
}
