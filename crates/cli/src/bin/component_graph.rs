use anyhow::Result;

fn main() -> Result<()> {
    component_graph_cli::main_entry()
}
