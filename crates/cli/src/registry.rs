use anyhow::{Context, Result};
use component_graph::{ComponentGraph, ComponentNode, GraphConfig};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Registry file: either a bare array of components or `{ "components": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum RegistryFile {
    List(Vec<ComponentNode>),
    Wrapped { components: Vec<ComponentNode> },
}

pub fn load_registry(path: &Path) -> Result<Vec<ComponentNode>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read registry {}", path.display()))?;
    let file: RegistryFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse registry {}", path.display()))?;
    Ok(match file {
        RegistryFile::List(components) | RegistryFile::Wrapped { components } => components,
    })
}

pub fn load_config(path: Option<&Path>) -> Result<GraphConfig> {
    match path {
        Some(path) => GraphConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(GraphConfig::default()),
    }
}

/// Register every component in file order, force-detecting each one right after
/// its registration the way a live registry would.
pub fn build_graph(components: Vec<ComponentNode>, config: GraphConfig) -> Result<ComponentGraph> {
    let mut graph = ComponentGraph::new(config).context("Invalid graph configuration")?;
    let total = components.len();
    let mut rejected = 0usize;

    for node in components {
        if graph.register_and_detect(node).is_none() {
            rejected += 1;
        }
    }

    let store = graph.manager().store();
    log::info!(
        "Loaded {} components ({} rejected), {} relationships",
        total - rejected,
        rejected,
        store.edge_count()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn accepts_bare_and_wrapped_registries() {
        let bare = write_temp(r#"[{"id":"a","name":"A"}]"#);
        let wrapped = write_temp(
            r#"{"components":[{"id":"a","name":"A","type":"page","explicitRelationshipHints":{"childrenIds":["b"]}},{"id":"b","name":"B"}]}"#,
        );

        assert_eq!(load_registry(bare.path()).unwrap().len(), 1);
        let components = load_registry(wrapped.path()).unwrap();
        assert_eq!(components[0].kind, "page");
        assert_eq!(components[0].explicit_hints.children_ids, vec!["b"]);
        assert_eq!(components[1].kind, "component");
    }

    #[test]
    fn parse_errors_name_the_file() {
        let broken = write_temp("{ not json");
        let err = load_registry(broken.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse registry"));
    }

    #[test]
    fn build_graph_detects_after_each_registration() {
        let components = vec![
            ComponentNode::new("b", "B").parent("a"),
            ComponentNode::new("a", "A"),
        ];
        let graph = build_graph(components, GraphConfig::default()).unwrap();
        assert_eq!(graph.summary("a").children, vec!["b"]);
    }
}
