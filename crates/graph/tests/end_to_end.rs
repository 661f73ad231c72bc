use component_graph::strategy::ParentChildStrategy;
use component_graph::{
    ComponentGraph, ComponentNode, DetectionConfig, GraphConfig, RelationshipChange,
    RelationshipManager, RelationshipType,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::{Arc, Mutex};

#[test]
fn explicit_parent_hint_drives_children_and_siblings() {
    let mut manager = RelationshipManager::new();
    manager.register_strategy(Box::new(ParentChildStrategy::new(
        &DetectionConfig::default(),
    )));

    let header = ComponentNode::new("header", "Header");
    let dashboard = ComponentNode::new("dashboard", "Dashboard");
    let card = ComponentNode::new("card", "Card").parent("dashboard");
    for node in [header, dashboard, card] {
        let id = node.id.clone();
        manager.register_component(node);
        manager.detect(&id, false);
    }

    assert_eq!(manager.compute_summary("dashboard").children, vec!["card"]);
    assert!(manager.compute_summary("card").siblings.is_empty());
    assert!(manager.compute_summary("header").children.is_empty());

    let edge = manager
        .store()
        .edge("dashboard", "card", RelationshipType::ParentChild)
        .unwrap();
    assert_eq!(edge.strength, 1.0);
}

fn toolbar_app() -> Vec<ComponentNode> {
    vec![
        ComponentNode::new("app", "App").kind("page").structural_text(
            r#"
            const [title, setTitle] = useState("Inbox");
            return (
              <ThemeContext.Provider value={theme}>
                <Toolbar title={title} onSave={persist} />
                <Sidebar />
              </ThemeContext.Provider>
            );
            "#,
        ),
        ComponentNode::new("toolbar", "Toolbar")
            .structural_text("const theme = useContext(ThemeContext);")
            .attribute("title", json!("string"))
            .attribute("onSave", json!("() => void")),
        ComponentNode::new("sidebar", "Sidebar").shared_state("selection"),
        ComponentNode::new("list", "List")
            .parent("app")
            .shared_state("selection"),
    ]
}

#[test]
fn every_dimension_is_detected_from_structural_text() {
    let mut graph = ComponentGraph::new(GraphConfig::default()).unwrap();
    for node in toolbar_app() {
        graph.register_and_detect(node);
    }
    let store = graph.manager().store();

    let kinds = |source: &str, target: &str| -> Vec<RelationshipType> {
        RelationshipType::ALL
            .into_iter()
            .filter(|kind| store.edge(source, target, *kind).is_some())
            .collect()
    };

    assert_eq!(
        kinds("app", "toolbar"),
        vec![
            RelationshipType::ParentChild,
            RelationshipType::PropDependency,
            RelationshipType::StateDependency,
            RelationshipType::ContextDependency,
        ]
    );
    assert_eq!(kinds("toolbar", "app"), vec![RelationshipType::EventDependency]);
    assert_eq!(kinds("app", "sidebar"), vec![RelationshipType::ParentChild]);
    assert_eq!(kinds("list", "sidebar"), vec![RelationshipType::StateDependency]);

    let toolbar = graph.summary("toolbar");
    assert_eq!(toolbar.depends_on, vec!["app"]);
    assert_eq!(toolbar.siblings, vec!["sidebar", "list"]);
    assert_eq!(toolbar.shared_state_keys, vec!["title"]);

    let app = graph.summary("app");
    assert_eq!(app.children, vec!["toolbar", "sidebar", "list"]);
    assert_eq!(app.depended_on_by, vec!["toolbar"]);

    let prop = store
        .edge("app", "toolbar", RelationshipType::PropDependency)
        .unwrap();
    assert_eq!(prop.metadata.props, vec!["title"]);
    let event = store
        .edge("toolbar", "app", RelationshipType::EventDependency)
        .unwrap();
    assert_eq!(event.metadata.events, vec!["onSave"]);
}

#[test]
fn unregistering_updates_summaries_and_exports() {
    let mut graph = ComponentGraph::default();
    for node in toolbar_app() {
        graph.register_and_detect(node);
    }

    graph.unregister("toolbar");

    assert_eq!(graph.summary("app").children, vec!["sidebar", "list"]);
    assert!(graph.summary("app").depended_on_by.is_empty());
    let snapshot = graph.exporter().export_graph();
    assert!(snapshot
        .edges
        .iter()
        .all(|edge| edge.source != "toolbar" && edge.target != "toolbar"));
    assert_eq!(snapshot.nodes.len(), 3);
    assert_eq!(
        graph.exporter().export_hierarchy("app").map(|tree| tree.size()),
        Some(3)
    );
}

#[test]
fn listeners_see_every_detection_pass() {
    let mut graph = ComponentGraph::default();
    let changes: Arc<Mutex<Vec<RelationshipChange>>> = Arc::default();
    let recorded = Arc::clone(&changes);
    graph
        .manager_mut()
        .subscribe(move |change: &RelationshipChange| {
            recorded.lock().unwrap().push(change.clone());
        });

    for node in toolbar_app() {
        graph.register_and_detect(node);
    }
    graph.manager_mut().detect("list", false);

    let changes = changes.lock().unwrap();
    let ids: Vec<&str> = changes.iter().map(|c| c.component_id.as_str()).collect();
    assert_eq!(ids, vec!["app", "toolbar", "sidebar", "list", "list"]);
    assert_eq!(changes[3], changes[4]);
    assert_eq!(changes[3].summary.shared_state_keys, vec!["selection"]);
}
