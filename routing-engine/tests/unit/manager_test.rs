use super::*;

#[test]
fn can_translate_visit_indices() {
    let manager = RoutingIndexManager::new_single_depot(4, 2, 0);

    assert_eq!(manager.num_indices(), 8);
    assert_eq!(manager.start_index(0), 4);
    assert_eq!(manager.start_index(1), 5);
    assert_eq!(manager.end_index(0), 6);
    assert_eq!(manager.end_index(1), 7);
    assert_eq!(manager.index_to_node(2), 2);
    assert_eq!(manager.index_to_node(manager.start_index(1)), 0);
    assert_eq!(manager.index_to_node(manager.end_index(0)), 0);
    assert_eq!(manager.visit_indices().collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn can_resolve_unique_terminal_nodes() {
    let manager = RoutingIndexManager::new_start_end(5, 1, vec![0], vec![4]);

    assert_eq!(manager.node_to_index(2), Some(2));
    assert_eq!(manager.node_to_index(0), Some(manager.start_index(0)));
    assert_eq!(manager.node_to_index(4), Some(manager.end_index(0)));
    assert!(manager.is_terminal_node(0));
    assert!(!manager.is_terminal_node(2));
}

#[test]
fn cannot_resolve_shared_terminal_nodes() {
    let manager = RoutingIndexManager::new_single_depot(4, 1, 1);

    assert_eq!(manager.node_to_index(1), None);
    assert_eq!(manager.node_to_index(4), None);
}

#[test]
fn can_detect_route_ends() {
    let manager = RoutingIndexManager::new_start_end(3, 2, vec![0, 1], vec![2, 2]);

    assert!(!manager.is_end(manager.start_index(0)));
    assert!(manager.is_end(manager.end_index(0)));
    assert!(manager.is_end(manager.end_index(1)));
    assert!(!manager.is_end(1));
}
