//! Tests for component parsing, caching and lookup.
mod common;
use common::*;
use flowlib::component::{ComponentCache, ComponentLoader};
use flowlib::prelude::*;
use std::fs;

#[test]
fn test_load_component_from_dir() {
    let mut cache = ComponentCache::new();
    let mut loader = ComponentLoader::new(&mut cache);
    let id = loader
        .load_from_dir(&component_dir(), "test-component.yaml")
        .expect("fixture should load")
        .expect("fixture exists");

    let component = cache.get(id).expect("cached");
    assert_eq!(component.name, "test_component");
    assert_eq!(component.source_file, "test-component.yaml");
    assert_eq!(component.required_vars, vec!["required_var"]);
    assert_eq!(component.required_controllers["test_controller"], SSL_PACKAGE);
    assert_eq!(component.defaults["default_var1"], Value::from("x"));
    assert_eq!(component.process_group.len(), 3);
    assert!(!component.is_used());
}

#[test]
fn test_loading_same_locator_twice_returns_cached_instance() {
    let mut cache = ComponentCache::new();
    let mut loader = ComponentLoader::new(&mut cache);
    let first = loader
        .load_from_dir(&component_dir(), "simple-component.yaml")
        .unwrap()
        .unwrap();
    let second = loader
        .load_from_dir(&component_dir(), "./simple-component.yaml")
        .unwrap()
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cached_locator_is_not_read_again() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("component.yaml");
    fs::write(&path, "name: original\n").unwrap();

    let mut cache = ComponentCache::new();
    let mut loader = ComponentLoader::new(&mut cache);
    let first = loader.load_from_dir(dir.path(), "component.yaml").unwrap().unwrap();

    // A second load must not notice the rewritten file.
    fs::write(&path, "name: rewritten\n").unwrap();
    let second = loader.load_from_dir(dir.path(), "component.yaml").unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(cache.get(second).unwrap().name, "original");
}

#[test]
fn test_duplicate_component_name_is_skipped() {
    let mut cache = ComponentCache::new();
    let mut loader = ComponentLoader::new(&mut cache);
    let first = loader
        .load_from_dir(&component_dir(), "simple-component.yaml")
        .unwrap()
        .unwrap();
    let second = loader
        .load_from_dir(&component_dir(), "nested/simple-component.yaml")
        .unwrap()
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(first).unwrap().source_file, "simple-component.yaml");
    assert!(cache.find_by_path("nested/simple-component.yaml").unwrap().is_none());
}

#[test]
fn test_missing_component_file() {
    let mut cache = ComponentCache::new();
    let mut loader = ComponentLoader::new(&mut cache);
    let loaded = loader
        .load_from_dir(&component_dir(), "does-not-exist.yaml")
        .expect("a missing file is not a read error");
    assert!(loaded.is_none());
    assert!(cache.is_empty());
}

#[test]
fn test_unreadable_component_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("folder.yaml")).unwrap();

    let mut cache = ComponentCache::new();
    let err = ComponentLoader::new(&mut cache)
        .load_from_dir(dir.path(), "folder.yaml")
        .unwrap_err();
    assert!(matches!(
        err,
        FlowError::Definition(DefinitionError::ComponentSource { .. })
    ));
    assert!(err.to_string().contains("folder.yaml"));
}

#[test]
fn test_component_requires_name() {
    let mut cache = ComponentCache::new();
    let mut loader = ComponentLoader::new(&mut cache);
    let err = loader
        .load_from_dir(&component_dir(), "unnamed-component.yaml")
        .unwrap_err();
    assert!(matches!(
        err,
        FlowError::Definition(DefinitionError::MissingComponentName { .. })
    ));
}

#[test]
fn test_component_name_is_checked() {
    let mut cache = ComponentCache::new();
    let mut loader = ComponentLoader::new(&mut cache);
    let result = loader.load_spec(component_spec("name: controller"), "c.yaml".to_string());
    assert!(matches!(
        result,
        Err(FlowError::Definition(DefinitionError::InvalidName { .. }))
    ));
}

#[test]
fn test_load_batch_uses_source_file_or_name() {
    let specs = vec![
        component_spec("name: first\nsource_file: ./lib/first.yaml"),
        component_spec("name: second"),
        component_spec("name: first\nsource_file: other.yaml"),
    ];
    let mut cache = ComponentCache::new();
    let ids = ComponentLoader::new(&mut cache).load_batch(&specs).unwrap();

    assert_eq!(ids.len(), 3);
    assert_eq!(ids[0], ids[2]);
    assert_eq!(cache.len(), 2);
    assert!(cache.find_by_path("lib/first.yaml").unwrap().is_some());
    assert!(cache.find_by_path("second").unwrap().is_some());
    assert!(cache.find_by_path("other.yaml").unwrap().is_none());
    assert_eq!(cache.find_by_name("second"), Some(ids[1]));
}

#[test]
fn test_find_by_path_reports_ambiguity() {
    let specs = vec![
        component_spec("name: a\nsource_file: shared.yaml"),
        component_spec("name: b\nsource_file: shared.yaml"),
    ];
    let mut cache = ComponentCache::new();
    ComponentLoader::new(&mut cache).load_batch(&specs).unwrap();
    assert_eq!(cache.len(), 2);

    let err = cache.find_by_path("shared.yaml").unwrap_err();
    assert!(matches!(err, ValidationError::AmbiguousComponent(_)));
    assert!(err.to_string().contains("Found multiple loaded components"));
}
