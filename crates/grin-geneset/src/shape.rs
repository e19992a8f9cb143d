//! Shape-directed walk over gene-set payloads.
//!
//! Every JSON value is classified as one [`Shape`], and each shape has a
//! single rule:
//!
//! | Shape    | As an item                   | As a named group           |
//! |----------|------------------------------|----------------------------|
//! | `Id`     | taken as an identifier       | ignored                    |
//! | `List`   | each element is an item      | each element is an item    |
//! | `Record` | `id`, `feature_id`, nested   | `feature_id`, nested       |
//! | `Other`  | ignored                      | ignored                    |
//!
//! "Nested" keys are `feature_ids` and `features`; their values are walked as
//! items. A bare `id` names a feature only on an item. On a group, or on the
//! top-level record, it names the group or the object itself and is skipped.
//!
//! A top-level record is read both as a group and as a mapping of named
//! groups, so `{"feature_ids": [...]}` and `{"up": [...], "down": {...}}`
//! both work. A top-level list is a list of items.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

const ITEM_ID_KEYS: &[&str] = &["feature_id", "id"];
const GROUP_ID_KEYS: &[&str] = &["feature_id"];
const NESTED_ID_KEYS: &[&str] = &["feature_ids", "features"];

/// Classification of a payload value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
  Id(&'a str),
  List(&'a [Value]),
  Record(&'a Map<String, Value>),
  Other,
}

impl<'a> Shape<'a> {
  pub fn of(value: &'a Value) -> Self {
    match value {
      Value::String(s) => Shape::Id(s),
      Value::Array(items) => Shape::List(items),
      Value::Object(map) => Shape::Record(map),
      _ => Shape::Other,
    }
  }
}

/// Collect every feature identifier reachable in `data`.
///
/// Identifiers are trimmed; blank ones are dropped. The result is
/// de-duplicated and ordered.
pub fn extract_feature_ids(data: &Value) -> BTreeSet<String> {
  let mut ids = BTreeSet::new();

  match Shape::of(data) {
    Shape::Record(map) => {
      walk_record(map, GROUP_ID_KEYS, &mut ids);
      for (key, group) in map {
        if is_group_key(key) {
          continue;
        }
        walk_group(group, &mut ids);
      }
    }
    Shape::List(items) => walk_items(items, &mut ids),
    Shape::Id(_) | Shape::Other => {}
  }

  ids
}

fn is_group_key(key: &str) -> bool {
  GROUP_ID_KEYS.contains(&key) || NESTED_ID_KEYS.contains(&key)
}

fn walk_group(value: &Value, ids: &mut BTreeSet<String>) {
  match Shape::of(value) {
    Shape::Record(map) => walk_record(map, GROUP_ID_KEYS, ids),
    Shape::List(items) => walk_items(items, ids),
    // A bare string in group position is a description, not an identifier.
    Shape::Id(_) | Shape::Other => {}
  }
}

fn walk_record(map: &Map<String, Value>, single_keys: &[&str], ids: &mut BTreeSet<String>) {
  for key in single_keys {
    if let Some(Shape::Id(id)) = map.get(*key).map(Shape::of) {
      insert(id, ids);
    }
  }
  for key in NESTED_ID_KEYS {
    if let Some(value) = map.get(*key) {
      walk_item(value, ids);
    }
  }
}

fn walk_items(items: &[Value], ids: &mut BTreeSet<String>) {
  for item in items {
    walk_item(item, ids);
  }
}

fn walk_item(value: &Value, ids: &mut BTreeSet<String>) {
  match Shape::of(value) {
    Shape::Id(id) => insert(id, ids),
    Shape::List(items) => walk_items(items, ids),
    Shape::Record(map) => walk_record(map, ITEM_ID_KEYS, ids),
    Shape::Other => {}
  }
}

fn insert(id: &str, ids: &mut BTreeSet<String>) {
  let id = id.trim();
  if !id.is_empty() {
    ids.insert(id.to_string());
  }
}
