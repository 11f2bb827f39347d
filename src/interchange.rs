//! JSON interchange: the persisted/exported document and legacy import shapes.
//!
//! Import accepts exactly three shapes, tried in order:
//!
//! 1. canonical `{"permissions": [...], "roles": [...]}` (`roles` optional)
//! 2. a bare array of permission-like objects
//! 3. an object whose values are permission-like objects (keys ignored)
//!
//! Shapes 2 and 3 yield an empty role list. Every `id` is coerced to a
//! string, so a legacy numeric `7` becomes `"7"`. Anything else is a
//! `MalformedImport`.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{malformed, Result};
use crate::model::{Permission, Role, State};

/// Which accepted shape an import document has
#[derive(Debug)]
enum ImportShape {
    Canonical { permissions: Vec<Value>, roles: Vec<Value> },
    PermissionList(Vec<Value>),
    PermissionMap(Vec<Value>),
}

/// Serialize state in canonical shape
pub fn serialize(state: &State) -> Result<String> {
    serde_json::to_string_pretty(state).map_err(|e| malformed(e.to_string()))
}

/// Parse import text into state
pub fn deserialize(text: &str) -> Result<State> {
    let root: Value = serde_json::from_str(text).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;
    match classify(root)? {
        ImportShape::Canonical { permissions, roles } => {
            let permissions = permission_list(permissions)?;
            let roles = role_list(roles)?;
            Ok(State { permissions, roles })
        }
        ImportShape::PermissionList(items) | ImportShape::PermissionMap(items) => {
            Ok(State { permissions: permission_list(items)?, roles: Vec::new() })
        }
    }
}

fn classify(root: Value) -> Result<ImportShape> {
    match root {
        Value::Array(items) => Ok(ImportShape::PermissionList(items)),
        Value::Object(mut map) => {
            if matches!(map.get("permissions"), Some(Value::Array(_))) {
                let permissions = match map.remove("permissions") {
                    Some(Value::Array(v)) => v,
                    _ => Vec::new(),
                };
                let roles = match map.remove("roles") {
                    None | Some(Value::Null) => Vec::new(),
                    Some(Value::Array(v)) => v,
                    Some(_) => return Err(malformed("\"roles\" must be an array")),
                };
                return Ok(ImportShape::Canonical { permissions, roles });
            }
            if map.values().all(|v| v.is_object()) {
                return Ok(ImportShape::PermissionMap(map.into_iter().map(|(_, v)| v).collect()));
            }
            Err(malformed("object is neither {permissions, roles} nor a map of permissions"))
        }
        _ => Err(malformed("expected a JSON object or array")),
    }
}

fn permission_list(items: Vec<Value>) -> Result<Vec<Permission>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for (i, v) in items.iter().enumerate() {
        let p = permission_from(v).map_err(|e| malformed(format!("permission #{}: {}", i, e)))?;
        if !seen.insert(p.id.clone()) {
            return Err(malformed(format!("duplicate permission id {:?}", p.id)));
        }
        out.push(p);
    }
    Ok(out)
}

fn role_list(items: Vec<Value>) -> Result<Vec<Role>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for (i, v) in items.iter().enumerate() {
        let r = role_from(v).map_err(|e| malformed(format!("role #{}: {}", i, e)))?;
        if !seen.insert(r.id.clone()) {
            return Err(malformed(format!("duplicate role id {:?}", r.id)));
        }
        out.push(r);
    }
    Ok(out)
}

fn permission_from(v: &Value) -> std::result::Result<Permission, String> {
    let obj = as_object(v)?;
    let id = coerce_id(obj)?;
    let name = required_str(obj, "name")?;
    let description = optional_str(obj, "description")?.unwrap_or_default();
    let category = optional_str(obj, "category")?;
    Ok(Permission::with_id(id, &name, &description, category.as_deref()))
}

fn role_from(v: &Value) -> std::result::Result<Role, String> {
    let obj = as_object(v)?;
    let id = coerce_id(obj)?;
    let name = required_str(obj, "name")?;
    let description = optional_str(obj, "description")?.unwrap_or_default();
    let mut role = Role::with_id(id, &name, &description);
    match obj.get("permissions") {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                let p = permission_from(item).map_err(|e| format!("permission #{}: {}", i, e))?;
                role.permissions.push(p);
            }
            let dropped = role.dedup_permissions();
            if dropped > 0 {
                warn!(role = %role.id, dropped, "dropping duplicate role permissions");
            }
        }
        Some(_) => return Err("\"permissions\" must be an array".into()),
    }
    Ok(role)
}

fn as_object(v: &Value) -> std::result::Result<&Map<String, Value>, String> {
    v.as_object().ok_or_else(|| "expected an object".to_string())
}

/// Stringify the `id` field whatever its scalar type
fn coerce_id(obj: &Map<String, Value>) -> std::result::Result<String, String> {
    match obj.get("id") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err("\"id\" must be a string or number".into()),
        None => Err("missing \"id\"".into()),
    }
}

fn required_str(obj: &Map<String, Value>, field: &str) -> std::result::Result<String, String> {
    optional_str(obj, field)?.ok_or_else(|| format!("missing {:?}", field))
}

fn optional_str(obj: &Map<String, Value>, field: &str) -> std::result::Result<Option<String>, String> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(format!("{:?} must be a string", field)),
    }
}
