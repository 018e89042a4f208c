//! Document type definitions for OpenAPI merging.
//!
//! This module defines the in-memory document tree the merge engine works
//! on. Only the parts that take part in merging are modelled as typed
//! fields; everything else (schema bodies, parameter objects, operation
//! details, vendor extensions) is kept as opaque [`serde_json::Value`] data
//! so a document round-trips through JSON or YAML without loss.
//!
//! Named collections use [`IndexMap`], so iteration follows the order in
//! which entries appeared in the source document.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open mapping of vendor-extension keys to arbitrary values.
///
/// Any key of an object that is not part of its modelled vocabulary lands
/// here, so `x-*` fields and unmodelled specification fields are preserved.
pub type Extensions = IndexMap<String, Value>;

/// Named collection of opaque entries (schemas, parameters, ...).
pub type NamedValues = IndexMap<String, Value>;

/// Path templates mapped to their path items.
pub type Paths = IndexMap<String, PathItem>;

/// A security requirement: scheme name mapped to the required scopes.
///
/// Equality ignores scheme order, so two requirements listing the same
/// schemes in a different order compare equal.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// HTTP method of an operation slot on a [`PathItem`].
///
/// Only the methods that take part in operation-identifier bookkeeping are
/// modelled. `options` and `trace` are carried as opaque path-item data.
///
/// # Examples
///
/// ```
/// use openapi_mixin_core::Method;
///
/// assert_eq!(Method::ALL[0], Method::Get);
/// assert_eq!(Method::Patch.as_str(), "patch");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Head,
    Patch,
}

impl Method {
    /// Every modelled method, in the order operations are visited.
    pub const ALL: [Method; 6] = [
        Method::Get,
        Method::Put,
        Method::Post,
        Method::Delete,
        Method::Head,
        Method::Patch,
    ];

    /// Returns the lowercase field name used in documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Put => "put",
            Method::Post => "post",
            Method::Delete => "delete",
            Method::Head => "head",
            Method::Patch => "patch",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// Root of an OpenAPI document.
///
/// Collections that the merge writes into are `Option`s so that "absent"
/// and "present but empty" can be told apart while merging. Empty
/// collections are omitted when serializing, so materialising them does not
/// change the rendered document.
///
/// # Examples
///
/// ```
/// use openapi_mixin_core::*;
/// use serde_json::json;
///
/// let doc = Document::new("3.0.3")
///     .with_path("/pets", PathItem::new().with_operation(Method::Get, Operation::new("listPets")))
///     .with_schema("Pet", json!({"type": "object"}))
///     .with_tag(Tag::new("pets"));
///
/// assert_eq!(doc.paths.as_ref().map(|p| p.len()), Some(1));
/// assert!(doc.schema("Pet").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Specification version string (e.g. `"3.0.3"`).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "version_string"
    )]
    pub openapi: Option<String>,
    /// Top-level metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
    /// Server list, carried through untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Value>,
    /// External documentation reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    /// Tags, unique by name.
    #[serde(default, skip_serializing_if = "is_none_or_empty_list")]
    pub tags: Option<Vec<Tag>>,
    /// Global security requirements.
    #[serde(default, skip_serializing_if = "is_none_or_empty_list")]
    pub security: Option<Vec<SecurityRequirement>>,
    /// Path items keyed by path template. Written whenever present, even
    /// empty, since OpenAPI 3.0 requires the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Paths>,
    /// Reusable component definitions.
    #[serde(default, skip_serializing_if = "Components::is_none_or_empty")]
    pub components: Option<Components>,
    /// Root-level extension fields.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Document {
    /// Creates an empty document declaring the given specification version.
    pub fn new(openapi: impl Into<String>) -> Self {
        Self {
            openapi: Some(openapi.into()),
            ..Default::default()
        }
    }

    /// Sets the `info` object.
    pub fn with_info(mut self, info: Info) -> Self {
        self.info = Some(info);
        self
    }

    /// Adds a path item.
    pub fn with_path(mut self, path: impl Into<String>, item: PathItem) -> Self {
        self.paths
            .get_or_insert_with(IndexMap::new)
            .insert(path.into(), item);
        self
    }

    /// Adds a tag.
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.get_or_insert_with(Vec::new).push(tag);
        self
    }

    /// Adds a global security requirement.
    pub fn with_security(mut self, requirement: SecurityRequirement) -> Self {
        self.security.get_or_insert_with(Vec::new).push(requirement);
        self
    }

    /// Adds a root-level extension field.
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Adds a schema under `components.schemas`.
    pub fn with_schema(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.components_mut()
            .schemas
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), schema);
        self
    }

    /// Adds a parameter under `components.parameters`.
    pub fn with_parameter(mut self, name: impl Into<String>, parameter: Value) -> Self {
        self.components_mut()
            .parameters
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), parameter);
        self
    }

    /// Adds a response under `components.responses`.
    pub fn with_response(mut self, name: impl Into<String>, response: Value) -> Self {
        self.components_mut()
            .responses
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), response);
        self
    }

    /// Adds a security scheme under `components.securitySchemes`.
    pub fn with_security_scheme(mut self, name: impl Into<String>, scheme: Value) -> Self {
        self.components_mut()
            .security_schemes
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), scheme);
        self
    }

    /// Returns the components bundle, creating it if absent.
    pub fn components_mut(&mut self) -> &mut Components {
        self.components.get_or_insert_with(Components::default)
    }

    /// Looks up a path item by template.
    pub fn path(&self, path: &str) -> Option<&PathItem> {
        self.paths.as_ref()?.get(path)
    }

    /// Looks up a schema by name.
    pub fn schema(&self, name: &str) -> Option<&Value> {
        self.components.as_ref()?.schemas.as_ref()?.get(name)
    }

    /// Looks up a tag by name.
    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.as_ref()?.iter().find(|t| t.name == name)
    }
}

/// API metadata (`info`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "version_string"
    )]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Info {
    /// Creates metadata with a title and version.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            version: Some(version.into()),
            ..Default::default()
        }
    }
}

/// Contact information attached to [`Info`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// License information attached to [`Info`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// External documentation reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalDocs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Top-level tag. Tags are identified by `name` alone.
///
/// # Examples
///
/// ```
/// use openapi_mixin_core::Tag;
///
/// let tag = Tag::new("pets").with_description("Everything about pets");
/// assert_eq!(tag.name, "pets");
/// assert_eq!(tag.description.as_deref(), Some("Everything about pets"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Tag {
    /// Creates a tag with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Reusable component definitions.
///
/// The four merged sections are typed; every other section
/// (`requestBodies`, `headers`, `examples`, ...) is carried in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default, skip_serializing_if = "is_none_or_empty_map")]
    pub schemas: Option<NamedValues>,
    #[serde(default, skip_serializing_if = "is_none_or_empty_map")]
    pub responses: Option<NamedValues>,
    #[serde(default, skip_serializing_if = "is_none_or_empty_map")]
    pub parameters: Option<NamedValues>,
    #[serde(default, skip_serializing_if = "is_none_or_empty_map")]
    pub security_schemes: Option<NamedValues>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Components {
    /// Returns `true` when no section holds any entry.
    pub fn is_empty(&self) -> bool {
        is_none_or_empty_map(&self.schemas)
            && is_none_or_empty_map(&self.responses)
            && is_none_or_empty_map(&self.parameters)
            && is_none_or_empty_map(&self.security_schemes)
            && self.extra.is_empty()
    }

    fn is_none_or_empty(components: &Option<Components>) -> bool {
        components.as_ref().is_none_or(Components::is_empty)
    }
}

/// A path item: up to six typed operation slots plus opaque extras.
///
/// # Examples
///
/// ```
/// use openapi_mixin_core::{Method, Operation, PathItem};
///
/// let item = PathItem::new()
///     .with_operation(Method::Post, Operation::new("createPet"))
///     .with_operation(Method::Get, Operation::new("listPets"));
///
/// // Operations are always visited in method order, not insertion order.
/// let ids: Vec<_> = item
///     .operations()
///     .filter_map(|(_, op)| op.operation_id.as_deref())
///     .collect();
/// assert_eq!(ids, ["listPets", "createPet"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// Every other path-item field (summary, parameters, `options`, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl PathItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places an operation in the slot for `method`, replacing any previous one.
    pub fn with_operation(mut self, method: Method, operation: Operation) -> Self {
        *self.slot_mut(method) = Some(operation);
        self
    }

    pub fn operation(&self, method: Method) -> Option<&Operation> {
        match method {
            Method::Get => self.get.as_ref(),
            Method::Put => self.put.as_ref(),
            Method::Post => self.post.as_ref(),
            Method::Delete => self.delete.as_ref(),
            Method::Head => self.head.as_ref(),
            Method::Patch => self.patch.as_ref(),
        }
    }

    fn slot_mut(&mut self, method: Method) -> &mut Option<Operation> {
        match method {
            Method::Get => &mut self.get,
            Method::Put => &mut self.put,
            Method::Post => &mut self.post,
            Method::Delete => &mut self.delete,
            Method::Head => &mut self.head,
            Method::Patch => &mut self.patch,
        }
    }

    /// Iterates the present operations in [`Method::ALL`] order.
    pub fn operations(&self) -> impl Iterator<Item = (Method, &Operation)> {
        Method::ALL
            .into_iter()
            .filter_map(|method| self.operation(method).map(|op| (method, op)))
    }

    /// Mutable counterpart of [`operations`](PathItem::operations).
    pub fn operations_mut(&mut self) -> impl Iterator<Item = (Method, &mut Operation)> {
        [
            (Method::Get, &mut self.get),
            (Method::Put, &mut self.put),
            (Method::Post, &mut self.post),
            (Method::Delete, &mut self.delete),
            (Method::Head, &mut self.head),
            (Method::Patch, &mut self.patch),
        ]
        .into_iter()
        .filter_map(|(method, slot)| slot.as_mut().map(|op| (method, op)))
    }
}

/// A single operation. Only `operationId` is typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Every other operation field (responses, parameters, tags, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Operation {
    /// Creates an operation with the given identifier.
    pub fn new(operation_id: impl Into<String>) -> Self {
        Self {
            operation_id: Some(operation_id.into()),
            extra: IndexMap::new(),
        }
    }

    /// Adds an opaque field such as `summary` or `responses`.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Accepts versions written as bare YAML numbers (`version: 1.0`). Such
/// values go through a float, so `1.10` reads back as `1.1`.
fn version_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(version)) => Ok(Some(version)),
        Some(Value::Number(version)) => Ok(Some(version.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a version string, found {other}"
        ))),
    }
}

fn is_none_or_empty_list<T>(list: &Option<Vec<T>>) -> bool {
    list.as_ref().is_none_or(Vec::is_empty)
}

fn is_none_or_empty_map<V>(map: &Option<IndexMap<String, V>>) -> bool {
    map.as_ref().is_none_or(IndexMap::is_empty)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_extensions_capture_unmodelled_keys() {
        let doc: Document = serde_json::from_value(json!({
            "openapi": "3.0.3",
            "info": {"title": "Pets", "version": "1.0", "x-logo": "logo.png"},
            "x-internal": true,
            "paths": {}
        }))
        .unwrap();

        assert_eq!(doc.extensions.get("x-internal"), Some(&json!(true)));
        let info = doc.info.unwrap();
        assert_eq!(info.title.as_deref(), Some("Pets"));
        assert_eq!(info.extensions.get("x-logo"), Some(&json!("logo.png")));
    }

    #[test]
    fn test_operation_keeps_opaque_fields() {
        let item: PathItem = serde_json::from_value(json!({
            "summary": "Pets",
            "get": {"operationId": "listPets", "responses": {"200": {"description": "ok"}}},
            "options": {"operationId": "petOptions"}
        }))
        .unwrap();

        let get = item.get.as_ref().unwrap();
        assert_eq!(get.operation_id.as_deref(), Some("listPets"));
        assert!(get.extra.contains_key("responses"));
        assert!(item.extra.contains_key("summary"));
        assert!(item.extra.contains_key("options"));
        assert_eq!(item.operations().count(), 1);
    }

    #[test]
    fn test_empty_collections_are_not_serialized() {
        let doc = Document {
            openapi: Some("3.0.3".into()),
            tags: Some(Vec::new()),
            security: Some(Vec::new()),
            components: Some(Components {
                schemas: Some(IndexMap::new()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value, json!({"openapi": "3.0.3"}));
    }

    #[test]
    fn test_numeric_versions_read_as_strings() {
        let doc: Document = serde_json::from_value(json!({
            "openapi": "3.0.3",
            "info": {"title": "Pets", "version": 2}
        }))
        .unwrap();
        assert_eq!(doc.openapi.as_deref(), Some("3.0.3"));
        assert_eq!(doc.info.unwrap().version.as_deref(), Some("2"));

        let err = serde_json::from_value::<Document>(json!({"openapi": ["3"]})).unwrap_err();
        assert!(err.to_string().contains("expected a version string"));
    }

    #[test]
    fn test_empty_paths_object_is_kept() {
        let doc: Document =
            serde_json::from_value(json!({"openapi": "3.0.3", "paths": {}})).unwrap();
        assert_eq!(doc.paths.as_ref().map(IndexMap::len), Some(0));

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value, json!({"openapi": "3.0.3", "paths": {}}));

        let bare: Document = serde_json::from_value(json!({"openapi": "3.0.3"})).unwrap();
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!({"openapi": "3.0.3"}));
    }

    #[test]
    fn test_security_requirement_equality_ignores_scheme_order() {
        let mut a = SecurityRequirement::new();
        a.insert("api_key".into(), vec![]);
        a.insert("oauth".into(), vec!["read".into()]);
        let mut b = SecurityRequirement::new();
        b.insert("oauth".into(), vec!["read".into()]);
        b.insert("api_key".into(), vec![]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_operations_mut_visits_in_method_order() {
        let mut item = PathItem::new()
            .with_operation(Method::Patch, Operation::new("patchPet"))
            .with_operation(Method::Get, Operation::new("getPet"));
        let methods: Vec<_> = item.operations_mut().map(|(m, _)| m).collect();
        assert_eq!(methods, [Method::Get, Method::Patch]);
    }
}
