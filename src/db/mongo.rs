//! MongoDB gateway — project configurations and sample-document fetching.
//!
//! Configurations live in `datagenie.projects`, keyed by `name` with
//! upsert semantics (last-write-wins, no versioning). Sampling runs an
//! aggregation against the default database of a caller-supplied
//! connection string, falling back to the store's own.

use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, Document};
use mongodb::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StoreError;
use crate::config;

/// A named, persisted project configuration. `config` is an opaque JSON
/// object this system stores but never interprets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub config: Value,
}

/// Handle on the document store. The driver pools connections internally;
/// cloning the client is cheap.
pub struct ProjectStore {
    client: Client,
    default_uri: String,
}

impl ProjectStore {
    /// Create a store for the given connection string. The driver connects
    /// lazily, so this only fails on an unparseable URI.
    pub async fn connect(uri: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self {
            client,
            default_uri: uri.to_string(),
        })
    }

    fn projects(&self) -> mongodb::Collection<Document> {
        self.client
            .database(config::DEFAULT_DATABASE)
            .collection(config::PROJECTS_COLLECTION)
    }

    /// Load every stored `{name, config}` pair. Documents that do not fit
    /// the shape are skipped rather than failing the whole load.
    pub async fn load_all_configs(&self) -> Result<Vec<ProjectConfig>, StoreError> {
        let mut cursor = self
            .projects()
            .find(doc! {})
            .projection(doc! { "_id": 0, "name": 1, "config": 1 })
            .await?;

        let mut configs = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            match bson::from_document::<ProjectConfig>(document) {
                Ok(config) => configs.push(config),
                Err(err) => tracing::warn!("Skipping malformed project document: {err}"),
            }
        }
        Ok(configs)
    }

    /// Upsert a configuration by name. Calling twice with the same name
    /// replaces the prior `config` entirely.
    pub async fn save_config(&self, name: &str, config: &Value) -> Result<(), StoreError> {
        let config = bson::to_bson(config).map_err(|e| StoreError::Conversion(e.to_string()))?;
        self.projects()
            .update_one(doc! { "name": name }, doc! { "$set": { "config": config } })
            .upsert(true)
            .await?;
        Ok(())
    }

    /// Run an aggregation and return up to `limit` documents, with `_id`
    /// stripped. `uri` overrides the store's connection string; the target
    /// database is the connection string's default database.
    pub async fn sample_documents(
        &self,
        uri: Option<&str>,
        collection: &str,
        pipeline: &Value,
        limit: i64,
    ) -> Result<Vec<Value>, StoreError> {
        let client = match uri {
            Some(uri) if uri != self.default_uri => Client::with_uri_str(uri).await?,
            _ => self.client.clone(),
        };
        let db = client
            .default_database()
            .ok_or(StoreError::NoDefaultDatabase)?;

        let stages = ensure_limit_stage(coerce_pipeline(pipeline), limit);
        let stages = stages
            .iter()
            .map(|stage| bson::to_document(stage).map_err(|e| StoreError::Conversion(e.to_string())))
            .collect::<Result<Vec<Document>, StoreError>>()?;

        let mut cursor = db.collection::<Document>(collection).aggregate(stages).await?;
        let mut docs = Vec::new();
        while let Some(mut document) = cursor.try_next().await? {
            document.remove("_id");
            docs.push(
                serde_json::to_value(&document).map_err(|e| StoreError::Conversion(e.to_string()))?,
            );
        }
        Ok(docs)
    }
}

/// Coerce the caller's pipeline into a stage list. Anything that is not a
/// JSON array silently becomes the empty pipeline.
pub(crate) fn coerce_pipeline(pipeline: &Value) -> Vec<Value> {
    match pipeline {
        Value::Array(stages) => stages.clone(),
        _ => Vec::new(),
    }
}

/// Append a `$limit` stage unless some top-level stage object already
/// carries a `$limit` key. The check is shallow: operator bodies are not
/// inspected.
pub(crate) fn ensure_limit_stage(mut stages: Vec<Value>, limit: i64) -> Vec<Value> {
    let has_limit = stages
        .iter()
        .any(|stage| stage.as_object().is_some_and(|obj| obj.contains_key("$limit")));
    if !has_limit {
        stages.push(serde_json::json!({ "$limit": limit }));
    }
    stages
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_array_pipeline_coerces_to_empty() {
        assert!(coerce_pipeline(&json!({"$match": {}})).is_empty());
        assert!(coerce_pipeline(&json!("nope")).is_empty());
        assert!(coerce_pipeline(&Value::Null).is_empty());
    }

    #[test]
    fn array_pipeline_passes_through() {
        let stages = coerce_pipeline(&json!([{"$match": {"a": 1}}]));
        assert_eq!(stages, vec![json!({"$match": {"a": 1}})]);
    }

    #[test]
    fn limit_appended_when_absent() {
        let stages = ensure_limit_stage(vec![json!({"$match": {"a": 1}})], 10);
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[1], json!({"$limit": 10}));
    }

    #[test]
    fn limit_appended_to_empty_pipeline() {
        let stages = ensure_limit_stage(Vec::new(), 25);
        assert_eq!(stages, vec![json!({"$limit": 25})]);
    }

    #[test]
    fn existing_limit_stage_suppresses_append() {
        let stages = ensure_limit_stage(vec![json!({"$limit": 3})], 10);
        assert_eq!(stages, vec![json!({"$limit": 3})]);
    }

    #[test]
    fn limit_check_is_shallow() {
        // A $limit nested inside another operator's body does not count.
        let stages = ensure_limit_stage(vec![json!({"$facet": {"x": [{"$limit": 1}]}})], 10);
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[1], json!({"$limit": 10}));
    }

    #[test]
    fn non_object_stages_do_not_satisfy_the_limit_check() {
        let stages = ensure_limit_stage(vec![json!("$limit")], 5);
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[1], json!({"$limit": 5}));
    }

    #[test]
    fn project_config_tolerates_missing_config_field() {
        let doc = doc! { "name": "legacy" };
        let parsed: ProjectConfig = bson::from_document(doc).unwrap();
        assert_eq!(parsed.name, "legacy");
        assert_eq!(parsed.config, Value::Null);
    }

    #[test]
    fn project_config_round_trips_through_json() {
        let config = ProjectConfig {
            name: "demo".into(),
            config: json!({"collection": "users", "pipeline": []}),
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["name"], "demo");
        assert_eq!(value["config"]["collection"], "users");
    }
}
