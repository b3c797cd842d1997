//! Resource graph: everything a deployment declares, ready for synthesis.
//!
//! Zones accumulate their own resources; a [`Stack`] absorbs them together
//! with provider blocks, KMS aliases and outputs, and renders the whole
//! graph as a Terraform JSON document.

mod resource;

pub use resource::{logical_id, PublishedRecord, Resource, ResourceKind, ResourceSet};

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};
use zonekit_core::{Provider, ProviderKind, Result, SigningKeyHandle, ZoneError};

/// A complete resource graph.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    name: String,
    providers: BTreeMap<String, Provider>,
    resources: ResourceSet,
    outputs: BTreeMap<String, Value>,
}

impl Stack {
    /// Create an empty stack.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Stack name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a provider instance under its alias.
    pub fn add_provider(&mut self, provider: Provider) -> Result<()> {
        if self.providers.contains_key(&provider.alias) {
            return Err(ZoneError::Deployment(format!(
                "provider alias {} declared twice",
                provider.alias
            )));
        }
        self.providers.insert(provider.alias.clone(), provider);
        Ok(())
    }

    /// Provider registered under `alias`.
    pub fn provider(&self, alias: &str) -> Result<&Provider> {
        self.providers
            .get(alias)
            .ok_or_else(|| ZoneError::Deployment(format!("unknown provider {alias}")))
    }

    /// Registered providers, by alias.
    pub fn providers(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values()
    }

    /// Declare a KMS alias for an externally created key and return the
    /// handle Route53 signing needs.
    pub fn kms_alias(
        &mut self,
        construct: &str,
        alias: &str,
        target_key_id: &str,
        provider: &Provider,
    ) -> Result<SigningKeyHandle> {
        provider.expect(ProviderKind::Aws)?;
        let resource = Resource::new(ResourceKind::AwsKmsAlias, construct, provider)?
            .attr("name", alias)
            .attr("target_key_id", target_key_id);
        let resource = self.resources.push(resource)?;
        debug!(alias, "declared KMS alias");
        Ok(resource.reference("target_key_arn").into())
    }

    /// Move resources declared elsewhere (usually by a zone) into the stack.
    pub fn absorb(&mut self, resources: impl IntoIterator<Item = Resource>) -> Result<()> {
        for resource in resources {
            self.resources.push(resource)?;
        }
        Ok(())
    }

    /// Declare an output.
    pub fn output(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if self.outputs.contains_key(name) {
            return Err(ZoneError::Deployment(format!("output {name} declared twice")));
        }
        self.outputs.insert(name.to_string(), value.into());
        Ok(())
    }

    /// All resources, in declaration order.
    #[must_use]
    pub const fn resources(&self) -> &ResourceSet {
        &self.resources
    }

    /// All DNS records, in declaration order.
    #[must_use]
    pub fn records(&self) -> Vec<PublishedRecord> {
        self.resources.records().collect()
    }

    /// Names of the zones that declared at least one resource.
    #[must_use]
    pub fn zones(&self) -> Vec<String> {
        let mut zones: Vec<String> = Vec::new();
        for zone in self.resources.iter().filter_map(|r| r.zone.as_ref()) {
            if !zones.contains(zone) {
                zones.push(zone.clone());
            }
        }
        zones
    }

    /// Render the graph as a Terraform JSON document.
    #[must_use]
    pub fn synth(&self) -> Value {
        let mut providers: Map<String, Value> = Map::new();
        for provider in self.providers.values() {
            let mut block = Map::new();
            block.insert("alias".into(), Value::String(provider.alias.clone()));
            for (key, value) in &provider.settings {
                block.insert(key.clone(), Value::String(value.clone()));
            }
            let entry = providers
                .entry(provider.kind.as_str())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(blocks) = entry {
                blocks.push(Value::Object(block));
            }
        }

        let mut resources: Map<String, Value> = Map::new();
        let mut data: Map<String, Value> = Map::new();
        for resource in self.resources.iter() {
            let mut body = resource.attributes.clone();
            body.insert("provider".into(), Value::String(resource.provider.clone()));
            if !resource.depends_on.is_empty() {
                body.insert("depends_on".into(), json!(resource.depends_on));
            }
            let block = if resource.kind.is_data() {
                &mut data
            } else {
                &mut resources
            };
            let by_type = block
                .entry(resource.kind.type_name())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(by_id) = by_type {
                by_id.insert(resource.logical_id(), Value::Object(body));
            }
        }

        let outputs: Map<String, Value> = self
            .outputs
            .iter()
            .map(|(name, value)| (name.clone(), json!({ "value": value })))
            .collect();

        info!(
            stack = %self.name,
            resources = self.resources.len(),
            outputs = self.outputs.len(),
            "synthesized stack"
        );

        let mut document = Map::new();
        for (key, block) in [
            ("provider", providers),
            ("data", data),
            ("resource", resources),
            ("output", outputs),
        ] {
            if !block.is_empty() {
                document.insert(key.into(), Value::Object(block));
            }
        }
        Value::Object(document)
    }

    /// Terraform JSON document, pretty-printed.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.synth())?)
    }
}
