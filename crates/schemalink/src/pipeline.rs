use crate::Error;
use log::info;
use schemalink_build::{
    EnumBinding, PreloadEntry, UnifiedModel, build_enum_bindings, build_preloads, reconcile,
};
use schemalink_config::Config;
use schemalink_model::{ModelBuilder, RelationalSchema};
use schemalink_schema::{SchemaType, TypeSystem, classify};
use schemalink_source::{TableRegistry, read_enums, scan_dir};
use serde::Serialize;
use std::{collections::BTreeMap, path::Path};
use xxhash_rust::xxh3::xxh3_64;

///
/// Pipeline
///

#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Load the configuration from a TOML file.
    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::new(Config::from_path(path)?))
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    ///
    /// run
    ///
    /// Scan `dir`, build the relational graph and reconcile it with `types`.
    /// Stages run strictly in order; only an unreadable directory or an
    /// undefined API type aborts the run.
    ///
    pub fn run(&self, dir: impl AsRef<Path>, types: &TypeSystem) -> Result<Output, Error> {
        let dir = dir.as_ref();
        let Config {
            source,
            schema,
            build,
        } = &self.config;

        // Phase 1: scan and registries
        let table = scan_dir(dir, source)?;
        let registry = TableRegistry::load(dir, source);
        let enums = read_enums(dir, source, &registry);

        // Phase 2: relational graph
        let relational = ModelBuilder::new(&table, &registry)
            .relation_suffix(source.relation_suffix.as_str())
            .enums(enums)
            .build();

        // Phase 3: classify and reconcile
        let classified = classify(types, &relational, schema);
        let models = reconcile(types, &relational, classified.clone(), build)?;

        // Phase 4: preloads and enum bindings
        let preloads = build_preloads(&models, &relational, build);
        let enums = build_enum_bindings(types, &relational);

        info!(
            "pipeline: {} relational models, {} api models, {} enum bindings",
            relational.len(),
            models.len(),
            enums.len()
        );

        Ok(Output {
            relational,
            classified,
            models,
            preloads,
            enums,
        })
    }
}

///
/// Output
/// Everything a template collaborator needs from one run.
///

#[derive(Clone, Debug, Serialize)]
pub struct Output {
    pub relational: RelationalSchema,
    pub classified: Vec<SchemaType>,
    pub models: Vec<UnifiedModel>,
    pub preloads: BTreeMap<String, Vec<PreloadEntry>>,
    pub enums: Vec<EnumBinding>,
}

impl Output {
    #[must_use]
    pub fn model(&self, name: &str) -> Option<&UnifiedModel> {
        self.models.iter().find(|m| m.name == name)
    }

    #[must_use]
    pub fn preloads_for(&self, name: &str) -> &[PreloadEntry] {
        self.preloads.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Stable hash of the serialized output; equal inputs give equal
    /// fingerprints.
    pub fn fingerprint(&self) -> Result<u64, Error> {
        let bytes = serde_json::to_vec(self)?;

        Ok(xxh3_64(&bytes))
    }
}
