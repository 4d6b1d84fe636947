//! Loading and lookup of passive tree definitions.

use super::types::{PassiveTree, TreeDefinition};
use crate::core::error::TreeError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Definitions compiled into the crate, one per class tree.
pub const BUILTIN_TREES: [(&str, &str); 4] = [
    ("warrior_tree.json", include_str!("../../data/trees/warrior_tree.json")),
    ("ranger_tree.json", include_str!("../../data/trees/ranger_tree.json")),
    ("mage_tree.json", include_str!("../../data/trees/mage_tree.json")),
    ("summoner_tree.json", include_str!("../../data/trees/summoner_tree.json")),
];

/// Where a tree definition comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeSource {
    Embedded {
        name: &'static str,
        json: &'static str,
    },
    File(PathBuf),
    /// Every `*.json` file directly inside the directory
    Directory(PathBuf),
}

/// Registered trees by id. Trees are immutable once registered; a reload
/// replaces the whole set.
#[derive(Debug, Clone, Default)]
pub struct TreeRegistry {
    sources: Vec<TreeSource>,
    trees: BTreeMap<String, PassiveTree>,
    /// Bumped whenever the registered set changes
    generation: u64,
}

impl TreeRegistry {
    /// Registry with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose sources are the built-in class trees. Call
    /// [`load_all`](Self::load_all) to populate it.
    pub fn with_builtin_trees() -> Self {
        let mut registry = Self::new();
        for (name, json) in BUILTIN_TREES {
            registry.add_source(TreeSource::Embedded { name, json });
        }
        registry
    }

    /// Sources are read in the order they were added; a later tree with the
    /// same id replaces an earlier one.
    pub fn add_source(&mut self, source: TreeSource) {
        self.sources.push(source);
    }

    pub fn add_directory(&mut self, dir: &Path) {
        self.add_source(TreeSource::Directory(dir.to_path_buf()));
    }

    pub fn sources(&self) -> &[TreeSource] {
        &self.sources
    }

    /// Parse and validate one definition.
    pub fn load_tree_from_json(json: &str) -> Result<PassiveTree, TreeError> {
        let definition: TreeDefinition = serde_json::from_str(json)?;
        PassiveTree::from_definition(definition)
    }

    pub fn load_tree_from_file(path: &Path) -> Result<PassiveTree, TreeError> {
        let content = fs::read_to_string(path)?;
        Self::load_tree_from_json(&content)
    }

    /// Clear the registry and load every source. Invalid trees are logged and
    /// skipped. Returns the number of registered trees.
    pub fn load_all(&mut self) -> usize {
        self.trees.clear();
        self.generation += 1;

        let sources = std::mem::take(&mut self.sources);
        for source in &sources {
            match source {
                TreeSource::Embedded { name, json } => {
                    self.register_result(name, Self::load_tree_from_json(json));
                }
                TreeSource::File(path) => {
                    let label = path.display().to_string();
                    self.register_result(&label, Self::load_tree_from_file(path));
                }
                TreeSource::Directory(dir) => self.load_directory(dir),
            }
        }
        self.sources = sources;

        tracing::info!(count = self.trees.len(), "loaded passive trees");
        self.trees.len()
    }

    fn load_directory(&mut self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot read tree directory");
                return;
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        for path in files {
            let label = path.display().to_string();
            self.register_result(&label, Self::load_tree_from_file(&path));
        }
    }

    fn register_result(&mut self, label: &str, result: Result<PassiveTree, TreeError>) {
        match result {
            Ok(tree) => {
                tracing::debug!(source = label, tree = tree.id(), nodes = tree.node_count(), "registered tree");
                self.register(tree);
            }
            Err(e) => tracing::error!(source = label, error = %e, "rejected passive tree"),
        }
    }

    /// Register an already validated tree, returning the one it replaced.
    pub fn register(&mut self, tree: PassiveTree) -> Option<PassiveTree> {
        self.generation += 1;
        self.trees.insert(tree.id().to_string(), tree)
    }

    /// Changes every time trees are loaded, registered or unloaded. Caches
    /// built from an older generation are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get_tree(&self, id: &str) -> Option<&PassiveTree> {
        self.trees.get(id)
    }

    pub fn all_trees(&self) -> impl Iterator<Item = &PassiveTree> {
        self.trees.values()
    }

    pub fn is_tree_loaded(&self, id: &str) -> bool {
        self.trees.contains_key(id)
    }

    pub fn loaded_tree_ids(&self) -> Vec<&str> {
        self.trees.keys().map(String::as_str).collect()
    }

    /// Drop every tree and load the sources again.
    pub fn reload_all(&mut self) -> usize {
        self.load_all()
    }

    /// Drop every registered tree. Sources are kept for a later reload.
    pub fn unload_all(&mut self) {
        self.trees.clear();
        self.generation += 1;
    }
}
