//! Main component detection.
//!
//! A compilation unit is either a plain module or defines the program's entry
//! component. The entry is the first top-level function named after the
//! configured main function; failing that, the first top-level class or
//! function named after the file stem.

use crate::ast::NodeId;
use serde::Serialize;
use std::path::Path;

/// The entry component of a compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MainComponent {
    /// No entry component
    #[default]
    Module,
    Function {
        name: String,
        #[serde(skip)]
        node: NodeId,
    },
    Class {
        name: String,
        #[serde(skip)]
        node: NodeId,
    },
}

impl MainComponent {
    pub fn name(&self) -> Option<&str> {
        match self {
            MainComponent::Module => None,
            MainComponent::Function { name, .. } | MainComponent::Class { name, .. } => Some(name),
        }
    }

    pub fn node(&self) -> Option<NodeId> {
        match self {
            MainComponent::Module => None,
            MainComponent::Function { node, .. } | MainComponent::Class { node, .. } => Some(*node),
        }
    }

    pub fn is_module(&self) -> bool {
        matches!(self, MainComponent::Module)
    }
}

/// Accumulates top-level declarations and picks the entry component.
#[derive(Debug, Clone)]
pub struct MainComponentDetector {
    main_function: String,
    file_stem: String,
    main_match: Option<MainComponent>,
    stem_match: Option<MainComponent>,
}

impl MainComponentDetector {
    pub fn new(main_function: &str, path: &str) -> Self {
        let file_stem = Path::new(path)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();
        Self {
            main_function: main_function.to_string(),
            file_stem,
            main_match: None,
            stem_match: None,
        }
    }

    /// Observe a top-level function declaration.
    pub fn function(&mut self, name: &str, node: NodeId) {
        if self.main_match.is_none() && name == self.main_function {
            self.main_match = Some(MainComponent::Function {
                name: name.to_string(),
                node,
            });
        }
        if self.stem_match.is_none() && name == self.file_stem {
            self.stem_match = Some(MainComponent::Function {
                name: name.to_string(),
                node,
            });
        }
    }

    /// Observe a top-level class declaration.
    pub fn class(&mut self, name: &str, node: NodeId) {
        if self.stem_match.is_none() && name == self.file_stem {
            self.stem_match = Some(MainComponent::Class {
                name: name.to_string(),
                node,
            });
        }
    }

    pub fn finish(self) -> MainComponent {
        self.main_match.or(self.stem_match).unwrap_or_default()
    }
}
