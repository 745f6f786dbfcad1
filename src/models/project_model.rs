//! models/project_model.rs
//! Huella de un proyecto Scratch (.sb3) ya extraído.

use std::collections::BTreeSet;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ProjectFingerprint {
    pub file_name: String,
    /// MD5 (hex) del archivo completo
    pub file_hash: String,
    /// Opcodes en orden, sin bloques shadow
    pub logic_signature: Vec<String>,
    /// MD5 de cada asset (todo menos project.json)
    pub asset_hashes: BTreeSet<String>,
    pub sprite_names: Vec<String>,
}

impl ProjectFingerprint {
    pub fn shared_assets(&self, other: &ProjectFingerprint) -> usize {
        self.asset_hashes.intersection(&other.asset_hashes).count()
    }

    pub fn sprite_count(&self) -> usize {
        self.sprite_names.len()
    }
}
