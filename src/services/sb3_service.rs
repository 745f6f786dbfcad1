//! services/sb3_service.rs
//! Extracción de huellas de archivos .sb3 (zip con project.json + assets).

use std::collections::BTreeSet;
use std::io::{Cursor, Read};

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{Map, Value};
use zip::ZipArchive;

use crate::models::project_model::ProjectFingerprint;

const PROJECT_JSON: &str = "project.json";

/// MD5 en hex (minúsculas)
pub fn md5_hex(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}

/// Abre el .sb3 en memoria y calcula hash, assets, opcodes y sprites.
/// Cualquier error deja el archivo fuera del análisis.
pub fn extract_project(file_name: &str, bytes: &[u8]) -> Result<ProjectFingerprint> {
    let file_hash = md5_hex(bytes);

    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).context("El archivo no es un zip válido")?;

    // 1) Assets: todo lo que no sea project.json
    let mut asset_hashes = BTreeSet::new();
    let mut project_json: Option<Vec<u8>> = None;
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .with_context(|| format!("No se pudo leer la entrada #{} del zip", index))?;
        if entry.is_dir() {
            continue;
        }

        let mut data = Vec::new();
        entry
            .read_to_end(&mut data)
            .with_context(|| format!("No se pudo descomprimir '{}'", entry.name()))?;

        if entry.name() == PROJECT_JSON {
            project_json = Some(data);
        } else {
            asset_hashes.insert(md5_hex(&data));
        }
    }

    // 2) Lógica: sin project.json el archivo sigue siendo válido, solo sin bloques
    let (logic_signature, sprite_names) = match project_json {
        Some(raw) => parse_project_logic(&raw)?,
        None => {
            log::debug!("'{}' no contiene {}", file_name, PROJECT_JSON);
            (Vec::new(), Vec::new())
        }
    };

    Ok(ProjectFingerprint {
        file_name: file_name.to_string(),
        file_hash,
        logic_signature,
        asset_hashes,
        sprite_names,
    })
}

/// Devuelve (opcodes, nombres de sprites). Los targets se ordenan por nombre
/// para que reordenar sprites no cambie la firma.
pub fn parse_project_logic(raw: &[u8]) -> Result<(Vec<String>, Vec<String>)> {
    let project: Value = serde_json::from_slice(raw).context("project.json no es JSON válido")?;
    let root = project
        .as_object()
        .ok_or_else(|| anyhow!("project.json no es un objeto"))?;

    let mut targets: Vec<&Map<String, Value>> = match root.get("targets") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|t| {
                t.as_object()
                    .ok_or_else(|| anyhow!("'targets' contiene un elemento que no es objeto"))
            })
            .collect::<Result<_>>()?,
        Some(_) => bail!("'targets' no es una lista"),
    };

    // Un nombre que no es texto no se puede ordenar junto a los demás
    if targets
        .iter()
        .any(|t| t.get("name").map_or(false, |name| !name.is_string()))
    {
        bail!("Un target tiene 'name' que no es texto");
    }

    // sort_by es estable: targets con el mismo nombre mantienen su orden
    targets.sort_by(|a, b| sort_name(a).cmp(sort_name(b)));

    let mut logic_signature = Vec::new();
    let mut sprite_names = Vec::with_capacity(targets.len());
    for target in targets {
        sprite_names.push(
            target
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
        );

        let Some(Value::Object(blocks)) = target.get("blocks") else {
            continue;
        };
        for block in blocks.values() {
            // Las variables/listas sueltas vienen como arrays: se ignoran
            let Some(block) = block.as_object() else {
                continue;
            };
            if block.get("shadow").map_or(false, is_truthy) {
                continue;
            }
            let opcode = match block.get("opcode") {
                None => "unknown",
                Some(Value::String(opcode)) => opcode.as_str(),
                Some(other) => bail!("Bloque con 'opcode' que no es texto: {}", other),
            };
            logic_signature.push(opcode.to_string());
        }
    }

    Ok((logic_signature, sprite_names))
}

fn sort_name(target: &Map<String, Value>) -> &str {
    target.get("name").and_then(Value::as_str).unwrap_or("")
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
