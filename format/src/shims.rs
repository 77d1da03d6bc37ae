//! Type shims: field layouts known from outside a file.
//!
//! Some games store fields whose types their files describe incompletely. A shim library
//! maps `"Class.field"` keys to the layout the field is known to have. Shims are only used for
//! introspection; decoding always follows the schemas embedded in the file.

use crate::{Error, ObjDef, ObjField, PropType};
use std::collections::BTreeMap;

/// Names of the built-in shim libraries.
pub const LIBRARIES: &[&str] = &["deadcells"];

/// A named set of field layouts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shims {
    name: &'static str,
    types: BTreeMap<String, PropType>,
}

impl Shims {
    pub fn name(&self) -> &str {
        self.name
    }

    /// Returns the layout of `class.field`, if the library has one.
    pub fn get(&self, class: &str, field: &str) -> Option<&PropType> {
        self.types.get(&format!("{class}.{field}"))
    }

    /// Iterates over `("Class.field", type)` entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropType)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Loads a built-in shim library by name.
pub fn library(name: &str) -> Result<Shims, Error> {
    match name {
        "deadcells" => Ok(deadcells()),
        _ => Err(Error::UnknownShimLibrary(name.to_string())),
    }
}

/// An array of inline objects with the given fields.
fn records(fields: &[(&str, PropType)]) -> PropType {
    let fields = fields
        .iter()
        .map(|(name, ty)| ObjField::new(*name, ty.clone()))
        .collect();
    PropType::Array(Box::new(PropType::Obj(ObjDef::new(fields))))
}

/// Dead Cells save files.
fn deadcells() -> Shims {
    const BOSS_RUSH: &str = "tool.bossRush.BossRushData";
    const SPEEDRUN: &str = "tool.SpeedrunData";

    let unlock = records(&[("idx", PropType::Int), ("unlock", PropType::Bool)]);
    let level_time = records(&[("id", PropType::String), ("t", PropType::Float)]);

    let mut types = BTreeMap::new();
    for field in [
        "unlockedGameMode",
        "basementUnlock",
        "capUnlock",
        "pantUnlock",
        "skirtUnlock",
        "skullUnlock",
        "topUnlock",
        "weaponUnlock",
        "materialUnlock",
    ] {
        types.insert(format!("{BOSS_RUSH}.{field}"), unlock.clone());
    }
    types.insert(
        format!("{SPEEDRUN}.bestRunTime"),
        records(&[("bc", PropType::Int), ("t", PropType::Float)]),
    );
    for field in [
        "bestAnchoredTimePerLevel",
        "bestTimePerLevel",
        "runTimePerLevel",
        "anchoredRunLevelDelta",
        "runLevelDelta",
    ] {
        types.insert(format!("{SPEEDRUN}.{field}"), level_time.clone());
    }
    types.insert(
        "UserStats.biomesTransitions".to_string(),
        records(&[("from", PropType::String), ("to", PropType::String)]),
    );

    Shims {
        name: "deadcells",
        types,
    }
}
