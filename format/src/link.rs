//! Cross-references between classes and schemas.
//!
//! Nothing here is needed to decode or encode a file: the links exist for introspection and
//! for resolving `PSerializable` names while decoding values. Anything that cannot be linked
//! is logged and left unlinked.

use crate::{hash, ClassDef, Schema};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Index maps from class names, CLIDs and schema uids into a [crate::Header].
#[derive(Clone, Debug, Default)]
pub struct Links {
    paired: bool,
    by_name: HashMap<String, usize>,
    by_clid: HashMap<u16, usize>,
    by_uid: HashMap<i32, usize>,
    schema_of_class: Vec<Option<usize>>,
    class_of_schema: Vec<Option<usize>>,
}

impl Links {
    /// Builds the links. Rebuilding from the same tables yields the same links.
    pub fn build(classes: &[ClassDef], schemas: &[Schema]) -> Self {
        let paired = classes.len() == schemas.len();
        if !paired {
            warn!(
                classes = classes.len(),
                schemas = schemas.len(),
                "class and schema counts differ, pairing by clid"
            );
        }

        let mut by_name = HashMap::with_capacity(classes.len());
        let mut by_clid = HashMap::with_capacity(classes.len());
        for (i, class) in classes.iter().enumerate() {
            if by_name.insert(class.name.clone(), i).is_some() {
                warn!(class = %class.name, "duplicate class name");
            }
            if by_clid.insert(class.clid, i).is_some() {
                warn!(clid = class.clid, "duplicate clid");
            }
            let expected = hash::class_id(&class.name);
            if expected != class.clid {
                debug!(class = %class.name, clid = class.clid, expected, "clid does not match name hash");
            }
        }

        let mut by_uid = HashMap::with_capacity(schemas.len());
        for (i, schema) in schemas.iter().enumerate() {
            if by_uid.insert(schema.uid, i).is_some() {
                warn!(uid = schema.uid, "duplicate schema uid");
            }
        }

        let mut schema_of_class = vec![None; classes.len()];
        let mut class_of_schema = vec![None; schemas.len()];
        if paired {
            for i in 0..classes.len() {
                schema_of_class[i] = Some(i);
                class_of_schema[i] = Some(i);
            }
        } else {
            for (i, schema) in schemas.iter().enumerate() {
                let class = u16::try_from(schema.clid)
                    .ok()
                    .and_then(|clid| by_clid.get(&clid).copied());
                match class {
                    Some(c) => {
                        class_of_schema[i] = Some(c);
                        schema_of_class[c].get_or_insert(i);
                    }
                    None => warn!(uid = schema.uid, clid = schema.clid, "schema has no class"),
                }
            }
        }

        Self {
            paired,
            by_name,
            by_clid,
            by_uid,
            schema_of_class,
            class_of_schema,
        }
    }

    /// Whether classes and schemas were paired by position.
    pub fn is_paired(&self) -> bool {
        self.paired
    }

    pub fn class_by_name(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn class_by_clid(&self, clid: u16) -> Option<usize> {
        self.by_clid.get(&clid).copied()
    }

    pub fn schema_by_uid(&self, uid: i32) -> Option<usize> {
        self.by_uid.get(&uid).copied()
    }

    /// Returns the schema of the class at `class`.
    pub fn schema_for_class(&self, class: usize) -> Option<usize> {
        self.schema_of_class.get(class).copied().flatten()
    }

    /// Returns the class described by the schema at `schema`.
    pub fn class_for_schema(&self, schema: usize) -> Option<usize> {
        self.class_of_schema.get(schema).copied().flatten()
    }

    /// Resolves a class name (as found in a `PSerializable` type) to its schema.
    pub fn schema_for_name(&self, name: &str) -> Option<usize> {
        self.class_by_name(name)
            .and_then(|class| self.schema_for_class(class))
    }
}
