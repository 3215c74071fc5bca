use crate::ast::AccessLevel;
use crate::index::MemoryIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One module's documentation index as stored on disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexFile {
    pub types: BTreeMap<String, String>,
    pub enums: BTreeMap<String, String>,
    pub functions: Vec<FunctionRecord>,
    pub properties: BTreeMap<String, String>,
    pub variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    #[serde(default)]
    pub access: AccessLevel,
    #[serde(default)]
    pub parameter_types: Vec<String>,
    pub text: String,
}

impl IndexFile {
    pub(crate) fn merge_into(self, index: &mut MemoryIndex) {
        for (name, text) in self.types {
            index.add_type(name, text);
        }
        for (name, text) in self.enums {
            index.add_enum(name, text);
        }
        for function in self.functions {
            index.add_function(function.name, &function.parameter_types, function.access, function.text);
        }
        for (name, text) in self.properties {
            index.add_property(name, text);
        }
        for (name, text) in self.variables {
            index.add_variable(name, text);
        }
    }
}
