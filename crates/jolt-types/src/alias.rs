use std::collections::BTreeMap;

use crate::{
    PrimitiveKind, Result, TypeDescriptor, TypeError, TypeHierarchy, JAVA_LANG_NUMBER,
    JAVA_LANG_OBJECT, JAVA_LANG_STRING,
};

/// Maps surface type names (`int`, `Integer`, `number`, `any`, ...) to JVM types.
///
/// Targets are either a primitive keyword or a binary class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAliases {
    aliases: BTreeMap<String, String>,
}

impl Default for TypeAliases {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        for kind in PrimitiveKind::ALL {
            aliases.insert(kind.name().to_string(), kind.name().to_string());
            let simple = kind
                .wrapper_class()
                .rsplit('.')
                .next()
                .unwrap_or(kind.wrapper_class());
            aliases.insert(simple.to_string(), kind.wrapper_class().to_string());
        }
        for (alias, target) in [
            ("String", JAVA_LANG_STRING),
            ("Object", JAVA_LANG_OBJECT),
            ("Number", JAVA_LANG_NUMBER),
            ("number", JAVA_LANG_NUMBER),
            ("any", JAVA_LANG_OBJECT),
            ("unknown", JAVA_LANG_OBJECT),
        ] {
            aliases.insert(alias.to_string(), target.to_string());
        }
        Self { aliases }
    }
}

impl TypeAliases {
    /// No aliases at all; every lookup must use a fully qualified name.
    pub fn empty() -> Self {
        Self {
            aliases: BTreeMap::new(),
        }
    }

    /// Register `alias` for `target`, replacing any previous mapping.
    pub fn insert(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.aliases.insert(alias.into(), target.into());
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Resolve a surface type name without consulting a hierarchy.
    ///
    /// Names that are not aliased are accepted only when fully qualified (contain a `.`).
    pub fn resolve(&self, name: &str) -> Result<TypeDescriptor> {
        let target = match self.get(name) {
            Some(target) => target,
            None if name.contains('.') => name,
            None => return Err(TypeError::UnresolvedReference(name.to_string())),
        };
        Ok(match PrimitiveKind::from_name(target) {
            Some(kind) => TypeDescriptor::Primitive(kind),
            None => TypeDescriptor::reference(target),
        })
    }

    /// Like [`TypeAliases::resolve`], additionally requiring reference types to be known to
    /// `hierarchy`.
    pub fn resolve_in(&self, name: &str, hierarchy: &dyn TypeHierarchy) -> Result<TypeDescriptor> {
        let ty = self.resolve(name)?;
        if let Some(class) = ty.class_name() {
            if !hierarchy.contains(&class) {
                return Err(TypeError::UnresolvedReference(class.into_owned()));
            }
        }
        Ok(ty)
    }
}
