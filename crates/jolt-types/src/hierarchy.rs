use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{PrimitiveKind, JAVA_LANG_NUMBER, JAVA_LANG_OBJECT, JAVA_LANG_STRING};

const JAVA_IO_SERIALIZABLE: &str = "java.io.Serializable";
const JAVA_LANG_COMPARABLE: &str = "java.lang.Comparable";
const JAVA_LANG_CHAR_SEQUENCE: &str = "java.lang.CharSequence";
const JAVA_LANG_CLONEABLE: &str = "java.lang.Cloneable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub name: String,
    pub kind: ClassKind,
    pub is_final: bool,
    /// Direct supertypes. `java.lang.Object` is implied and need not be listed.
    pub supertypes: Vec<String>,
}

impl ClassInfo {
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }
}

/// Read-only view of the reference supertype relation.
pub trait TypeHierarchy: Send + Sync {
    fn lookup(&self, name: &str) -> Option<&ClassInfo>;

    fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Reflexive, transitive subtype check. Every known type is a subtype of `java.lang.Object`.
    ///
    /// Unknown names are never subtypes of anything but themselves.
    fn is_subtype(&self, sub: &str, sup: &str) -> bool;

    fn kind(&self, name: &str) -> Option<ClassKind> {
        self.lookup(name).map(|info| info.kind)
    }

    fn is_final(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|info| info.is_final)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("class `{class}` extends unknown type `{supertype}`")]
    UnknownSupertype { class: String, supertype: String },
    #[error("class `{class}` is its own supertype")]
    Cycle { class: String },
    #[error("final class `{supertype}` cannot be extended by `{class}`")]
    ExtendsFinal { class: String, supertype: String },
}

/// In-memory class table.
#[derive(Debug, Clone, Default)]
pub struct ClassHierarchy {
    classes: HashMap<String, ClassInfo>,
}

impl ClassHierarchy {
    /// An empty hierarchy containing only `java.lang.Object`.
    pub fn new() -> Self {
        let mut classes = HashMap::new();
        classes.insert(
            JAVA_LANG_OBJECT.to_string(),
            ClassInfo {
                name: JAVA_LANG_OBJECT.to_string(),
                kind: ClassKind::Class,
                is_final: false,
                supertypes: Vec::new(),
            },
        );
        Self { classes }
    }

    /// The handful of `java.lang`/`java.io` types the operator engine needs to reason about
    /// wrappers and strings.
    pub fn with_minimal_jdk() -> Self {
        let mut this = Self::new();
        let builtin: &[(&str, ClassKind, bool, &[&str])] = &[
            (JAVA_IO_SERIALIZABLE, ClassKind::Interface, false, &[]),
            (JAVA_LANG_COMPARABLE, ClassKind::Interface, false, &[]),
            (JAVA_LANG_CHAR_SEQUENCE, ClassKind::Interface, false, &[]),
            (JAVA_LANG_CLONEABLE, ClassKind::Interface, false, &[]),
            (
                JAVA_LANG_NUMBER,
                ClassKind::Class,
                false,
                &[JAVA_IO_SERIALIZABLE],
            ),
            (
                JAVA_LANG_STRING,
                ClassKind::Class,
                true,
                &[
                    JAVA_IO_SERIALIZABLE,
                    JAVA_LANG_COMPARABLE,
                    JAVA_LANG_CHAR_SEQUENCE,
                ],
            ),
        ];
        for (name, kind, is_final, supers) in builtin {
            this.insert_unchecked(name, *kind, *is_final, supers);
        }

        for kind in PrimitiveKind::ALL {
            let supers: &[&str] = if kind.is_numeric() {
                &[JAVA_LANG_NUMBER, JAVA_LANG_COMPARABLE]
            } else {
                &[JAVA_IO_SERIALIZABLE, JAVA_LANG_COMPARABLE]
            };
            this.insert_unchecked(kind.wrapper_class(), ClassKind::Class, true, supers);
        }
        this
    }

    fn insert_unchecked(&mut self, name: &str, kind: ClassKind, is_final: bool, supers: &[&str]) {
        self.classes.insert(
            name.to_string(),
            ClassInfo {
                name: name.to_string(),
                kind,
                is_final,
                supertypes: supers.iter().map(|s| s.to_string()).collect(),
            },
        );
    }

    /// Add (or replace) a class declaration.
    ///
    /// Every supertype must already be declared, may not be final, and may not be the class
    /// itself or one of its subtypes. A class that others already extend cannot be redeclared
    /// final.
    pub fn declare<I, S>(
        &mut self,
        name: impl Into<String>,
        kind: ClassKind,
        is_final: bool,
        supertypes: I,
    ) -> Result<(), HierarchyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let supertypes: Vec<String> = supertypes.into_iter().map(Into::into).collect();

        for supertype in &supertypes {
            let Some(info) = self.classes.get(supertype) else {
                return Err(HierarchyError::UnknownSupertype {
                    class: name,
                    supertype: supertype.clone(),
                });
            };
            if info.is_final {
                return Err(HierarchyError::ExtendsFinal {
                    class: name,
                    supertype: supertype.clone(),
                });
            }
            if supertype == &name || self.is_subtype(supertype, &name) {
                return Err(HierarchyError::Cycle { class: name });
            }
        }

        if is_final {
            let subclass = self
                .classes
                .values()
                .find(|info| info.supertypes.iter().any(|s| s == &name));
            if let Some(subclass) = subclass {
                return Err(HierarchyError::ExtendsFinal {
                    class: subclass.name.clone(),
                    supertype: name,
                });
            }
        }

        tracing::trace!(target: "jolt.types", class = %name, ?kind, is_final, ?supertypes, "declared class");
        self.classes.insert(
            name.clone(),
            ClassInfo {
                name,
                kind,
                is_final,
                supertypes,
            },
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.values()
    }
}

impl TypeHierarchy for ClassHierarchy {
    fn lookup(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        if sub == sup {
            return true;
        }
        if !self.classes.contains_key(sub) {
            return false;
        }
        if sup == JAVA_LANG_OBJECT {
            return true;
        }

        let mut seen = HashSet::new();
        let mut stack = vec![sub];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let Some(info) = self.classes.get(current) else {
                continue;
            };
            for parent in &info.supertypes {
                if parent == sup {
                    return true;
                }
                stack.push(parent.as_str());
            }
        }
        false
    }
}
