//! Protocol registries
//!
//! A registry maps IE keys to payload classes, message type codes to
//! message specifications, and extension header types to layouts. Each
//! protocol builds its registry once; every layout it references is
//! validated while building.

use std::collections::HashMap;

use crate::error::RegistryError;
use crate::group::GroupSpec;
use crate::ie::IeKey;
use crate::layout::Layout;

/// Payload class of an IE
#[derive(Debug, Clone, Copy)]
pub enum PayloadDef {
    Fields(&'static Layout),
    Grouped(&'static GroupSpec),
}

/// Message type definition
#[derive(Debug)]
pub struct MessageSpec {
    pub type_code: u8,
    pub body: GroupSpec,
    /// Payload overrides for IEs of this message only
    pub scope: &'static [(IeKey, PayloadDef)],
}

impl MessageSpec {
    pub const fn new(type_code: u8, body: GroupSpec) -> Self {
        Self {
            type_code,
            body,
            scope: &[],
        }
    }

    pub const fn scoped(self, scope: &'static [(IeKey, PayloadDef)]) -> Self {
        Self { scope, ..self }
    }

    pub fn name(&self) -> &'static str {
        self.body.name
    }
}

/// IE, message and extension header lookup tables of one protocol
#[derive(Debug)]
pub struct Registry {
    name: &'static str,
    ies: HashMap<IeKey, PayloadDef>,
    any_instance: HashMap<u16, PayloadDef>,
    messages: HashMap<u8, &'static MessageSpec>,
    alternates: HashMap<u8, &'static MessageSpec>,
    extensions: HashMap<u8, &'static Layout>,
}

impl Registry {
    pub fn builder(name: &'static str) -> RegistryBuilder {
        RegistryBuilder {
            registry: Registry {
                name,
                ies: HashMap::new(),
                any_instance: HashMap::new(),
                messages: HashMap::new(),
                alternates: HashMap::new(),
                extensions: HashMap::new(),
            },
            error: None,
            layouts: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Payload class for an IE key, instance-specific entries first
    pub fn resolve(&self, key: IeKey) -> Option<PayloadDef> {
        self.ies
            .get(&key)
            .or_else(|| self.any_instance.get(&key.tag))
            .copied()
    }

    pub fn message(&self, type_code: u8) -> Option<&'static MessageSpec> {
        self.messages.get(&type_code).copied()
    }

    /// Alternate specification tried when the primary one leaves
    /// mandatory IEs missing
    pub fn alternate(&self, type_code: u8) -> Option<&'static MessageSpec> {
        self.alternates.get(&type_code).copied()
    }

    pub fn extension(&self, kind: u8) -> Option<&'static Layout> {
        self.extensions.get(&kind).copied()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

/// Builder collecting registrations; the first conflict is reported by
/// [`RegistryBuilder::build`]
pub struct RegistryBuilder {
    registry: Registry,
    error: Option<RegistryError>,
    layouts: Vec<&'static Layout>,
    groups: Vec<&'static GroupSpec>,
}

impl RegistryBuilder {
    fn fail(&mut self, err: RegistryError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn track(&mut self, def: PayloadDef) {
        match def {
            PayloadDef::Fields(layout) => self.layouts.push(layout),
            PayloadDef::Grouped(group) => self.groups.push(group),
        }
    }

    /// Layout of the protocol header
    pub fn header(mut self, layout: &'static Layout) -> Self {
        self.layouts.push(layout);
        self
    }

    /// IE payload class for every instance of `tag`
    pub fn ie(mut self, tag: u16, def: PayloadDef) -> Self {
        if self.registry.any_instance.insert(tag, def).is_some() {
            let registry = self.registry.name;
            self.fail(RegistryError::DuplicateIe {
                registry,
                key: format!("{tag}/*"),
            });
        }
        self.track(def);
        self
    }

    /// IE payload class for one tag and instance
    pub fn ie_instance(mut self, key: IeKey, def: PayloadDef) -> Self {
        if self.registry.ies.insert(key, def).is_some() {
            let registry = self.registry.name;
            self.fail(RegistryError::DuplicateIe {
                registry,
                key: key.to_string(),
            });
        }
        self.track(def);
        self
    }

    pub fn message(mut self, spec: &'static MessageSpec) -> Self {
        if self.registry.messages.insert(spec.type_code, spec).is_some() {
            let registry = self.registry.name;
            self.fail(RegistryError::DuplicateMessage {
                registry,
                code: spec.type_code,
            });
        }
        self.groups.push(&spec.body);
        for (_, def) in spec.scope {
            self.track(*def);
        }
        self
    }

    pub fn alternate(mut self, spec: &'static MessageSpec) -> Self {
        if self.registry.alternates.insert(spec.type_code, spec).is_some() {
            let registry = self.registry.name;
            self.fail(RegistryError::DuplicateMessage {
                registry,
                code: spec.type_code,
            });
        }
        self.groups.push(&spec.body);
        for (_, def) in spec.scope {
            self.track(*def);
        }
        self
    }

    pub fn extension(mut self, kind: u8, layout: &'static Layout) -> Self {
        if self.registry.extensions.insert(kind, layout).is_some() {
            let registry = self.registry.name;
            self.fail(RegistryError::DuplicateExtension { registry, kind });
        }
        self.layouts.push(layout);
        self
    }

    pub fn build(self) -> Result<Registry, RegistryError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        for layout in &self.layouts {
            layout.plan()?;
        }
        for group in &self.groups {
            if let Some(key) = group.duplicate_key() {
                return Err(RegistryError::DuplicateEntry {
                    group: group.name,
                    key,
                });
            }
        }
        if let Some(alt) = self
            .registry
            .alternates
            .keys()
            .find(|code| !self.registry.messages.contains_key(*code))
        {
            log::warn!(
                "{}: alternate for type {} has no primary definition",
                self.registry.name,
                alt
            );
        }
        log::debug!(
            "{}: {} IEs, {} messages registered",
            self.registry.name,
            self.registry.ies.len() + self.registry.any_instance.len(),
            self.registry.messages.len()
        );
        Ok(self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::group::Entry;
    use crate::layout::FieldDef;

    static U8: Layout = Layout::new("u8", &[FieldDef::uint("value", 8)]);
    static ECHO: MessageSpec =
        MessageSpec::new(1, GroupSpec::keyed("Echo", &[Entry::new(3, 0, "Recovery")], &[]));

    #[test]
    fn test_resolve_prefers_instance_entry() {
        static WIDE: Layout = Layout::new("wide", &[FieldDef::uint("value", 16)]);
        let reg = Registry::builder("test")
            .ie(3, PayloadDef::Fields(&U8))
            .ie_instance(IeKey::new(3, 1), PayloadDef::Fields(&WIDE))
            .message(&ECHO)
            .build()
            .unwrap();
        assert!(matches!(reg.resolve(IeKey::new(3, 0)), Some(PayloadDef::Fields(l)) if l.name == "u8"));
        assert!(matches!(reg.resolve(IeKey::new(3, 1)), Some(PayloadDef::Fields(l)) if l.name == "wide"));
        assert!(reg.resolve(IeKey::new(4, 0)).is_none());
        assert_eq!(reg.message(1).unwrap().name(), "Echo");
        assert!(reg.message(2).is_none());
    }

    #[test]
    fn test_duplicate_ie() {
        let err = Registry::builder("test")
            .ie(3, PayloadDef::Fields(&U8))
            .ie(3, PayloadDef::Fields(&U8))
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateIe { .. }));
    }

    #[test]
    fn test_duplicate_message() {
        let err = Registry::builder("test")
            .message(&ECHO)
            .message(&ECHO)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateMessage {
                registry: "test",
                code: 1
            }
        );
    }

    #[test]
    fn test_invalid_layout_rejected() {
        static BAD: Layout = Layout::new("bad", &[FieldDef::list("items", 8)]);
        let err = Registry::builder("test")
            .ie(9, PayloadDef::Fields(&BAD))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Layout(LayoutError::MissingCount { .. })
        ));
    }
}
