use std::collections::HashSet;

use indexmap::IndexMap;

use super::properties::Property;
use crate::config::EnumMemberStyle;
use crate::transform::name_normalizer::{enum_member_name, float_to_enum_member, title_case};

/// Handle to a forward-reference cell inside a [`Definitions`] arena.
///
/// Every `$ref` string maps to exactly one handle, so all properties that
/// point at the same name observe the same definition once it is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefRef(usize);

#[derive(Debug, Clone)]
struct Slot {
    reference: String,
    definition: Option<Definition>,
}

/// Arena of named definitions, addressed by [`DefRef`].
///
/// Cells are created empty on first sight of a reference string and are
/// filled at most once. The arena also tracks which definitions are part
/// of the document's listing, in output order.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    slots: Vec<Slot>,
    by_reference: IndexMap<String, DefRef>,
    listed: Vec<DefRef>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cell for `reference`, creating an empty one if absent.
    pub fn cell(&mut self, reference: &str) -> DefRef {
        if let Some(id) = self.by_reference.get(reference) {
            return *id;
        }
        let id = DefRef(self.slots.len());
        self.slots.push(Slot {
            reference: reference.to_string(),
            definition: None,
        });
        self.by_reference.insert(reference.to_string(), id);
        id
    }

    /// Populate an empty cell. A cell that already holds a definition is
    /// never replaced; the rejected definition is handed back.
    pub fn fill(&mut self, id: DefRef, definition: Definition) -> Result<(), Definition> {
        let slot = &mut self.slots[id.0];
        if slot.definition.is_some() {
            return Err(definition);
        }
        slot.definition = Some(definition);
        Ok(())
    }

    /// Add a filled cell to the listing.
    pub fn list(&mut self, id: DefRef) {
        if !self.listed.contains(&id) {
            self.listed.push(id);
        }
    }

    pub fn lookup(&self, reference: &str) -> Option<DefRef> {
        self.by_reference.get(reference).copied()
    }

    pub fn get(&self, id: DefRef) -> Option<&Definition> {
        self.slots.get(id.0).and_then(|s| s.definition.as_ref())
    }

    pub fn get_mut(&mut self, id: DefRef) -> Option<&mut Definition> {
        self.slots.get_mut(id.0).and_then(|s| s.definition.as_mut())
    }

    /// The `$ref` string a cell was created for.
    pub fn reference(&self, id: DefRef) -> &str {
        &self.slots[id.0].reference
    }

    /// Follow `Reference` definitions until a concrete one is reached.
    /// Returns `None` for empty cells and for reference chains that loop.
    pub fn resolve_id(&self, id: DefRef) -> Option<DefRef> {
        let mut seen = HashSet::new();
        let mut current = id;
        loop {
            if !seen.insert(current) {
                return None;
            }
            match self.get(current)? {
                Definition::Reference(r) => current = r.target,
                _ => return Some(current),
            }
        }
    }

    pub fn resolve(&self, id: DefRef) -> Option<&Definition> {
        self.resolve_id(id).and_then(|id| self.get(id))
    }

    pub fn object(&self, id: DefRef) -> Option<&Object> {
        match self.get(id)? {
            Definition::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn object_mut(&mut self, id: DefRef) -> Option<&mut Object> {
        match self.get_mut(id)? {
            Definition::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Find a listed definition by its declared name.
    pub fn find(&self, name: &str) -> Option<DefRef> {
        self.listed
            .iter()
            .copied()
            .find(|id| self.get(*id).is_some_and(|d| d.name() == name))
    }

    /// Listed definitions in order.
    pub fn iter(&self) -> impl Iterator<Item = (DefRef, &Definition)> + '_ {
        self.listed
            .iter()
            .filter_map(|id| self.get(*id).map(|d| (*id, d)))
    }

    pub fn ids(&self) -> &[DefRef] {
        &self.listed
    }

    pub fn len(&self) -> usize {
        self.listed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listed.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|(_, d)| d.name()).collect()
    }

    /// Cells that were referenced but never filled.
    pub fn unfilled(&self) -> impl Iterator<Item = (DefRef, &str)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.definition.is_none())
            .map(|(i, s)| (DefRef(i), s.reference.as_str()))
    }

    pub fn sort_by_name(&mut self) {
        let slots = &self.slots;
        self.listed.sort_by(|a, b| {
            let name = |id: &DefRef| slots[id.0].definition.as_ref().map(|d| d.name());
            name(a).cmp(&name(b))
        });
    }

    /// Drop definitions from the listing, keeping relative order. The
    /// cells stay in the arena so handles held elsewhere remain valid.
    pub fn retain(&mut self, mut keep: impl FnMut(&Definition) -> bool) {
        let slots = &self.slots;
        self.listed
            .retain(|id| slots[id.0].definition.as_ref().is_some_and(&mut keep));
    }
}

/// A named schema.
#[derive(Debug, Clone)]
pub enum Definition {
    Object(Object),
    StringEnum(StringEnum),
    NumberEnum(NumberEnum),
    Reference(Reference),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Object(o) => &o.name,
            Definition::StringEnum(e) => &e.name,
            Definition::NumberEnum(e) => &e.name,
            Definition::Reference(r) => &r.name,
        }
    }

    /// Identifier of the definition as a target-language type.
    pub fn type_name(&self) -> String {
        title_case(self.name())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Definition::Object(_) => "object",
            Definition::StringEnum(_) => "string_enum",
            Definition::NumberEnum(_) => "number_enum",
            Definition::Reference(_) => "reference",
        }
    }
}

/// How an object relates to the object named in its `allOf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// Properties of the base are prepended to this object's own.
    Composes(DefRef),
    /// Type-level inheritance from a discriminated parent.
    Inherits(DefRef),
}

impl Parent {
    pub fn target(self) -> DefRef {
        match self {
            Parent::Composes(id) | Parent::Inherits(id) => id,
        }
    }
}

/// An ordered set of properties, optionally composed from or inheriting
/// another object.
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    properties: Vec<Property>,
    discriminator: Option<String>,
    parent: Option<Parent>,
    children: Vec<DefRef>,
}

impl Object {
    pub fn new(name: impl Into<String>, mut properties: Vec<Property>) -> Self {
        properties.sort_by(|a, b| a.name().cmp(b.name()));
        Self {
            name: name.into(),
            properties,
            discriminator: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_discriminator(mut self, discriminator: Option<String>) -> Self {
        self.discriminator = discriminator.filter(|d| !d.is_empty());
        self
    }

    /// Properties declared on this object itself.
    pub fn own_properties(&self) -> &[Property] {
        &self.properties
    }

    /// Effective properties: the composed base's effective properties,
    /// followed by this object's own. Bases are looked up on demand.
    pub fn properties<'a>(&'a self, definitions: &'a Definitions) -> Vec<&'a Property> {
        let mut chain = vec![self];
        let mut seen = HashSet::new();
        let mut current = self;
        while let Some(base_id) = current.composes() {
            if !seen.insert(base_id) {
                break;
            }
            match definitions.object(base_id) {
                Some(base) if std::ptr::eq(base, self) => break,
                Some(base) => {
                    chain.push(base);
                    current = base;
                }
                None => break,
            }
        }
        chain
            .iter()
            .rev()
            .flat_map(|o| o.properties.iter())
            .collect()
    }

    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    pub fn has_discriminator(&self) -> bool {
        self.discriminator.is_some()
    }

    pub fn parent(&self) -> Option<Parent> {
        self.parent
    }

    pub fn composes(&self) -> Option<DefRef> {
        match self.parent {
            Some(Parent::Composes(id)) => Some(id),
            _ => None,
        }
    }

    pub fn inherits(&self) -> Option<DefRef> {
        match self.parent {
            Some(Parent::Inherits(id)) => Some(id),
            _ => None,
        }
    }

    pub fn set_composition(&mut self, base: DefRef) {
        self.parent = Some(Parent::Composes(base));
    }

    pub fn set_inherits(&mut self, parent: DefRef) {
        self.parent = Some(Parent::Inherits(parent));
    }

    /// Register a polymorphic child. Repeated registration appends again.
    pub fn add_child(&mut self, child: DefRef) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[DefRef] {
        &self.children
    }

    /// Resolve registered children to objects.
    ///
    /// # Panics
    ///
    /// Panics if a registered child is not an object in `definitions`.
    pub fn child_objects<'a>(&self, definitions: &'a Definitions) -> Vec<&'a Object> {
        self.children
            .iter()
            .map(|id| match definitions.object(*id) {
                Some(child) => child,
                None => panic!(
                    "{} was elected as parent class and provided a missing or non-object child `{}`",
                    title_case(&self.name),
                    definitions.reference(*id)
                ),
            })
            .collect()
    }
}

/// An enum of distinct string literals.
#[derive(Debug, Clone, PartialEq)]
pub struct StringEnum {
    pub name: String,
    pub values: Vec<String>,
}

impl StringEnum {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        let mut distinct: Vec<String> = Vec::with_capacity(values.len());
        for value in values {
            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }
        Self {
            name: name.into(),
            values: distinct,
        }
    }

    /// Member identifiers, one per literal. Collisions between literals
    /// that normalize to the same identifier are not detected.
    pub fn member_names(&self, style: EnumMemberStyle) -> Vec<String> {
        self.values
            .iter()
            .map(|v| enum_member_name(v, style))
            .collect()
    }
}

/// An enum of distinct floating-point literals.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberEnum {
    pub name: String,
    pub values: Vec<f64>,
}

impl NumberEnum {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        let mut distinct: Vec<f64> = Vec::with_capacity(values.len());
        for value in values {
            if !distinct.iter().any(|d| d.to_bits() == value.to_bits()) {
                distinct.push(value);
            }
        }
        Self {
            name: name.into(),
            values: distinct,
        }
    }

    pub fn member_names(&self) -> Vec<String> {
        self.values.iter().map(|v| float_to_enum_member(*v)).collect()
    }
}

/// A named alias for another definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub name: String,
    pub target: DefRef,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::properties::{Primitive, PrimitiveKind};

    fn string_prop(name: &str) -> Property {
        Property::Primitive(Primitive::new(name, PrimitiveKind::String, None))
    }

    #[test]
    fn test_cell_is_shared_by_reference_string() {
        let mut defs = Definitions::new();
        let a = defs.cell("#/definitions/A");
        let b = defs.cell("#/definitions/A");
        assert_eq!(a, b);
        assert!(defs.get(a).is_none());

        defs.fill(a, Definition::Object(Object::new("A", vec![])))
            .unwrap();
        assert_eq!(defs.get(b).unwrap().name(), "A");
    }

    #[test]
    fn test_fill_never_replaces() {
        let mut defs = Definitions::new();
        let id = defs.cell("#/definitions/A");
        defs.fill(id, Definition::Object(Object::new("A", vec![])))
            .unwrap();
        let rejected = defs
            .fill(id, Definition::StringEnum(StringEnum::new("A", vec![])))
            .unwrap_err();
        assert_eq!(rejected.kind(), "string_enum");
        assert_eq!(defs.get(id).unwrap().kind(), "object");
    }

    #[test]
    fn test_resolve_follows_reference_chain() {
        let mut defs = Definitions::new();
        let a = defs.cell("#/definitions/A");
        let b = defs.cell("#/definitions/B");
        defs.fill(a, Definition::Reference(Reference { name: "A".into(), target: b }))
            .unwrap();
        assert!(defs.resolve(a).is_none());
        defs.fill(b, Definition::Object(Object::new("B", vec![])))
            .unwrap();
        assert_eq!(defs.resolve(a).unwrap().name(), "B");
    }

    #[test]
    fn test_resolve_rejects_reference_loop() {
        let mut defs = Definitions::new();
        let a = defs.cell("#/definitions/A");
        let b = defs.cell("#/definitions/B");
        defs.fill(a, Definition::Reference(Reference { name: "A".into(), target: b }))
            .unwrap();
        defs.fill(b, Definition::Reference(Reference { name: "B".into(), target: a }))
            .unwrap();
        assert!(defs.resolve_id(a).is_none());
    }

    #[test]
    fn test_object_sorts_properties() {
        let obj = Object::new("o", vec![string_prop("b"), string_prop("a")]);
        let names: Vec<_> = obj.own_properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_composition_sees_later_base_changes() {
        let mut defs = Definitions::new();
        let base = defs.cell("#/definitions/Base");
        let child = defs.cell("#/definitions/Child");
        defs.fill(base, Definition::Object(Object::new("Base", vec![string_prop("p1")])))
            .unwrap();
        let mut child_obj = Object::new("Child", vec![string_prop("p3")]);
        child_obj.set_composition(base);
        defs.fill(child, Definition::Object(child_obj)).unwrap();

        // Replace the base's contents after the link was made.
        *defs.object_mut(base).unwrap() =
            Object::new("Base", vec![string_prop("p1"), string_prop("p2")]);

        let child_obj = defs.object(child).unwrap();
        let names: Vec<_> = child_obj.properties(&defs).iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_composition_cycle_terminates() {
        let mut defs = Definitions::new();
        let a = defs.cell("#/definitions/A");
        let b = defs.cell("#/definitions/B");
        let mut a_obj = Object::new("A", vec![string_prop("a")]);
        a_obj.set_composition(b);
        let mut b_obj = Object::new("B", vec![string_prop("b")]);
        b_obj.set_composition(a);
        defs.fill(a, Definition::Object(a_obj)).unwrap();
        defs.fill(b, Definition::Object(b_obj)).unwrap();

        let names: Vec<_> = defs
            .object(a)
            .unwrap()
            .properties(&defs)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    #[should_panic(expected = "elected as parent class")]
    fn test_missing_child_panics() {
        let mut defs = Definitions::new();
        let parent = defs.cell("#/definitions/Parent");
        let ghost = defs.cell("#/definitions/Ghost");
        let mut obj = Object::new("Parent", vec![]).with_discriminator(Some("kind".into()));
        obj.add_child(ghost);
        defs.fill(parent, Definition::Object(obj)).unwrap();
        defs.object(parent).unwrap().child_objects(&defs);
    }

    #[test]
    fn test_enums_drop_duplicates() {
        let e = StringEnum::new("e", vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(e.values, vec!["a", "b"]);

        let n = NumberEnum::new("n", vec![1.0, 0.0, -0.0, 1.0]);
        assert_eq!(n.values.len(), 3);
        assert_eq!(n.member_names(), vec!["NUMBER_1", "NUMBER_0", "NUMBER_0"]);
    }

    #[test]
    fn test_retain_keeps_cells_alive() {
        let mut defs = Definitions::new();
        for name in ["B", "A", "C"] {
            let id = defs.cell(&format!("#/definitions/{name}"));
            defs.fill(id, Definition::Object(Object::new(name, vec![])))
                .unwrap();
            defs.list(id);
        }
        defs.sort_by_name();
        assert_eq!(defs.names(), vec!["A", "B", "C"]);

        defs.retain(|d| d.name() != "B");
        assert_eq!(defs.names(), vec!["A", "C"]);
        let b = defs.lookup("#/definitions/B").unwrap();
        assert_eq!(defs.get(b).unwrap().name(), "B");
        assert!(defs.find("B").is_none());
    }
}
