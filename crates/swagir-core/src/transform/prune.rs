use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use crate::ir::{DefRef, Definition, Definitions, Property, ResponseBody, Service, Spec};

/// For every listed definition, the definitions reachable from it in zero
/// or more hops, the definition itself included.
pub fn reference_graph(definitions: &Definitions) -> IndexMap<DefRef, IndexSet<DefRef>> {
    definitions
        .ids()
        .iter()
        .map(|id| {
            let mut reached = IndexSet::new();
            visit_definition(definitions, *id, &mut reached);
            (*id, reached)
        })
        .collect()
}

/// Definitions named directly by an operation's parameters or responses.
pub fn operation_seeds(definitions: &Definitions, services: &[Service]) -> IndexSet<DefRef> {
    let mut seeds = IndexSet::new();
    for op in services.iter().flat_map(|s| s.operations.iter()) {
        for param in &op.parameters {
            property_targets(definitions, &param.schema, &mut seeds);
        }
        for response in op.responses.values() {
            match &response.body {
                ResponseBody::Definition(id) => {
                    seeds.insert(*id);
                }
                ResponseBody::Array(array) => property_targets(definitions, &array.items, &mut seeds),
                ResponseBody::File | ResponseBody::Number | ResponseBody::Empty => {}
            }
        }
    }
    seeds
}

/// Drop every definition no operation can reach. Relative order of the
/// kept definitions is preserved.
pub fn prune_unused_definitions(mut spec: Spec) -> Spec {
    let graph = reference_graph(&spec.definitions);
    let seeds = operation_seeds(&spec.definitions, &spec.services);

    let mut keep: HashSet<DefRef> = HashSet::new();
    for seed in &seeds {
        match graph.get(seed) {
            Some(reached) => keep.extend(reached.iter().copied()),
            None => {
                let mut reached = IndexSet::new();
                visit_definition(&spec.definitions, *seed, &mut reached);
                keep.extend(reached);
            }
        }
    }

    let kept_names: HashSet<String> = keep
        .iter()
        .filter_map(|id| spec.definitions.get(*id))
        .map(|d| d.name().to_string())
        .collect();

    let before = spec.definitions.len();
    spec.definitions.retain(|d| kept_names.contains(d.name()));
    log::debug!(
        "pruned {} of {} definitions",
        before - spec.definitions.len(),
        before
    );
    spec
}

fn visit_definition(definitions: &Definitions, id: DefRef, reached: &mut IndexSet<DefRef>) {
    if !reached.insert(id) {
        return;
    }
    match definitions.get(id) {
        Some(Definition::Object(obj)) => {
            for prop in obj.properties(definitions) {
                visit_property(definitions, prop, reached);
            }
            if let Some(parent) = obj.inherits() {
                visit_definition(definitions, parent, reached);
            }
            for child in obj.children() {
                visit_definition(definitions, *child, reached);
            }
        }
        Some(Definition::Reference(alias)) => visit_definition(definitions, alias.target, reached),
        Some(Definition::StringEnum(_) | Definition::NumberEnum(_)) | None => {}
    }
}

fn visit_property(definitions: &Definitions, prop: &Property, reached: &mut IndexSet<DefRef>) {
    match prop {
        Property::Reference(r) => visit_definition(definitions, r.target, reached),
        Property::Array(array) => visit_property(definitions, &array.items, reached),
        Property::Object(nested) => {
            for inner in nested.object.properties(definitions) {
                visit_property(definitions, inner, reached);
            }
        }
        Property::Primitive(_) => {}
    }
}

/// Collect the definitions a property points at without following them.
fn property_targets(definitions: &Definitions, prop: &Property, out: &mut IndexSet<DefRef>) {
    match prop {
        Property::Reference(r) => {
            out.insert(r.target);
        }
        Property::Array(array) => property_targets(definitions, &array.items, out),
        Property::Object(nested) => {
            for inner in nested.object.properties(definitions) {
                property_targets(definitions, inner, out);
            }
        }
        Property::Primitive(_) => {}
    }
}
