use crate::error::ResolveError;
use crate::ir::{DefRef, Definition, Definitions, Parent};

use super::schema_parser::CompositionRequest;

/// Link every `allOf` dependent to its base.
///
/// Bases are looked up by name among the listed definitions. A base with
/// a discriminator becomes the dependent's inheritance parent and records
/// the dependent as a child; any other base is composed, so its effective
/// properties are prepended to the dependent's.
///
/// # Panics
///
/// Panics if a request's dependent is not an object in `definitions`.
/// Requests are produced by the schema parser for objects it registered,
/// so this indicates a broken parser, not bad input.
pub fn resolve_compositions(
    definitions: &mut Definitions,
    requests: &[CompositionRequest],
) -> Result<(), ResolveError> {
    for request in requests {
        let dependent = match definitions.get(request.dependent) {
            Some(Definition::Object(obj)) => obj.name.clone(),
            _ => panic!(
                "composition requested for `{}`, which is not a parsed object",
                definitions.reference(request.dependent)
            ),
        };

        let base_id = definitions.find(&request.target).ok_or_else(|| {
            ResolveError::CompositionTargetMissing {
                dependent: dependent.clone(),
                target: request.target.clone(),
            }
        })?;

        let polymorphic = match definitions.get(base_id) {
            Some(Definition::Object(base)) => base.has_discriminator(),
            _ => {
                return Err(ResolveError::CompositionTargetNotObject {
                    dependent,
                    target: request.target.clone(),
                });
            }
        };

        if leads_to(definitions, base_id, request.dependent) {
            return Err(ResolveError::CompositionCycle {
                dependent,
                target: request.target.clone(),
            });
        }

        if polymorphic {
            if let Some(child) = definitions.object_mut(request.dependent) {
                child.set_inherits(base_id);
            }
            if let Some(base) = definitions.object_mut(base_id) {
                base.add_child(request.dependent);
            }
            log::trace!("{dependent} inherits {}", request.target);
        } else {
            if let Some(child) = definitions.object_mut(request.dependent) {
                child.set_composition(base_id);
            }
            log::trace!("{dependent} composes {}", request.target);
        }
    }

    log::debug!("resolved {} compositions", requests.len());
    Ok(())
}

/// Whether following `allOf` parents upward from `start` reaches `goal`.
/// Links are only added when this is false, so existing chains are acyclic.
fn leads_to(definitions: &Definitions, start: DefRef, goal: DefRef) -> bool {
    let mut current = Some(start);
    while let Some(id) = current {
        if id == goal {
            return true;
        }
        current = definitions.object(id).and_then(|o| o.parent()).map(Parent::target);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Object, Primitive, PrimitiveKind, Property, StringEnum};

    fn prop(name: &str) -> Property {
        Property::Primitive(Primitive::new(name, PrimitiveKind::String, None))
    }

    fn add(defs: &mut Definitions, definition: Definition) -> crate::ir::DefRef {
        let id = defs.cell(&format!("#/definitions/{}", definition.name()));
        defs.fill(id, definition).unwrap();
        defs.list(id);
        id
    }

    #[test]
    fn test_composition_prepends_base_properties() {
        let mut defs = Definitions::new();
        add(
            &mut defs,
            Definition::Object(Object::new("Base", vec![prop("p1"), prop("p2")])),
        );
        let child = add(
            &mut defs,
            Definition::Object(Object::new("Child", vec![prop("p3"), prop("p4"), prop("p1")])),
        );

        resolve_compositions(
            &mut defs,
            &[CompositionRequest {
                dependent: child,
                target: "Base".into(),
            }],
        )
        .unwrap();

        let obj = defs.object(child).unwrap();
        let names: Vec<_> = obj.properties(&defs).iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["p1", "p2", "p1", "p3", "p4"]);
        assert!(obj.inherits().is_none());
    }

    #[test]
    fn test_discriminated_base_links_child() {
        let mut defs = Definitions::new();
        let parent = add(
            &mut defs,
            Definition::Object(
                Object::new("Pet", vec![prop("petType")]).with_discriminator(Some("petType".into())),
            ),
        );
        let child = add(
            &mut defs,
            Definition::Object(Object::new("Cat", vec![prop("lives")])),
        );

        resolve_compositions(
            &mut defs,
            &[CompositionRequest {
                dependent: child,
                target: "Pet".into(),
            }],
        )
        .unwrap();

        assert_eq!(defs.object(parent).unwrap().children(), &[child]);
        let cat = defs.object(child).unwrap();
        assert_eq!(cat.inherits(), Some(parent));
        let names: Vec<_> = cat.properties(&defs).iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["lives"]);
    }

    #[test]
    fn test_repeated_child_registration_appends() {
        let mut defs = Definitions::new();
        let parent = add(
            &mut defs,
            Definition::Object(Object::new("Pet", vec![]).with_discriminator(Some("kind".into()))),
        );
        let child = add(&mut defs, Definition::Object(Object::new("Dog", vec![])));
        let request = CompositionRequest {
            dependent: child,
            target: "Pet".into(),
        };

        resolve_compositions(&mut defs, &[request.clone(), request]).unwrap();
        assert_eq!(defs.object(parent).unwrap().children(), &[child, child]);
    }

    #[test]
    fn test_missing_target() {
        let mut defs = Definitions::new();
        let child = add(&mut defs, Definition::Object(Object::new("Child", vec![])));
        let err = resolve_compositions(
            &mut defs,
            &[CompositionRequest {
                dependent: child,
                target: "Ghost".into(),
            }],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "definition `Ghost` that `Child` referenced in 'allOf' was not found in the document"
        );
    }

    #[test]
    fn test_target_not_object() {
        let mut defs = Definitions::new();
        add(
            &mut defs,
            Definition::StringEnum(StringEnum::new("Color", vec!["red".into()])),
        );
        let child = add(&mut defs, Definition::Object(Object::new("Child", vec![])));
        let err = resolve_compositions(
            &mut defs,
            &[CompositionRequest {
                dependent: child,
                target: "Color".into(),
            }],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::CompositionTargetNotObject { ref dependent, ref target }
                if dependent == "Child" && target == "Color"
        ));
    }

    #[test]
    fn test_cyclic_all_of_is_rejected() {
        let mut defs = Definitions::new();
        let a = add(&mut defs, Definition::Object(Object::new("A", vec![prop("a")])));
        let b = add(&mut defs, Definition::Object(Object::new("B", vec![prop("b")])));
        let err = resolve_compositions(
            &mut defs,
            &[
                CompositionRequest {
                    dependent: a,
                    target: "B".into(),
                },
                CompositionRequest {
                    dependent: b,
                    target: "A".into(),
                },
            ],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'allOf' of `B` leads back to itself through `A`"
        );
    }

    #[test]
    fn test_self_all_of_is_rejected() {
        let mut defs = Definitions::new();
        let a = add(&mut defs, Definition::Object(Object::new("A", vec![])));
        let err = resolve_compositions(
            &mut defs,
            &[CompositionRequest {
                dependent: a,
                target: "A".into(),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::CompositionCycle { .. }));
    }

    #[test]
    #[should_panic(expected = "not a parsed object")]
    fn test_non_object_dependent_panics() {
        let mut defs = Definitions::new();
        let color = add(
            &mut defs,
            Definition::StringEnum(StringEnum::new("Color", vec!["red".into()])),
        );
        let _ = resolve_compositions(
            &mut defs,
            &[CompositionRequest {
                dependent: color,
                target: "Color".into(),
            }],
        );
    }
}
