use crate::ir::Spec;

/// Keep only services whose name is in `tags`, preserving order.
/// An empty tag list keeps every service.
pub fn filter_by_tags(mut spec: Spec, tags: &[String]) -> Spec {
    if tags.is_empty() {
        return spec;
    }
    spec.services
        .retain(|service| tags.iter().any(|tag| *tag == service.name.original));
    log::debug!("{} services left after tag filter", spec.services.len());
    spec
}
