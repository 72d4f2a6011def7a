//! Index-based reconciliation of regenerated cluster children.

use sprout_core::Event;

use crate::{
    records::ClusterChild,
    registry::{Registry, RegistryKey},
};

/// Replaces the children listed in `existing` with freshly generated `bodies`.
///
/// Position `i` overwrites the `i`-th existing child in place, so its id
/// survives; surplus children are removed and a shortfall is filled with new
/// children. Returns the child list the parent should hold afterwards.
pub(crate) fn reconcile_children<C>(
    registry: &mut Registry<C::Id, C>,
    parent: C::Parent,
    existing: &[C::Id],
    bodies: Vec<C::Body>,
    out_events: &mut Vec<Event>,
) -> Vec<C::Id>
where
    C: ClusterChild,
    C::Id: RegistryKey,
{
    let generated = bodies.len();
    let mut children = Vec::with_capacity(generated);

    for (index, body) in bodies.into_iter().enumerate() {
        let reused = existing
            .get(index)
            .copied()
            .filter(|&id| registry.contains(id));

        match reused {
            Some(id) => {
                if let Some(child) = registry.get_mut(id) {
                    child.replace_body(body);
                }
                out_events.push(Event::EntityUpdated {
                    entity: C::entity(id),
                });
                children.push(id);
            }
            None => {
                let id = registry.insert_with(|id| C::create(id, parent, body));
                out_events.push(Event::EntityAdded {
                    entity: C::entity(id),
                });
                children.push(id);
            }
        }
    }

    for &surplus in existing.iter().skip(generated) {
        if registry.remove(surplus).is_some() {
            out_events.push(Event::EntityRemoved {
                entity: C::entity(surplus),
            });
        }
    }

    tracing::trace!(
        existing = existing.len(),
        generated,
        "reconciled cluster children"
    );

    children
}
