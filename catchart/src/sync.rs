// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-instance synchronization.
//!
//! A [`SyncBus`] is a cheap, cloneable handle to one shared registry. Chart instances
//! that should mirror each other are created against the same bus and subscribe under
//! the same [`SyncId`]. Delivery is synchronous: [`SyncBus::publish`] runs every
//! subscriber callback before it returns.

extern crate alloc;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use hashbrown::HashMap;
use kurbo::Point;
use smallvec::SmallVec;

use crate::brush::BrushWindow;

/// Key shared by instances that mirror each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SyncId(pub u64);

/// Opaque identity of one chart instance, unique per bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

/// Pointer (tooltip) state mirrored between instances.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    /// Whether the pointer is over the plot.
    pub active: bool,
    /// Window-relative row under the pointer.
    pub index: Option<usize>,
    /// Pointer position in canvas pixels.
    pub position: Point,
}

/// State carried by a synchronization event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SyncPayload {
    /// New data window, if the window changed.
    pub window: Option<BrushWindow>,
    /// New pointer state, if the pointer moved.
    pub pointer: Option<PointerState>,
}

/// A published synchronization event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyncEvent {
    /// Channel the event was published on.
    pub sync_id: SyncId,
    /// Instance that published the event; it never receives it back.
    pub origin: InstanceId,
    /// Carried state.
    pub payload: SyncPayload,
}

type Callback = Rc<dyn Fn(&SyncEvent)>;

const DEFAULT_CAPACITY: usize = 10;

struct Registry {
    next_instance: u64,
    capacity: usize,
    channels: HashMap<SyncId, SmallVec<[(InstanceId, Callback); 4]>>,
}

/// Publish/subscribe channel keyed by [`SyncId`].
#[derive(Clone)]
pub struct SyncBus {
    registry: Rc<RefCell<Registry>>,
}

impl Default for SyncBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SyncBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("SyncBus")
            .field("channels", &registry.channels.len())
            .field("listener_capacity", &registry.capacity)
            .finish_non_exhaustive()
    }
}

impl SyncBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_instance: 0,
                capacity: DEFAULT_CAPACITY,
                channels: HashMap::new(),
            })),
        }
    }

    /// Allocates a fresh instance identity.
    pub fn next_instance_id(&self) -> InstanceId {
        let mut registry = self.registry.borrow_mut();
        let id = InstanceId(registry.next_instance);
        registry.next_instance += 1;
        id
    }

    /// Registers `callback` for events on `sync_id`.
    ///
    /// An instance has at most one subscription per channel; subscribing again replaces
    /// the callback. Each new subscription raises the listener capacity by one.
    pub fn subscribe(
        &self,
        sync_id: SyncId,
        instance: InstanceId,
        callback: impl Fn(&SyncEvent) + 'static,
    ) {
        let mut registry = self.registry.borrow_mut();
        let listeners = registry.channels.entry(sync_id).or_default();
        let callback: Callback = Rc::new(callback);
        if let Some(slot) = listeners.iter_mut().find(|(id, _)| *id == instance) {
            slot.1 = callback;
            return;
        }
        listeners.push((instance, callback));
        registry.capacity += 1;
        log::debug!(
            "instance {} subscribed to sync {}; listener capacity {}",
            instance.0,
            sync_id.0,
            registry.capacity
        );
    }

    /// Removes the subscription of `instance` on `sync_id`, if any.
    pub fn unsubscribe(&self, sync_id: SyncId, instance: InstanceId) {
        let mut registry = self.registry.borrow_mut();
        let Some(listeners) = registry.channels.get_mut(&sync_id) else {
            return;
        };
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != instance);
        let removed = before != listeners.len();
        if listeners.is_empty() {
            registry.channels.remove(&sync_id);
        }
        if removed {
            registry.capacity = registry.capacity.saturating_sub(1).max(DEFAULT_CAPACITY);
            log::debug!("instance {} unsubscribed from sync {}", instance.0, sync_id.0);
        }
    }

    /// Delivers `event` to every subscriber of its channel except its origin.
    ///
    /// Returns the number of callbacks invoked. Callbacks may publish or (un)subscribe.
    pub fn publish(&self, event: &SyncEvent) -> usize {
        let targets: Vec<Callback> = {
            let registry = self.registry.borrow();
            registry
                .channels
                .get(&event.sync_id)
                .map(|listeners| {
                    listeners
                        .iter()
                        .filter(|(id, _)| *id != event.origin)
                        .map(|(_, cb)| Rc::clone(cb))
                        .collect()
                })
                .unwrap_or_default()
        };
        log::trace!(
            "sync {}: delivering {:?} to {} listener(s)",
            event.sync_id.0,
            event.payload,
            targets.len()
        );
        for callback in &targets {
            callback(event);
        }
        targets.len()
    }

    /// Number of subscribers on `sync_id`.
    pub fn subscriber_count(&self, sync_id: SyncId) -> usize {
        self.registry
            .borrow()
            .channels
            .get(&sync_id)
            .map_or(0, SmallVec::len)
    }

    /// Current listener ceiling.
    pub fn listener_capacity(&self) -> usize {
        self.registry.borrow().capacity
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::cell::Cell;

    use super::*;

    fn event(sync_id: SyncId, origin: InstanceId) -> SyncEvent {
        SyncEvent {
            sync_id,
            origin,
            payload: SyncPayload::default(),
        }
    }

    #[test]
    fn origin_never_receives_its_event() {
        let bus = SyncBus::new();
        let a = bus.next_instance_id();
        let b = bus.next_instance_id();
        let hits_a = Rc::new(Cell::new(0));
        let hits_b = Rc::new(Cell::new(0));
        let (ha, hb) = (hits_a.clone(), hits_b.clone());
        bus.subscribe(SyncId(1), a, move |_| ha.set(ha.get() + 1));
        bus.subscribe(SyncId(1), b, move |_| hb.set(hb.get() + 1));

        assert_eq!(bus.publish(&event(SyncId(1), a)), 1);
        assert_eq!((hits_a.get(), hits_b.get()), (0, 1));
        assert_eq!(bus.publish(&event(SyncId(2), a)), 0);
    }

    #[test]
    fn capacity_tracks_subscriptions() {
        let bus = SyncBus::new();
        let ids: Vec<InstanceId> = (0..12).map(|_| bus.next_instance_id()).collect();
        for id in &ids {
            bus.subscribe(SyncId(7), *id, |_| {});
        }
        assert_eq!(bus.subscriber_count(SyncId(7)), 12);
        assert_eq!(bus.listener_capacity(), 22);
        bus.subscribe(SyncId(7), ids[0], |_| {});
        assert_eq!(bus.listener_capacity(), 22);
        for id in &ids {
            bus.unsubscribe(SyncId(7), *id);
        }
        assert_eq!(bus.subscriber_count(SyncId(7)), 0);
        assert_eq!(bus.listener_capacity(), 10);
    }

    #[test]
    fn callbacks_may_unsubscribe_during_delivery() {
        let bus = SyncBus::new();
        let a = bus.next_instance_id();
        let b = bus.next_instance_id();
        let inner = bus.clone();
        bus.subscribe(SyncId(1), b, move |_| inner.unsubscribe(SyncId(1), b));
        assert_eq!(bus.publish(&event(SyncId(1), a)), 1);
        assert_eq!(bus.subscriber_count(SyncId(1)), 0);
    }
}
