// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stateful chart driver.
//!
//! A [`ChartInstance`] owns the mutable state of one mounted chart: its data, the current
//! data window, pointer state, and its subscription on a [`SyncBus`]. Every state change
//! reruns [`recompute_layout`] and replaces the snapshot wholesale.

extern crate alloc;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use catchart_table::{DataTable, Value};
use kurbo::Point;
use peniko::Color;

use crate::brush::{AffectedCharts, BrushWindow, WindowError};
use crate::chart_spec::ChartSpec;
use crate::interaction::pointer_index;
use crate::snapshot::{LayoutSnapshot, recompute_layout};
use crate::sync::{InstanceId, PointerState, SyncBus, SyncEvent, SyncId, SyncPayload};

/// One series value at the active row.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipEntry {
    /// Series data key.
    pub data_key: Arc<str>,
    /// Series display name.
    pub name: String,
    /// Cell value (possibly [`Value::Missing`]).
    pub value: Value,
    /// Series color.
    pub color: Color,
}

#[derive(Debug)]
struct ChartState {
    spec: ChartSpec,
    table: DataTable,
    window: Option<BrushWindow>,
    snapshot: Option<LayoutSnapshot>,
    pointer: PointerState,
}

impl ChartState {
    fn recompute(&mut self) {
        self.snapshot = self
            .window
            .and_then(|window| recompute_layout(&self.spec, &self.table, window));
    }

    /// Returns `false` if `window` is already current.
    fn apply_window(&mut self, window: BrushWindow) -> bool {
        if self.window == Some(window) {
            return false;
        }
        log::debug!(
            "window {}..={} -> {}..={}",
            self.window.map_or(0, |w| w.start_index),
            self.window.map_or(0, |w| w.end_index),
            window.start_index,
            window.end_index
        );
        self.window = Some(window);
        self.recompute();
        true
    }

    fn tooltip_len(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.tooltip_ticks.len())
    }

    fn receive(&mut self, event: &SyncEvent) {
        if let Some(window) = event.payload.window {
            match BrushWindow::validate(
                window.start_index,
                window.end_index,
                self.table.row_count(),
            ) {
                Ok(window) => {
                    self.apply_window(window);
                }
                Err(err) => log::debug!("ignoring synced window: {err}"),
            }
        }
        if let Some(pointer) = event.payload.pointer {
            if pointer.index.is_some_and(|i| i >= self.tooltip_len()) {
                log::debug!("ignoring synced pointer outside this chart's rows");
            } else {
                self.pointer = pointer;
            }
        }
    }
}

/// A mounted chart.
pub struct ChartInstance {
    id: InstanceId,
    bus: SyncBus,
    state: Rc<RefCell<ChartState>>,
    subscribed: Option<SyncId>,
}

impl fmt::Debug for ChartInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartInstance")
            .field("id", &self.id)
            .field("subscribed", &self.subscribed)
            .field("window", &self.window())
            .finish_non_exhaustive()
    }
}

impl ChartInstance {
    /// Mounts a chart.
    ///
    /// Axis advisories are logged, the brush's declared window (or the full range) is
    /// applied, and the instance subscribes to `spec.sync_id` on `bus`.
    pub fn new(spec: ChartSpec, table: DataTable, bus: &SyncBus) -> Self {
        for advisory in spec.validate_axes() {
            log::warn!("{advisory}");
        }
        let window = initial_window(&spec, &table);
        let sync_id = spec.sync_id;
        let mut state = ChartState {
            spec,
            table,
            window,
            snapshot: None,
            pointer: PointerState::default(),
        };
        state.recompute();
        let mut instance = Self {
            id: bus.next_instance_id(),
            bus: bus.clone(),
            state: Rc::new(RefCell::new(state)),
            subscribed: None,
        };
        if let Some(sync_id) = sync_id {
            instance.subscribe(sync_id);
        }
        instance
    }

    /// This instance's identity on the bus.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The synchronization group this instance is subscribed to.
    pub fn sync_id(&self) -> Option<SyncId> {
        self.subscribed
    }

    /// The current data window; `None` when the table is empty.
    pub fn window(&self) -> Option<BrushWindow> {
        self.state.borrow().window
    }

    /// The current layout, or `None` when nothing can be laid out.
    pub fn snapshot(&self) -> Option<LayoutSnapshot> {
        self.state.borrow().snapshot.clone()
    }

    /// The current pointer state.
    pub fn pointer(&self) -> PointerState {
        self.state.borrow().pointer
    }

    /// Requests a new data window.
    ///
    /// Invalid windows are rejected and the current window is kept. A window equal to
    /// the current one is a no-op and returns `Ok(false)`. Otherwise the window is
    /// applied locally unless `affected` is [`AffectedCharts::Others`], and published to
    /// synchronized instances unless it is [`AffectedCharts::SelfOnly`].
    pub fn request_window(
        &mut self,
        start: usize,
        end: usize,
        affected: AffectedCharts,
    ) -> Result<bool, WindowError> {
        let window = {
            let state = self.state.borrow();
            let window = BrushWindow::validate(start, end, state.table.row_count())?;
            if state.window == Some(window) {
                return Ok(false);
            }
            window
        };
        if affected != AffectedCharts::Others {
            self.state.borrow_mut().apply_window(window);
        }
        if affected != AffectedCharts::SelfOnly {
            self.publish(SyncPayload {
                window: Some(window),
                pointer: None,
            });
        }
        Ok(true)
    }

    /// A brush drag: [`ChartInstance::request_window`] with the brush's affected charts.
    pub fn brush_change(&mut self, start: usize, end: usize) -> Result<bool, WindowError> {
        let affected = self
            .state
            .borrow()
            .spec
            .brush
            .map_or(AffectedCharts::All, |b| b.affected_charts);
        self.request_window(start, end, affected)
    }

    /// Replaces the data table and resets the window to the full range.
    pub fn set_data(&mut self, table: DataTable) {
        let mut state = self.state.borrow_mut();
        state.window = BrushWindow::full(table.row_count());
        state.table = table;
        state.pointer = PointerState::default();
        state.recompute();
    }

    /// Changes the synchronization group.
    pub fn set_sync_id(&mut self, sync_id: Option<SyncId>) {
        if self.subscribed == sync_id {
            return;
        }
        self.unsubscribe();
        self.state.borrow_mut().spec.sync_id = sync_id;
        if let Some(sync_id) = sync_id {
            self.subscribe(sync_id);
        }
    }

    /// Moves the pointer to canvas position `(x, y)`.
    ///
    /// Returns the window-relative row under the pointer, or `None` outside the plot.
    /// The new pointer state is published to synchronized instances.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<usize> {
        let position = Point::new(x, y);
        let pointer = {
            let mut state = self.state.borrow_mut();
            let index = state.snapshot.as_ref().and_then(|snapshot| {
                pointer_index(
                    &snapshot.offset,
                    state.spec.orientation,
                    &snapshot.tooltip_ticks,
                    position,
                )
            });
            state.pointer = PointerState {
                active: index.is_some(),
                index,
                position,
            };
            state.pointer
        };
        self.publish(SyncPayload {
            window: None,
            pointer: Some(pointer),
        });
        pointer.index
    }

    /// Deactivates the pointer and publishes the inactive state.
    pub fn pointer_leave(&mut self) {
        let pointer = {
            let mut state = self.state.borrow_mut();
            let position = state.pointer.position;
            state.pointer = PointerState {
                active: false,
                index: None,
                position,
            };
            state.pointer
        };
        self.publish(SyncPayload {
            window: None,
            pointer: Some(pointer),
        });
    }

    /// Series values at the active row, or an empty list when the pointer is inactive.
    pub fn tooltip_payload(&self) -> Vec<TooltipEntry> {
        let state = self.state.borrow();
        let (Some(index), Some(window)) = (state.pointer.index, state.window) else {
            return Vec::new();
        };
        if !state.pointer.active {
            return Vec::new();
        }
        let row = window.start_index + index;
        if !window.contains(row) {
            return Vec::new();
        }
        state
            .spec
            .series
            .iter()
            .map(|s| TooltipEntry {
                data_key: s.data_key.clone(),
                name: s.display_name().into(),
                value: state.table.value(row, &s.data_key).cloned().unwrap_or_default(),
                color: s.color,
            })
            .collect()
    }

    fn subscribe(&mut self, sync_id: SyncId) {
        let weak = Rc::downgrade(&self.state);
        self.bus.subscribe(sync_id, self.id, move |event| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            match state.try_borrow_mut() {
                Ok(mut state) => state.receive(event),
                Err(_) => log::warn!("chart state busy; sync event not applied"),
            }
        });
        self.subscribed = Some(sync_id);
    }

    fn unsubscribe(&mut self) {
        if let Some(sync_id) = self.subscribed.take() {
            self.bus.unsubscribe(sync_id, self.id);
        }
    }

    fn publish(&self, payload: SyncPayload) {
        if let Some(sync_id) = self.subscribed {
            self.bus.publish(&SyncEvent {
                sync_id,
                origin: self.id,
                payload,
            });
        }
    }
}

impl Drop for ChartInstance {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

fn initial_window(spec: &ChartSpec, table: &DataTable) -> Option<BrushWindow> {
    match &spec.brush {
        Some(brush) => brush.initial_window(table.row_count()),
        None => BrushWindow::full(table.row_count()),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::brush::BrushDeclaration;
    use crate::declaration::{AxisDeclaration, AxisId, SeriesDeclaration};

    fn table(n: usize) -> DataTable {
        DataTable::new()
            .with_numbers("v", (0..n).map(|i| i as f64))
            .expect("valid table")
    }

    fn spec() -> ChartSpec {
        ChartSpec::new(200.0, 100.0)
            .with_axis(AxisDeclaration::horizontal(AxisId(0)))
            .with_axis(AxisDeclaration::vertical(AxisId(0)))
            .with_series(SeriesDeclaration::new("v").with_name("Value"))
    }

    #[test]
    fn rejected_window_keeps_previous() {
        let bus = SyncBus::new();
        let mut chart = ChartInstance::new(spec(), table(5), &bus);
        assert_eq!(chart.request_window(1, 3, AffectedCharts::All), Ok(true));
        assert_eq!(
            chart.request_window(3, 1, AffectedCharts::All),
            Err(WindowError::StartAfterEnd { start: 3, end: 1 })
        );
        assert_eq!(chart.window(), BrushWindow::validate(1, 3, 5).ok());
        assert_eq!(chart.request_window(1, 3, AffectedCharts::All), Ok(false));
    }

    #[test]
    fn brush_declares_initial_window() {
        let bus = SyncBus::new();
        let spec = spec().with_brush(BrushDeclaration::new().with_initial_window(2, 4));
        let chart = ChartInstance::new(spec, table(6), &bus);
        let snapshot = chart.snapshot().expect("layout");
        assert_eq!(snapshot.window, BrushWindow::validate(2, 4, 6).expect("valid"));
        assert_eq!(snapshot.tooltip_ticks.len(), 3);
    }

    #[test]
    fn set_data_resets_window() {
        let bus = SyncBus::new();
        let mut chart = ChartInstance::new(spec(), table(5), &bus);
        chart
            .request_window(2, 3, AffectedCharts::SelfOnly)
            .expect("valid window");
        chart.set_data(table(8));
        assert_eq!(chart.window(), BrushWindow::full(8));
        chart.set_data(DataTable::new());
        assert_eq!(chart.window(), None);
        assert!(chart.snapshot().is_none());
    }

    #[test]
    fn pointer_drives_tooltip_payload() {
        let bus = SyncBus::new();
        let mut chart = ChartInstance::new(spec(), table(5), &bus);
        chart
            .request_window(1, 4, AffectedCharts::All)
            .expect("valid window");
        let snapshot = chart.snapshot().expect("layout");
        let tick = &snapshot.tooltip_ticks[2];
        let y = snapshot.offset.top + 1.0;
        assert_eq!(chart.pointer_move(tick.coordinate, y), Some(2));
        let payload = chart.tooltip_payload();
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[0].name, "Value");
        assert_eq!(payload[0].value, Value::Number(3.0));

        assert_eq!(chart.pointer_move(-5.0, y), None);
        assert!(chart.tooltip_payload().is_empty());
        chart.pointer_leave();
        assert!(!chart.pointer().active);
    }

    #[test]
    fn sync_id_lifecycle() {
        let bus = SyncBus::new();
        let mut chart = ChartInstance::new(spec().with_sync_id(SyncId(3)), table(3), &bus);
        assert_eq!(bus.subscriber_count(SyncId(3)), 1);
        chart.set_sync_id(Some(SyncId(4)));
        assert_eq!(bus.subscriber_count(SyncId(3)), 0);
        assert_eq!(bus.subscriber_count(SyncId(4)), 1);
        drop(chart);
        assert_eq!(bus.subscriber_count(SyncId(4)), 0);
    }
}
