use crate::config::{BagelConfig, GestureConfig};
use crate::geometry::Point;
use crate::input::{Haptics, HoldTimer, Key, PointerButton, TimerId};
use crate::item::{self, RadialItem};
use crate::resolve::{Resolution, resolve_path};
use crate::state::{MenuState, MenuStatus, StateStore, Subscription};
use std::rc::Rc;

#[derive(Debug, Clone, Copy)]
struct Press {
    origin: Point,
    timer: Option<TimerId>,
}

/// The tap/hold/glide state machine of one bagel menu.
///
/// Points handed to the controller are already relative to the menu center.
/// Every handler runs to completion and publishes its effect through the
/// [`StateStore`]; listeners must not call back into the controller.
pub struct GlideController<T: HoldTimer, H: Haptics> {
    store: StateStore,
    items: Rc<[RadialItem]>,
    config: BagelConfig,
    gesture: GestureConfig,
    press: Option<Press>,
    timer: T,
    haptics: H,
}

impl<T: HoldTimer, H: Haptics> GlideController<T, H> {
    pub fn new(
        items: impl Into<Rc<[RadialItem]>>,
        config: BagelConfig,
        gesture: GestureConfig,
        timer: T,
        haptics: H,
    ) -> Self {
        Self {
            store: StateStore::new(),
            items: items.into(),
            config,
            gesture,
            press: None,
            timer,
            haptics,
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&MenuState) + 'static) -> Subscription {
        self.store.subscribe(listener)
    }

    pub fn state(&self) -> MenuState {
        self.store.state()
    }

    pub fn items(&self) -> &Rc<[RadialItem]> {
        &self.items
    }

    pub fn config(&self) -> &BagelConfig {
        &self.config
    }

    pub fn gesture(&self) -> &GestureConfig {
        &self.gesture
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn set_config(&mut self, config: BagelConfig) {
        if self.config != config {
            self.config = config;
        }
    }

    pub fn set_gesture(&mut self, gesture: GestureConfig) {
        if self.gesture != gesture {
            self.gesture = gesture;
        }
    }

    pub fn set_items(&mut self, items: impl Into<Rc<[RadialItem]>>) {
        let items = items.into();
        if Rc::ptr_eq(&self.items, &items) {
            return;
        }
        self.items = items;

        let path = self.store.active_path();
        let valid = item::valid_prefix_len(&self.items, &path);
        if valid < path.len() {
            log::debug!("catalog replaced, active path cut to depth {valid}");
            self.store.set_active_path(&path[..valid]);
        }
    }

    pub fn open(&mut self) {
        match self.store.status() {
            MenuStatus::Open | MenuStatus::Gliding => {}
            MenuStatus::AnimatingOut => {
                // straight back to OPEN, CLOSED is never published in between
                log::debug!("menu reopened during fade");
                self.store.set_selection(None);
                self.store.set_active_path(&[]);
                self.store.set_status(MenuStatus::Open);
            }
            MenuStatus::Closed => {
                log::debug!("menu opened");
                self.store.set_status(MenuStatus::Open);
            }
        }
    }

    pub fn close(&mut self) {
        self.release_press();
        match self.store.status() {
            MenuStatus::Closed | MenuStatus::AnimatingOut => {}
            MenuStatus::Open | MenuStatus::Gliding => {
                log::debug!("menu closed");
                self.finish_interaction();
            }
        }
    }

    pub fn finish_close(&mut self) {
        if self.store.status() == MenuStatus::AnimatingOut {
            self.store.reset();
        }
    }

    pub fn pointer_down(&mut self, point: Point, button: PointerButton) {
        if !button.is_primary() || self.press.is_some() {
            log::trace!("ignoring {button:?} press");
            return;
        }
        match self.store.status() {
            MenuStatus::AnimatingOut => return,
            MenuStatus::Closed => {
                log::debug!("menu opened by press");
                self.store.set_status(MenuStatus::Open);
            }
            MenuStatus::Open | MenuStatus::Gliding => {}
        }

        let timer = (self.store.status() == MenuStatus::Open)
            .then(|| self.timer.arm(self.gesture.hold_delay));
        self.press = Some(Press {
            origin: point,
            timer,
        });
    }

    pub fn pointer_move(&mut self, point: Point) {
        if !self.store.status().is_interactive() {
            return;
        }

        if let Some(press) = self.press
            && press.timer.is_some()
            && press.origin.distance(point) > self.gesture.movement_buffer
        {
            self.cancel_hold_timer();
            log::debug!("movement past buffer, gliding");
            self.store.set_status(MenuStatus::Gliding);
        }

        self.hover(point);
    }

    pub fn hold_elapsed(&mut self, id: TimerId) {
        let Some(press) = self.press.as_mut() else {
            log::trace!("hold timer {id:?} fired without a press");
            return;
        };
        if press.timer != Some(id) {
            log::trace!("stale hold timer {id:?}");
            return;
        }
        press.timer = None;

        if self.store.status() == MenuStatus::Open {
            log::debug!("hold elapsed, gliding");
            self.store.set_status(MenuStatus::Gliding);
            self.haptics.pulse(self.gesture.hold_pulse);
        }
    }

    pub fn pointer_up(&mut self, point: Point, button: PointerButton) {
        if !button.is_primary() {
            return;
        }
        self.end_press(point);
    }

    pub fn pointer_cancel(&mut self, point: Point) {
        self.end_press(point);
    }

    /// Returns whether the key was consumed.
    pub fn key_down(&mut self, key: Key) -> bool {
        if !self.store.status().is_interactive() {
            return false;
        }
        match key {
            Key::Escape => {
                self.close();
                true
            }
            Key::ArrowRight => self.cycle(true),
            Key::ArrowLeft => self.cycle(false),
            Key::ArrowDown => self.descend(),
            Key::ArrowUp => {
                let mut path = self.store.active_path();
                path.pop().is_some() && self.store.set_active_path(&path)
            }
            Key::Enter => {
                let path = self.store.active_path();
                self.confirm(&path)
            }
            Key::Other => false,
        }
    }

    fn hover(&mut self, point: Point) {
        let next = match resolve_path(point, &self.items, &self.config) {
            Resolution::DeadZone => Vec::new(),
            Resolution::Hit { path } => path,
            Resolution::Unresolved { path, .. } => {
                // stay on the current selection while it agrees with every
                // ring that did resolve
                let current = self.store.active_path();
                if current.starts_with(&path) {
                    return;
                }
                path
            }
        };

        if self.store.set_active_path(&next) {
            log::trace!("active path {next:?}");
            self.haptics.pulse(self.gesture.hover_pulse);
        }
    }

    fn end_press(&mut self, point: Point) {
        if self.release_press().is_none() || !self.store.status().is_interactive() {
            return;
        }

        match resolve_path(point, &self.items, &self.config) {
            Resolution::DeadZone => {
                log::debug!("released in dead zone");
                self.finish_interaction();
            }
            Resolution::Hit { path } => {
                if !self.confirm(&path) {
                    self.store.set_active_path(&path);
                    self.store.set_status(MenuStatus::Open);
                }
            }
            Resolution::Unresolved { .. } => {
                self.store.set_status(MenuStatus::Open);
            }
        }
    }

    fn confirm(&mut self, path: &[usize]) -> bool {
        let items = Rc::clone(&self.items);
        let Some(chain) = item::items_along(&items, path) else {
            return false;
        };
        let Some(leaf) = chain.last().copied().filter(|item| item.is_leaf()) else {
            return false;
        };

        self.release_press();
        self.store.set_active_path(path);
        log::info!("selected '{}' at {path:?}", leaf.id);

        if let Some(action) = &leaf.action {
            action();
        }
        if let Some(on_select) = &leaf.on_select {
            on_select(chain.as_slice());
        }
        self.store.set_selection(Some(path));
        self.finish_interaction();
        true
    }

    fn cycle(&mut self, forward: bool) -> bool {
        let mut path = self.store.active_path();
        let depth = path.len().saturating_sub(1);
        let count = item::children_at(&self.items, &path[..depth]).map_or(0, <[_]>::len);
        if count == 0 {
            return false;
        }

        let next = match (path.get(depth), forward) {
            (Some(&index), true) => (index + 1) % count,
            (Some(&index), false) => (index + count - 1) % count,
            (None, true) => 0,
            (None, false) => count - 1,
        };
        path.truncate(depth);
        path.push(next);
        self.store.set_active_path(&path)
    }

    fn descend(&mut self) -> bool {
        let mut path = self.store.active_path();
        let has_children = if path.is_empty() {
            !self.items.is_empty()
        } else {
            item::item_at(&self.items, &path).is_some_and(RadialItem::is_branch)
        };
        if !has_children {
            return false;
        }
        path.push(0);
        self.store.set_active_path(&path)
    }

    fn finish_interaction(&mut self) {
        if self.gesture.animate_out {
            self.store.set_status(MenuStatus::AnimatingOut);
        } else {
            self.store.reset();
        }
    }

    fn release_press(&mut self) -> Option<Press> {
        let press = self.press.take();
        if let Some(id) = press.and_then(|p| p.timer) {
            self.timer.cancel(id);
        }
        press
    }

    fn cancel_hold_timer(&mut self) {
        if let Some(id) = self.press.as_mut().and_then(|p| p.timer.take()) {
            self.timer.cancel(id);
        }
    }
}

impl<T: HoldTimer, H: Haptics> Drop for GlideController<T, H> {
    fn drop(&mut self) {
        self.release_press();
    }
}
