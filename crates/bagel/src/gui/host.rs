use crate::gui::app::{AppModel, AppMsg};
use glide::{Haptics, HoldTimer, Key, Point, PointerButton, TimerId};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::ComponentSender;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

pub struct GlibHoldTimer {
    sender: relm4::Sender<AppMsg>,
    sources: Rc<RefCell<HashMap<TimerId, glib::SourceId>>>,
    next: u64,
}

impl GlibHoldTimer {
    pub fn new(sender: relm4::Sender<AppMsg>) -> Self {
        Self {
            sender,
            sources: Rc::default(),
            next: 0,
        }
    }
}

impl HoldTimer for GlibHoldTimer {
    fn arm(&mut self, delay: Duration) -> TimerId {
        self.next += 1;
        let id = TimerId(self.next);

        let sender = self.sender.clone();
        let sources = self.sources.clone();
        let source = glib::timeout_add_local_once(delay, move || {
            // a fired source is gone, it must not be removed again
            sources.borrow_mut().remove(&id);
            sender.emit(AppMsg::HoldElapsed(id));
        });
        self.sources.borrow_mut().insert(id, source);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(source) = self.sources.borrow_mut().remove(&id) {
            source.remove();
        }
    }
}

impl Drop for GlibHoldTimer {
    fn drop(&mut self) {
        for (_, source) in self.sources.borrow_mut().drain() {
            source.remove();
        }
    }
}

/// Desktops have no vibration motor; pulses are only traced.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHaptics;

impl Haptics for LogHaptics {
    fn pulse(&self, duration: Duration) {
        log::trace!("haptic pulse {:?}", duration);
    }
}

pub fn pointer_button(button: u32) -> PointerButton {
    match button {
        1 => PointerButton::Primary,
        2 => PointerButton::Middle,
        3 => PointerButton::Secondary,
        n => PointerButton::Other(n),
    }
}

pub struct InputBindings {
    area: gtk::DrawingArea,
    window: gtk::ApplicationWindow,
    pointer: Vec<gtk::EventController>,
    keys: gtk::EventController,
}

impl InputBindings {
    pub fn attach(
        area: &gtk::DrawingArea,
        window: &gtk::ApplicationWindow,
        sender: &ComponentSender<AppModel>,
    ) -> Self {
        let motion = gtk::EventControllerMotion::new();
        {
            let sender = sender.clone();
            motion.connect_motion(move |_, x, y| {
                sender.input(AppMsg::PointerMove(Point::new(x, y)));
            });
        }

        let click = gtk::GestureClick::new();
        click.set_button(0); // Listen to all buttons
        {
            let sender = sender.clone();
            click.connect_pressed(move |gesture, _, x, y| {
                sender.input(AppMsg::PointerDown(
                    Point::new(x, y),
                    pointer_button(gesture.current_button()),
                ));
            });
        }
        {
            let sender = sender.clone();
            click.connect_released(move |gesture, _, x, y| {
                sender.input(AppMsg::PointerUp(
                    Point::new(x, y),
                    pointer_button(gesture.current_button()),
                ));
            });
        }
        {
            let sender = sender.clone();
            click.connect_cancel(move |_, _| {
                sender.input(AppMsg::PointerCancel);
            });
        }

        let keys = gtk::EventControllerKey::new();
        {
            let sender = sender.clone();
            keys.connect_key_pressed(move |_, key, _, _| {
                let key = key
                    .name()
                    .map(|name| Key::from_name(&name))
                    .unwrap_or(Key::Other);
                if key == Key::Other {
                    return glib::Propagation::Proceed;
                }
                sender.input(AppMsg::Key(key));
                glib::Propagation::Stop
            });
        }

        area.add_controller(motion.clone());
        area.add_controller(click.clone());
        window.add_controller(keys.clone());

        Self {
            area: area.clone(),
            window: window.clone(),
            pointer: vec![motion.upcast(), click.upcast()],
            keys: keys.upcast(),
        }
    }
}

impl Drop for InputBindings {
    fn drop(&mut self) {
        for controller in &self.pointer {
            self.area.remove_controller(controller);
        }
        self.window.remove_controller(&self.keys);
    }
}
