use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::host::{GlibHoldTimer, InputBindings, LogHaptics};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::view::{self, Scene};
use crate::gui::window;
use glide::{GlideController, Key, MenuState, MenuStatus, Point, PointerButton, TimerId};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const FADE_OUT: Duration = Duration::from_millis(150);

pub struct AppModel {
    pub controller: GlideController<GlibHoldTimer, LogHaptics>,
    pub scene: Rc<RefCell<Scene>>,
    pub visible: bool,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
    bindings: Option<InputBindings>,
    fade: Option<glib::SourceId>,
    _subscription: glide::Subscription,
}

#[derive(Debug)]
pub enum AppMsg {
    Open,
    Close,
    Toggle,
    PointerDown(Point, PointerButton),
    PointerMove(Point),
    PointerUp(Point, PointerButton),
    PointerCancel,
    Key(Key),
    HoldElapsed(TimerId),
    StateChanged(MenuState),
    FadeFinished,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Open => AppMsg::Open,
            AppEvent::Close => AppMsg::Close,
            AppEvent::Toggle => AppMsg::Toggle,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    fn relative(&self, point: Point) -> Point {
        let mut scene = self.scene.borrow_mut();
        scene.cursor = Some(point);
        Point::new(point.x - scene.center.x, point.y - scene.center.y)
    }

    fn last_pointer(&self) -> Point {
        let scene = self.scene.borrow();
        scene
            .cursor
            .map(|p| Point::new(p.x - scene.center.x, p.y - scene.center.y))
            .unwrap_or_default()
    }

    fn cancel_fade(&mut self) {
        if let Some(source) = self.fade.take() {
            source.remove();
        }
    }

    fn attach_bindings(&mut self, sender: &ComponentSender<Self>) {
        if self.bindings.is_none() {
            self.bindings = Some(InputBindings::attach(
                &self.drawing_area,
                &self.root,
                sender,
            ));
        }
    }

    fn open(&mut self, sender: &ComponentSender<Self>) {
        if self.controller.state().status.is_interactive() {
            return;
        }
        self.cancel_fade();
        self.attach_bindings(sender);

        // the surface only exists once the window is realized
        self.visible = true;
        self.root.set_visible(true);
        let center = window::pick_center(
            window::get_cursor_position(&self.root),
            || window::monitor_center(&self.root),
            || window::area_center(&self.drawing_area),
        );
        {
            let mut scene = self.scene.borrow_mut();
            scene.center = center;
            scene.cursor = None;
        }
        self.controller.open();
    }

    fn apply_state(&mut self, state: MenuState, sender: &ComponentSender<Self>) {
        let status = state.status;
        self.scene.borrow_mut().state = state;
        self.visible = status != MenuStatus::Closed;

        match status {
            MenuStatus::Closed => {
                self.cancel_fade();
                self.bindings = None;
            }
            MenuStatus::AnimatingOut if self.fade.is_none() => {
                // input stops at the start of the fade, not the end
                self.bindings = None;
                let input = sender.input_sender().clone();
                self.fade = Some(glib::timeout_add_local_once(FADE_OUT, move || {
                    input.emit(AppMsg::FadeFinished);
                }));
            }
            MenuStatus::Open | MenuStatus::Gliding => self.attach_bindings(sender),
            MenuStatus::AnimatingOut => {}
        }
        self.drawing_area.queue_draw();
    }

    fn reload(&mut self) {
        match config::load_config() {
            Ok(new_config) => {
                self.controller.set_config(new_config.menu);
                self.controller.set_gesture(new_config.gesture);
                self.controller.set_items(new_config.build_items());

                let mut scene = self.scene.borrow_mut();
                scene.items = self.controller.items().clone();
                scene.config = *self.controller.config();
                drop(scene);

                self.drawing_area.queue_draw();
                log::info!("Configuration reloaded");
            }
            Err(e) => log::error!("Failed to reload config: {}", e),
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Bagel"),
            #[watch]
            set_visible: model.visible,
            add_css_class: "bagel-window",
            set_decorated: false,

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                set_focusable: true,
                add_css_class: "bagel-drawing-area",
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let controller = GlideController::new(
            config.build_items(),
            config.menu,
            config.gesture,
            GlibHoldTimer::new(sender.input_sender().clone()),
            LogHaptics,
        );

        let input = sender.input_sender().clone();
        let subscription = controller.subscribe(move |state| {
            input.emit(AppMsg::StateChanged(state.clone()));
        });

        let scene = Rc::new(RefCell::new(Scene::new(
            controller.items().clone(),
            *controller.config(),
        )));

        let model = AppModel {
            controller,
            scene,
            visible: false,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
            bindings: None,
            fade: None,
            _subscription: subscription,
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let scene_draw = model.scene.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = view::draw(cr, &scene_draw.borrow(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Open => self.open(&sender),
            AppMsg::Close => self.controller.close(),
            AppMsg::Toggle => {
                if self.controller.state().status.is_interactive() {
                    self.controller.close();
                } else {
                    self.open(&sender);
                }
            }
            AppMsg::PointerDown(point, button) => {
                let point = self.relative(point);
                self.controller.pointer_down(point, button);
            }
            AppMsg::PointerMove(point) => {
                let point = self.relative(point);
                self.controller.pointer_move(point);
                if self.controller.state().status == MenuStatus::Gliding {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::PointerUp(point, button) => {
                let point = self.relative(point);
                self.controller.pointer_up(point, button);
            }
            AppMsg::PointerCancel => {
                let point = self.last_pointer();
                self.controller.pointer_cancel(point);
            }
            AppMsg::Key(key) => {
                self.controller.key_down(key);
            }
            AppMsg::HoldElapsed(id) => self.controller.hold_elapsed(id),
            AppMsg::StateChanged(state) => self.apply_state(state, &sender),
            AppMsg::FadeFinished => {
                self.fade = None;
                self.controller.finish_close();
            }
            AppMsg::ConfigReload => self.reload(),
        }
    }
}
