use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::menu::{self, MenuState};
use crate::gui::sprite;
use crate::gui::theme::{self, PetColors};
use crate::gui::window::{self, GlibScheduler, PetWindow};
use crate::pet::Coordinator;
use gdk_pixbuf::Pixbuf;
use gtk::gdk;
use gtk::gio;
use gtk::prelude::*;
use gtk4 as gtk;
use petctl::command::ControlCommand;
use petctl::wm::{self, Point};
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

type PetCoordinator = Coordinator<PetWindow, GlibScheduler>;

pub struct AppModel {
    pub coordinator: Rc<RefCell<PetCoordinator>>,
    pub config: Config,
    pub sprite: Rc<RefCell<Option<Pixbuf>>>,
    pub actions: gio::SimpleActionGroup,
    pub popover: gtk::PopoverMenu,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Command(ControlCommand),
    ConfigReload,
    ShowMenu(Point),
    DragBegin,
    DragUpdate,
    DragEnd,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::SetMode(mode) => AppMsg::Command(ControlCommand::Mode(mode)),
            AppEvent::SetSize(size) => AppMsg::Command(ControlCommand::Size(size)),
            AppEvent::Quit => AppMsg::Command(ControlCommand::Quit),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
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
            set_title: Some("deskpet"),
            add_css_class: "deskpet-window",
            set_decorated: false,
            set_resizable: false,

            #[name = "drawing_area"]
            gtk::DrawingArea {
                add_css_class: "deskpet-drawing-area",

                add_controller = gtk::GestureClick {
                    set_button: 3,
                    connect_pressed[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::ShowMenu(Point::new(x, y)));
                    }
                },

                add_controller = gtk::GestureDrag {
                    set_button: 1,
                    connect_drag_begin[sender] => move |_, _, _| {
                        sender.input(AppMsg::DragBegin);
                    },
                    connect_drag_update[sender] => move |_, _, _| {
                        sender.input(AppMsg::DragUpdate);
                    },
                    connect_drag_end[sender] => move |_, _, _| {
                        sender.input(AppMsg::DragEnd);
                    }
                }
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
        let monitor = wm::get_active_monitor();
        if let Some(name) = &monitor {
            window::set_window_monitor(&root, name);
        }

        let coordinator = Coordinator::new(
            PetWindow::new(&root, monitor),
            GlibScheduler,
            config.motion.clone(),
        );

        let command_sender = sender.clone();
        let actions = menu::install_actions(&root, move |command| {
            command_sender.input(AppMsg::Command(command));
        });

        let model = AppModel {
            coordinator,
            sprite: Rc::new(RefCell::new(sprite::load(
                config.appearance.sprite.as_deref(),
            ))),
            config,
            actions,
            popover: gtk::PopoverMenu::from_model(None::<&gio::MenuModel>),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.popover.set_parent(&widgets.drawing_area);
        model.popover.set_has_arrow(false);

        let sprite_draw = model.sprite.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let colors = PetColors::from_context(&drawing_area.style_context());
                if let Err(e) = sprite::draw(
                    cr,
                    width as f64,
                    height as f64,
                    sprite_draw.borrow().as_ref(),
                    &colors,
                ) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let coordinator_map = model.coordinator.clone();
        root.connect_map(move |_| {
            coordinator_map.borrow().geometry().sync_surface();
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        model.sync_menu();

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Command(ControlCommand::Mode(mode)) => {
                self.popover.popdown();
                self.coordinator.borrow_mut().set_mode(mode);
                self.sync_menu();
            }
            AppMsg::Command(ControlCommand::Size(size)) => {
                if let Err(e) = self.coordinator.borrow_mut().set_size_scale(size.scale()) {
                    log::error!("Failed to resize: {}", e);
                }
                self.sync_menu();
                self.drawing_area.queue_draw();
            }
            AppMsg::Command(ControlCommand::Quit) => {
                log::info!("Quitting");
                relm4::main_application().quit();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    if let Err(e) = self
                        .coordinator
                        .borrow_mut()
                        .reconfigure(new_config.motion.clone())
                    {
                        log::warn!("Keeping previous configuration: {}", e);
                        return;
                    }
                    if new_config.appearance != self.config.appearance {
                        *self.sprite.borrow_mut() =
                            sprite::load(new_config.appearance.sprite.as_deref());
                        self.drawing_area.queue_draw();
                    }
                    self.config = new_config;
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::ShowMenu(point) => {
                self.popover.set_pointing_to(Some(&gdk::Rectangle::new(
                    point.x as i32,
                    point.y as i32,
                    1,
                    1,
                )));
                self.popover.popup();
            }
            AppMsg::DragBegin => self.coordinator.borrow_mut().begin_drag(),
            AppMsg::DragUpdate => self.coordinator.borrow_mut().drag(),
            AppMsg::DragEnd => self.coordinator.borrow_mut().end_drag(),
        }
    }
}

impl AppModel {
    fn menu_state(&self) -> MenuState {
        let coordinator = self.coordinator.borrow();
        MenuState {
            mode: coordinator.mode(),
            size: coordinator.size_preset(),
        }
    }

    /// Rebuilds the popover contents and moves the radio marks, like a dock menu refresh.
    fn sync_menu(&self) {
        let state = self.menu_state();
        menu::sync(&self.actions, &state);
        self.popover.set_menu_model(Some(&menu::build(&state)));
    }
}
