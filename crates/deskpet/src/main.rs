use deskpet::config;
use deskpet::gui::app::AppModel;
use deskpet::sys::runtime;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(tx);

    let app = RelmApp::new("org.deskpet.deskpet");

    app.run::<AppModel>((config, rx));
}
