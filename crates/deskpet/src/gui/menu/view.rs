use super::model::{MenuEntry, MenuState, sections};
use super::{ACTION_GROUP, MODE_ACTION, QUIT_ACTION, SIZE_ACTION};
use gtk::gio;
use gtk::prelude::*;
use gtk4 as gtk;
use petctl::command::{ControlCommand, Mode, SizePreset};

fn qualified(action: &str) -> String {
    format!("{}.{}", ACTION_GROUP, action)
}

fn item(entry: &MenuEntry) -> gio::MenuItem {
    let item = gio::MenuItem::new(Some(&entry.label()), None);
    match entry {
        // no action, so the popover renders it insensitive
        MenuEntry::Header(_) => {}
        MenuEntry::Mode(mode) => item.set_action_and_target_value(
            Some(&qualified(MODE_ACTION)),
            Some(&mode.to_string().to_variant()),
        ),
        MenuEntry::Size(size) => item.set_action_and_target_value(
            Some(&qualified(SIZE_ACTION)),
            Some(&size.to_string().to_variant()),
        ),
        MenuEntry::Quit => item.set_action_and_target_value(Some(&qualified(QUIT_ACTION)), None),
    }
    item
}

pub fn build(state: &MenuState) -> gio::Menu {
    let menu = gio::Menu::new();
    for section in sections(state) {
        let section_menu = gio::Menu::new();
        for entry in &section {
            section_menu.append_item(&item(entry));
        }
        menu.append_section(None, &section_menu);
    }
    menu
}

fn radio<T, F>(name: &str, initial: &str, on_pick: F) -> gio::SimpleAction
where
    T: std::str::FromStr + 'static,
    F: Fn(T) + 'static,
{
    let action =
        gio::SimpleAction::new_stateful(name, Some(glib::VariantTy::STRING), &initial.to_variant());
    action.connect_activate(move |_, param| {
        match param.and_then(|p| p.get::<String>()).map(|s| s.parse::<T>()) {
            Some(Ok(value)) => on_pick(value),
            _ => log::warn!("Ignoring menu activation with bad target {:?}", param),
        }
    });
    action
}

/// Creates the `pet.*` actions the menu items point at. Every selection is turned into
/// a [`ControlCommand`] and handed to `on_command`.
pub fn install_actions<F>(widget: &impl IsA<gtk::Widget>, on_command: F) -> gio::SimpleActionGroup
where
    F: Fn(ControlCommand) + Clone + 'static,
{
    let group = gio::SimpleActionGroup::new();

    let on_mode = on_command.clone();
    group.add_action(&radio(
        MODE_ACTION,
        &Mode::default().to_string(),
        move |mode: Mode| on_mode(ControlCommand::Mode(mode)),
    ));

    let on_size = on_command.clone();
    group.add_action(&radio(
        SIZE_ACTION,
        &SizePreset::default().to_string(),
        move |size: SizePreset| on_size(ControlCommand::Size(size)),
    ));

    let quit = gio::SimpleAction::new(QUIT_ACTION, None);
    quit.connect_activate(move |_, _| on_command(ControlCommand::Quit));
    group.add_action(&quit);

    widget.insert_action_group(ACTION_GROUP, Some(&group));
    group
}

/// Moves the radio marks to the current mode and size.
pub fn sync(group: &gio::SimpleActionGroup, state: &MenuState) {
    let set = |name: &str, value: String| {
        if let Some(action) = group
            .lookup_action(name)
            .and_downcast::<gio::SimpleAction>()
        {
            action.set_state(&value.to_variant());
        }
    };

    set(MODE_ACTION, state.mode.to_string());
    set(
        SIZE_ACTION,
        state.size.map(|s| s.to_string()).unwrap_or_default(),
    );
}
