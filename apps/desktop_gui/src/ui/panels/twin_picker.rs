use eframe::egui;
use egui::RichText;
use shared::domain::{Twin, TWIN_PRESETS};

use crate::controller::{
    events::ViewAction,
    view_state::TwinPickerState,
    wizard::{Selection, Slot},
};
use crate::ui::theme;

const CARD_SIZE: egui::Vec2 = egui::vec2(210.0, 118.0);

pub fn show(
    ui: &mut egui::Ui,
    twins: &[Twin],
    selection: &Selection,
    picker: &mut TwinPickerState,
    actions: &mut Vec<ViewAction>,
) {
    theme::section_title(ui, "Create Social Twins");
    ui.add_space(6.0);

    ui.horizontal_wrapped(|ui| {
        for (index, preset) in TWIN_PRESETS.iter().enumerate() {
            let button = theme::secondary_button(&format!("+ {}", preset.name));
            if ui
                .add_enabled(picker.can_add_preset(), button)
                .on_hover_text(preset.personality)
                .clicked()
            {
                actions.push(ViewAction::AddPreset(index));
            }
        }
    });
    ui.add_space(6.0);

    egui::Grid::new("twin_form")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            form_field(ui, &mut picker.form.name, "Name");
            form_field(
                ui,
                &mut picker.form.personality,
                "Personality (e.g. introverted, witty)",
            );
            ui.end_row();
            form_field(ui, &mut picker.form.interests, "Interests (comma-separated)");
            form_field(
                ui,
                &mut picker.form.communication_style,
                "Communication style (e.g. direct, playful)",
            );
            ui.end_row();
        });
    ui.add_space(4.0);
    if ui
        .add_enabled(
            picker.can_add(),
            theme::secondary_button(picker.add_button_label()).fill(theme::ACCENT_STRONG),
        )
        .clicked()
    {
        actions.push(ViewAction::AddCustomTwin);
    }

    ui.add_space(18.0);
    ui.horizontal(|ui| {
        theme::section_title(ui, "Select Two Twins to Match");
        if picker.loading_list {
            ui.spinner();
        } else if ui.small_button("⟳").on_hover_text("Reload twins").clicked() {
            actions.push(ViewAction::RefreshTwins);
        }
    });
    ui.label(RichText::new(selection_hint(selection)).color(theme::TEXT_MUTED));
    ui.add_space(6.0);

    if twins.is_empty() && !picker.loading_list {
        ui.label(
            RichText::new("No twins yet. Add a preset or a custom twin above.")
                .color(theme::TEXT_FAINT),
        );
    }

    ui.horizontal_wrapped(|ui| {
        for twin in twins {
            twin_card(ui, twin, selection.slot_of(&twin.id), picker, actions);
        }
    });

    if let Some(err) = &picker.error {
        ui.add_space(8.0);
        theme::inline_error(ui, err.message());
    }

    ui.add_space(12.0);
    if ui
        .add_enabled(
            picker.can_match(selection),
            theme::primary_button(picker.match_button_label()),
        )
        .clicked()
    {
        actions.push(ViewAction::RequestMatch);
    }
}

pub fn selection_hint(selection: &Selection) -> String {
    if selection.is_empty() {
        "Click two cards, then hit Match.".to_string()
    } else {
        format!("{} of 2 selected", selection.len())
    }
}

fn form_field(ui: &mut egui::Ui, value: &mut String, hint: &str) {
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .desired_width(300.0),
    );
}

fn twin_card(
    ui: &mut egui::Ui,
    twin: &Twin,
    slot: Option<Slot>,
    picker: &TwinPickerState,
    actions: &mut Vec<ViewAction>,
) {
    let frame = match slot {
        Some(Slot::A) => theme::outlined_card(theme::ACCENT, theme::ACCENT.gamma_multiply(0.1)),
        Some(Slot::B) => {
            theme::outlined_card(theme::SECOND_PICK, theme::SECOND_PICK.gamma_multiply(0.1))
        }
        None => theme::outlined_card(theme::CARD_BORDER, theme::CARD_BG.gamma_multiply(0.5)),
    };
    let deleting = picker.deleting.as_ref() == Some(&twin.id);

    // The card area is claimed first so the delete button drawn inside it
    // sits on top and keeps its own clicks.
    let (rect, response) = ui.allocate_exact_size(CARD_SIZE, egui::Sense::click());
    if response.clicked() {
        actions.push(ViewAction::ToggleTwin(twin.id.clone()));
    }

    ui_in_rect(ui, rect, |ui| {
        frame.show(ui, |ui| {
            ui.set_min_size(CARD_SIZE - egui::vec2(28.0, 28.0));
            ui.horizontal(|ui| {
                ui.label(RichText::new(&twin.name).size(18.0).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if deleting {
                        ui.spinner();
                    } else if ui
                        .add_enabled(
                            picker.can_delete(),
                            egui::Button::new(RichText::new("✕").color(theme::TEXT_FAINT))
                                .frame(false),
                        )
                        .on_hover_text("Delete twin")
                        .clicked()
                    {
                        actions.push(ViewAction::DeleteTwin(twin.id.clone()));
                    }
                });
            });
            ui.label(RichText::new(&twin.personality).small().color(theme::TEXT_MUTED));
            ui.label(RichText::new(&twin.interests).small().color(theme::TEXT_FAINT));
            if let Some(slot) = slot {
                ui.label(
                    RichText::new(slot.label().to_uppercase())
                        .small()
                        .strong()
                        .color(theme::ACCENT_SOFT),
                );
            }
        });
    });
}

fn ui_in_rect(ui: &mut egui::Ui, rect: egui::Rect, add: impl FnOnce(&mut egui::Ui)) {
    let mut child = ui.new_child(
        egui::UiBuilder::new()
            .max_rect(rect)
            .layout(egui::Layout::top_down(egui::Align::Min)),
    );
    child.set_clip_rect(rect);
    add(&mut child);
}
