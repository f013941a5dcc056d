use anyhow::Context;
use eframe::egui;
use strum::IntoEnumIterator;
use tour_core::kurbo::{Point, Rect, Size};
use tour_core::panel::PANEL_FIELDS;
use tour_core::{
    BlockType, CanvasLayout, EditorSession, Element, Field, PointerButton, PointerEvent, Position,
    Tour,
};
use tracing_subscriber::EnvFilter;

const CELL_HEIGHT: f32 = 80.0;
const PALETTE_SLOT: egui::Vec2 = egui::vec2(140.0, 32.0);

fn main() -> eframe::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tour_core=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let tour_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tour.json".to_string());

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Tour Editor",
        options,
        Box::new(|_cc| Ok(Box::new(EditorApp::new(tour_path)?))),
    )
}

fn to_pos2(p: Point) -> egui::Pos2 {
    egui::pos2(p.x as f32, p.y as f32)
}

fn to_point(p: egui::Pos2) -> Point {
    Point::new(f64::from(p.x), f64::from(p.y))
}

fn to_egui_rect(r: Rect) -> egui::Rect {
    egui::Rect::from_min_max(to_pos2(Point::new(r.x0, r.y0)), to_pos2(Point::new(r.x1, r.y1)))
}

fn to_kurbo_rect(r: egui::Rect) -> Rect {
    Rect::new(
        f64::from(r.min.x),
        f64::from(r.min.y),
        f64::from(r.max.x),
        f64::from(r.max.y),
    )
}

fn block_color(block_type: BlockType) -> egui::Color32 {
    match block_type {
        BlockType::Text => egui::Color32::from_rgb(70, 90, 130),
        BlockType::Image => egui::Color32::from_rgb(70, 120, 90),
        BlockType::Link => egui::Color32::from_rgb(110, 80, 130),
        BlockType::Video => egui::Color32::from_rgb(130, 80, 70),
        BlockType::Sound => egui::Color32::from_rgb(130, 110, 60),
        BlockType::MapRoute => egui::Color32::from_rgb(60, 110, 120),
        BlockType::MapPoint => egui::Color32::from_rgb(90, 120, 120),
    }
}

struct EditorApp {
    tour_path: String,
    session: EditorSession,

    // UI state
    status: String,
    last_error: Option<String>,
}

impl EditorApp {
    fn new(tour_path: String) -> anyhow::Result<Self> {
        let tour = if std::path::Path::new(&tour_path).exists() {
            Tour::load_json_file(&tour_path)
                .with_context(|| format!("load tour file: {tour_path}"))?
        } else {
            Tour::new("Untitled tour")
        };

        let rows = tour.config.min_rows;
        let layout = CanvasLayout::new(Rect::ZERO, rows);
        let session = EditorSession::new(tour, layout)?;

        Ok(Self {
            tour_path,
            session,
            status: String::new(),
            last_error: None,
        })
    }

    fn report<T>(&mut self, result: tour_core::Result<T>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    fn save(&mut self) {
        if !self.session.is_idle() {
            self.last_error = Some("finish the current gesture before saving".to_string());
            return;
        }
        match self.session.tour.save_json_file(&self.tour_path) {
            Ok(()) => {
                tracing::info!(path = %self.tour_path, "tour saved");
                self.status = format!("Saved {}", self.tour_path);
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(format!("{e:#}")),
        }
    }

    fn palette_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Blocks");
        ui.separator();

        for block_type in BlockType::iter() {
            let button = egui::Button::new(block_type.to_string())
                .min_size(PALETTE_SLOT)
                .fill(block_color(block_type))
                .sense(egui::Sense::click_and_drag());
            let response = ui.add(button);

            if response.drag_started() {
                let Some(at) = response.interact_pointer_pos() else {
                    continue;
                };
                let event = PointerEvent::primary(to_point(at));
                let template = to_kurbo_rect(response.rect);
                let result = self.session.begin_palette_drag(event, block_type, template);
                self.report(result);
            }
        }
    }

    fn properties_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Properties");
        ui.separator();

        let Some(id) = self.session.panel.block() else {
            ui.label("Select a block to edit it.");
            return;
        };
        ui.label(format!("Block #{id}"));

        let mut edits: Vec<(Field, String)> = Vec::new();
        egui::Grid::new("properties").num_columns(2).show(ui, |ui| {
            for field in PANEL_FIELDS {
                let panel = &self.session.panel;
                let enabled = panel.is_enabled(field);
                ui.label(field.to_string());

                match field {
                    Field::Type => {
                        let current = panel
                            .value(field)
                            .parse::<BlockType>()
                            .unwrap_or(BlockType::Text);
                        let mut chosen = current;
                        ui.add_enabled_ui(enabled, |ui| {
                            egui::ComboBox::from_id_source("block_type")
                                .selected_text(current.to_string())
                                .show_ui(ui, |ui| {
                                    for t in BlockType::iter() {
                                        ui.selectable_value(&mut chosen, t, t.to_string());
                                    }
                                });
                        });
                        if chosen != current {
                            edits.push((field, chosen.tag().to_string()));
                        }
                    }
                    Field::ShowOnMap => {
                        let mut checked = !matches!(panel.value(field), "" | "0" | "off" | "false");
                        if ui.add_enabled(enabled, egui::Checkbox::without_text(&mut checked)).changed() {
                            edits.push((field, checked.to_string()));
                        }
                    }
                    _ => {
                        let mut text = panel.value(field).to_string();
                        let edit = egui::TextEdit::singleline(&mut text);
                        if ui.add_enabled(enabled, edit).changed() {
                            edits.push((field, text));
                        }
                    }
                }
                ui.end_row();
            }
        });

        for (field, value) in edits {
            let result = self.session.edit_field(field, &value);
            self.report(result);
        }

        ui.separator();
        if let Ok(pos) = Position::from_block(&self.session.tour.blocks, id) {
            let (row, col, end_row, end_col) = pos.area();
            ui.label(format!("Rows {row}..{end_row}, columns {col}..{end_col}"));
        }
    }

    /// Lay the canvas out for this frame and paint the scene into it.
    fn canvas_ui(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let rows = self.session.rows_needed();
        let width = ui.available_width().max(4.0 * 40.0);
        let size = egui::vec2(width, CELL_HEIGHT * rows as f32);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());

        let origin = to_point(response.rect.min);
        let cell = Size::new(f64::from(width) / 4.0, f64::from(CELL_HEIGHT));
        self.session
            .set_layout(CanvasLayout::from_cells(origin, cell, rows));
        let layout = *self.session.layout();

        // grid
        let grid = egui::Stroke::new(1.0, egui::Color32::from_gray(60));
        let canvas = response.rect;
        painter.rect_filled(canvas, 0.0, egui::Color32::from_gray(25));
        for c in 0..=4 {
            let x = canvas.min.x + c as f32 * cell.width as f32;
            painter.line_segment([egui::pos2(x, canvas.min.y), egui::pos2(x, canvas.max.y)], grid);
        }
        for r in 0..=rows {
            let y = canvas.min.y + r as f32 * CELL_HEIGHT;
            painter.line_segment([egui::pos2(canvas.min.x, y), egui::pos2(canvas.max.x, y)], grid);
        }

        // docked blocks
        for (id, pos) in self.session.scene.docked() {
            let rect = to_egui_rect(pos.pixel_rect(&layout)).shrink(2.0);
            let blocks = &self.session.tour.blocks;
            let block_type = blocks.block_type(id).unwrap_or(BlockType::Text);
            painter.rect_filled(rect, 4.0, block_color(block_type));

            let name = blocks.get(id, Field::Name).unwrap_or_default();
            painter.text(
                rect.min + egui::vec2(6.0, 4.0),
                egui::Align2::LEFT_TOP,
                format!("#{id} {block_type} {name}"),
                egui::FontId::proportional(13.0),
                egui::Color32::WHITE,
            );

            if self.session.scene.highlighted() == Some(id) {
                painter.rect_stroke(rect, 4.0, egui::Stroke::new(2.0, egui::Color32::YELLOW));
            }
        }

        // drop marker
        if let Some(ghost) = self.session.scene.ghost.marker() {
            let rect = to_egui_rect(ghost.pixel_rect(&layout)).shrink(2.0);
            painter.rect_filled(rect, 4.0, egui::Color32::from_white_alpha(30));
            painter.rect_stroke(rect, 4.0, egui::Stroke::new(1.0, egui::Color32::LIGHT_GRAY));
        }

        response
    }

    /// The floating element goes on a foreground layer so it stays above
    /// both side panels.
    fn paint_floating(&self, ctx: &egui::Context) {
        let Some(floating) = self.session.scene.floating() else {
            return;
        };
        let layer = egui::LayerId::new(egui::Order::Tooltip, egui::Id::new("floating"));
        let painter = ctx.layer_painter(layer);

        let (label, block_type) = match floating.element {
            Element::Block(id) => (
                format!("#{id}"),
                self.session
                    .tour
                    .blocks
                    .block_type(id)
                    .unwrap_or(BlockType::Text),
            ),
            Element::PaletteClone(t) => (t.to_string(), t),
        };
        let rect = to_egui_rect(floating.rect());
        painter.rect_filled(rect, 4.0, block_color(block_type).gamma_multiply(0.8));
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            label,
            egui::FontId::proportional(13.0),
            egui::Color32::WHITE,
        );
    }

    /// Feed this frame's pointer input into the session.
    fn handle_pointer(&mut self, ctx: &egui::Context, canvas: &egui::Response) {
        let (pos, pressed, released) = ctx.input(|i| {
            let button = if i.pointer.primary_pressed() {
                Some(PointerButton::Primary)
            } else if i.pointer.secondary_pressed() {
                Some(PointerButton::Secondary)
            } else if i.pointer.button_pressed(egui::PointerButton::Middle) {
                Some(PointerButton::Middle)
            } else {
                None
            };
            (i.pointer.latest_pos(), button, i.pointer.primary_released())
        });
        let Some(pos) = pos else {
            return;
        };
        let at = to_point(pos);

        if let Some(button) = pressed {
            if canvas.hovered() && self.session.is_idle() {
                let result = self.session.pointer_down(PointerEvent::new(at, button));
                self.report(result);
            }
        }

        if !self.session.is_idle() {
            let result = self.session.pointer_move(PointerEvent::primary(at));
            self.report(result);
            ctx.request_repaint();
        }

        if released {
            let result = self.session.pointer_up(PointerEvent::primary(at));
            if let Some(Some(outcome)) = self.report(result) {
                self.status = format!("{outcome:?}");
            }
        }
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(&self.session.tour.name);
                ui.separator();
                ui.label(format!("File: {}", self.tour_path));
                ui.separator();

                if ui.button("Save").clicked() {
                    self.save();
                }
                if ui
                    .add_enabled(self.session.panel.block().is_some(), egui::Button::new("Deselect"))
                    .clicked()
                {
                    let result = self.session.select(None);
                    self.report(result);
                }

                ui.separator();
                ui.label(&self.status);
            });

            if let Some(err) = &self.last_error {
                ui.colored_label(egui::Color32::RED, format!("Error: {err}"));
            }
        });

        egui::SidePanel::left("palette")
            .resizable(false)
            .show(ctx, |ui| self.palette_ui(ui));

        egui::SidePanel::right("properties")
            .min_width(240.0)
            .show(ctx, |ui| self.properties_ui(ui));

        let canvas = egui::CentralPanel::default()
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| self.canvas_ui(ui))
                    .inner
            })
            .inner;

        self.handle_pointer(ctx, &canvas);
        self.paint_floating(ctx);
    }
}
