use eframe::egui::{self, Event, MouseWheelUnit, PointerButton, Pos2, Rect, Sense, emath::RectTransform};
use gv_core::geometry::Pixel;
use gv_graphics::{Canvas, InteractionError};

/// Wheel units of one notch.
const NOTCH: f32 = 120.0;
/// Scrolling this many points counts as one notch.
const POINTS_PER_NOTCH: f32 = 50.0;
const NOTCHES_PER_PAGE: f32 = 10.0;

/// Per-canvas input state that lives across frames.
#[derive(Debug, Default)]
pub(crate) struct CanvasUi {
    held: Option<PointerButton>,
    /// Wheel movement not yet worth a whole notch.
    wheel: f32,
}

#[allow(clippy::cast_possible_truncation)]
fn pixel(rect: Rect, pos: Pos2) -> Pixel {
    let offset = pos - rect.min;
    Pixel::new(offset.x.floor() as i32, offset.y.floor() as i32)
}

impl CanvasUi {
    /// Shows `canvas` in the remaining space of `ui` and feeds it this frame's pointer events.
    /// Returns whether a button was pressed on the canvas.
    ///
    /// # Errors
    ///
    /// Errors of the canvas's interaction mode are returned after the frame's events are handled.
    pub(crate) fn ui(
        &mut self,
        ui: &mut egui::Ui,
        canvas: &mut Canvas,
    ) -> Result<bool, InteractionError> {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        canvas.on_resize(rect.size());

        let events = ui.input(|input| input.events.clone());
        let mut result = Ok(());
        let mut pressed = false;
        for event in events {
            let handled = match event {
                Event::PointerButton {
                    pos,
                    button,
                    pressed: true,
                    ..
                } if rect.contains(pos) && self.held.is_none() => {
                    self.held = Some(button);
                    pressed = true;
                    Some(canvas.on_press(button, pixel(rect, pos)))
                }
                Event::PointerButton {
                    pos,
                    button,
                    pressed: false,
                    ..
                } if self.held == Some(button) => {
                    self.held = None;
                    Some(canvas.on_release(button, pixel(rect, pos)))
                }
                Event::PointerMoved(pos) if self.held.is_some() || rect.contains(pos) => {
                    Some(canvas.on_pointer_move(pixel(rect, pos), self.held))
                }
                Event::MouseWheel { unit, delta, .. } if response.hovered() => {
                    let notches = match unit {
                        MouseWheelUnit::Point => delta.y / POINTS_PER_NOTCH,
                        MouseWheelUnit::Line => delta.y,
                        MouseWheelUnit::Page => delta.y * NOTCHES_PER_PAGE,
                    };
                    self.wheel += notches * NOTCH;
                    #[allow(clippy::cast_possible_truncation)]
                    let whole = (self.wheel / NOTCH).trunc() * NOTCH;
                    self.wheel -= whole;
                    if let Some(pos) = response.hover_pos() {
                        #[allow(clippy::cast_possible_truncation)]
                        canvas.on_wheel(whole as i32, pixel(rect, pos));
                    }
                    Some(Ok(()))
                }
                _ => None,
            };
            if let Some(outcome) = handled {
                if result.is_ok() {
                    result = outcome;
                }
            }
        }

        let transform = RectTransform::from_to(Rect::from_min_size(Pos2::ZERO, rect.size()), rect);
        painter.extend(canvas.surface().to_egui_shapes(ui, &transform));
        result.map(|()| pressed)
    }
}
