//! DOM stage: `div.jsplayer` root, optional `<canvas>`, `div.modaloverlay` with one `a.button`.
use log::debug;
use playframe_core::{
    backing_size, GateControl, PlayerConfig, PlayerError, RenderSurface, Stage, DEFAULT_PIXEL_RATIO,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, Window};

use crate::utils::platform_error;

pub struct DomStage {
    document: Document,
    root: HtmlElement,
    overlay: HtmlElement,
    surface: Option<HtmlCanvasElement>,
    button_class: String,
}

fn create_html<T: JsCast>(document: &Document, tag: &str, class: &str) -> Result<T, PlayerError> {
    let element = document.create_element(tag).map_err(platform_error)?;
    element.set_class_name(class);
    element
        .dyn_into::<T>()
        .map_err(|_| PlayerError::platform(format!("<{tag}> has an unexpected element type")))
}

impl DomStage {
    /// Build the element tree. Nothing is attached to the document; the host
    /// inserts [`DomStage::root`] where it wants the player.
    pub fn new(document: &Document, config: &PlayerConfig) -> Result<Self, PlayerError> {
        let root: HtmlElement = create_html(document, "div", &config.root_class)?;

        let surface = match config.render_surface {
            RenderSurface::Container => None,
            RenderSurface::Canvas => {
                let canvas: HtmlCanvasElement = create_html(document, "canvas", "")?;
                root.append_child(&canvas).map_err(platform_error)?;
                Some(canvas)
            }
        };

        let overlay: HtmlElement = create_html(document, "div", &config.overlay_class)?;
        root.append_child(&overlay).map_err(platform_error)?;

        let stage = Self {
            document: document.clone(),
            root,
            overlay,
            surface,
            button_class: config.button_class.clone(),
        };
        stage.set_overlay_display(false)?;
        Ok(stage)
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    pub fn overlay_element(&self) -> &HtmlElement {
        &self.overlay
    }

    pub fn surface(&self) -> Option<&HtmlCanvasElement> {
        self.surface.as_ref()
    }

    fn set_overlay_display(&self, visible: bool) -> Result<(), PlayerError> {
        self.overlay
            .style()
            .set_property("display", if visible { "" } else { "none" })
            .map_err(platform_error)
    }
}

impl Stage for DomStage {
    type Target = Element;

    /// The canvas when there is one, otherwise the root container.
    fn target(&self) -> &Element {
        match &self.surface {
            Some(canvas) => AsRef::<Element>::as_ref(canvas),
            None => AsRef::<Element>::as_ref(&self.root),
        }
    }

    fn show_overlay(&mut self, control: &GateControl) -> Result<(), PlayerError> {
        self.overlay.set_inner_html("");
        let button: HtmlElement = create_html(&self.document, "a", &self.button_class)?;
        button.set_text_content(Some(&control.label));
        button
            .set_attribute("role", "button")
            .map_err(platform_error)?;
        self.overlay.append_child(&button).map_err(platform_error)?;
        self.set_overlay_display(true)
    }

    fn hide_overlay(&mut self) -> Result<(), PlayerError> {
        self.set_overlay_display(false)
    }

    fn sync_surface_size(&mut self, pixel_ratio: f64) -> Result<(), PlayerError> {
        let Some(canvas) = &self.surface else {
            return Ok(());
        };
        let size = backing_size(
            f64::from(canvas.client_width()),
            f64::from(canvas.client_height()),
            pixel_ratio,
        );
        canvas.set_width(size.width);
        canvas.set_height(size.height);
        debug!(
            "stage: canvas backing store {}x{} (ratio {pixel_ratio})",
            size.width, size.height
        );
        Ok(())
    }
}

/// Ratio between device pixels and CSS pixels, read once per player.
pub fn detect_pixel_ratio(window: &Window) -> f64 {
    let ratio = window.device_pixel_ratio();
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        DEFAULT_PIXEL_RATIO
    }
}
