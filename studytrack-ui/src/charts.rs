//! Charts Page
//!
//! Chart.js drawing surface for the chart registry. The library is loaded by the
//! page; a missing `Chart` global turns every draw into a logged skip.

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlCanvasElement;

use studytrack::{ChartError, ChartKind, ChartSeries, ChartSpec, ChartSurface, ChartsController};

use crate::dom;

fn js_error(e: JsValue) -> ChartError {
    ChartError::Surface(format!("{:?}", e))
}

/// The page's `Chart` constructor
fn chart_constructor() -> Result<js_sys::Function, ChartError> {
    js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("Chart"))
        .map_err(js_error)?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| ChartError::Surface("Chart.js is not loaded".to_string()))
}

/// Canvases on the current page, drawn with Chart.js
struct ChartJsSurface;

impl ChartJsSurface {
    fn canvas(kind: ChartKind) -> Option<HtmlCanvasElement> {
        dom::by_id(kind.canvas_id()).and_then(|el| el.dyn_into().ok())
    }
}

impl ChartSurface for ChartJsSurface {
    /// The Chart.js instance
    type Handle = JsValue;

    fn has_slot(&self, kind: ChartKind) -> bool {
        Self::canvas(kind).is_some()
    }

    fn embedded_config(&self, kind: ChartKind) -> Option<String> {
        Self::canvas(kind)?.get_attribute("data-chart")
    }

    fn draw(&mut self, spec: &ChartSpec) -> Result<JsValue, ChartError> {
        let canvas = Self::canvas(spec.kind)
            .ok_or_else(|| ChartError::Surface(format!("no canvas #{}", spec.kind.canvas_id())))?;

        let config = js_sys::JSON::parse(&spec.to_chartjs().to_string()).map_err(js_error)?;
        let args = js_sys::Array::of2(&JsValue::from(canvas), &config);

        js_sys::Reflect::construct(&chart_constructor()?, &args).map_err(js_error)
    }

    fn destroy(&mut self, handle: JsValue) {
        let destroy = js_sys::Reflect::get(&handle, &JsValue::from_str("destroy"))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok());

        match destroy {
            Some(destroy) => {
                if let Err(e) = destroy.call0(&handle) {
                    dom::log_error(&format!("Failed to destroy chart: {:?}", e));
                }
            }
            None => dom::log_error("Chart handle has no destroy()"),
        }
    }
}

/// Charts on the current page
pub struct StudyCharts {
    controller: RefCell<ChartsController<ChartJsSurface>>,
}

impl StudyCharts {
    /// Draw the charts when the page has a chart area
    pub fn mount() -> Option<Rc<Self>> {
        dom::query(".chart-container")?;

        let mut controller = ChartsController::new(ChartJsSurface, ChartSeries::default());
        controller.initialize();
        dom::log(&format!("Rendered {} charts", controller.chart_count()));

        Some(Rc::new(Self {
            controller: RefCell::new(controller),
        }))
    }

    /// Destroy and rebuild every chart
    pub fn refresh(&self) {
        self.controller.borrow_mut().refresh();
    }
}
