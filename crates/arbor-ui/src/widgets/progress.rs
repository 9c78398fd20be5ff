use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::*;

use super::slider::{RangeBehavior, TrackVisual, norm};
use super::{Common, common_builders, interactive_root};
use crate::interaction::{InteractionState, Interactive};
use crate::sizing::{SizeRules, infer};
use crate::{BuildCx, WidgetHandle};

const DEFAULT_W: f32 = 200.0;
const DEFAULT_H: f32 = 6.0;

pub struct ProgressSpec {
    pub value: f32,
    pub min: f32,
    pub max: f32,
    /// Makes the bar seekable: press/drag picks a value, released values
    /// are reported here.
    pub on_seek: Option<Rc<dyn Fn(f32)>>,
    pub common: Common,
}

impl ProgressSpec {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            min: 0.0,
            max: 1.0,
            on_seek: None,
            common: Common::default(),
        }
    }

    pub fn range(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn on_seek(mut self, f: impl Fn(f32) + 'static) -> Self {
        self.on_seek = Some(Rc::new(f));
        self
    }
}

common_builders!(ProgressSpec);

/// Linear progress bar. Only a bar with `on_seek` reacts to input.
pub fn ProgressBar(cx: &mut BuildCx, mut spec: ProgressSpec) -> WidgetHandle {
    let inferred = infer(
        cx.metrics.as_ref(),
        &spec.common.size,
        None,
        SizeRules::default().default_size(DEFAULT_W, DEFAULT_H),
    );
    let seekable = spec.on_seek.is_some();
    if !seekable {
        spec.common.enabled = false;
    }
    let node = interactive_root(cx, &spec.common, inferred.apply(spec.common.size));
    if !node.is_valid() {
        return WidgetHandle::invalid();
    }
    let size = inferred.or_fallback(Size::new(DEFAULT_W, DEFAULT_H));
    let t = norm(spec.value, spec.min, spec.max);

    cx.graph.add_primitive(node, Primitive::rect(Rect::from_size(size), StyleToken::ProgressTrack));
    let fill = cx.graph.add_primitive(node, Primitive::rect(Rect::ZERO, StyleToken::ProgressFill));

    let behavior = RangeBehavior {
        visual: TrackVisual {
            fill,
            thumb: None,
            track_y: 0.0,
            track_h: size.height,
        },
        ring: None,
        min: spec.min,
        max: spec.max,
        step: None,
        key_step: cx.config.key_step,
        on_change: spec.on_seek,
        on_input: None,
    };
    behavior.visual.paint(cx.graph, t, size.width, false);
    if spec.common.interactive() {
        let state = Rc::new(RefCell::new(InteractionState::with_value(t)));
        cx.attach(node, Interactive::new(behavior, state));
    }
    WidgetHandle::new(node)
}
