/// Caller-facing size request for a node.
///
/// A dimension with no preferred value, no min/max anchor and no stretch is
/// *unresolved*: widgets may infer it from their content before the node is
/// created. Everything else is left for the layout solver.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeSpec {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_height: Option<f32>,
    /// 0 = fixed, >0 = proportional share of remaining space.
    pub stretch_x: f32,
    pub stretch_y: f32,
}

impl SizeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fixed(width: f32, height: f32) -> Self {
        Self::new().width(width).height(height)
    }

    pub fn width(mut self, w: f32) -> Self {
        self.width = Some(w.max(0.0));
        self
    }
    pub fn height(mut self, h: f32) -> Self {
        self.height = Some(h.max(0.0));
        self
    }
    pub fn min_width(mut self, w: f32) -> Self {
        self.min_width = Some(w.max(0.0));
        self
    }
    pub fn max_width(mut self, w: f32) -> Self {
        self.max_width = Some(w.max(0.0));
        self
    }
    pub fn min_height(mut self, h: f32) -> Self {
        self.min_height = Some(h.max(0.0));
        self
    }
    pub fn max_height(mut self, h: f32) -> Self {
        self.max_height = Some(h.max(0.0));
        self
    }
    pub fn stretch_x(mut self, f: f32) -> Self {
        self.stretch_x = f;
        self
    }
    pub fn stretch_y(mut self, f: f32) -> Self {
        self.stretch_y = f;
        self
    }
    pub fn fill_width(self) -> Self {
        self.stretch_x(1.0)
    }

    pub fn is_width_unresolved(&self) -> bool {
        self.width.is_none()
            && self.min_width.is_none()
            && self.max_width.is_none()
            && self.stretch_x <= 0.0
    }

    pub fn is_height_unresolved(&self) -> bool {
        self.height.is_none()
            && self.min_height.is_none()
            && self.max_height.is_none()
            && self.stretch_y <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_only_without_any_anchor() {
        assert!(SizeSpec::new().is_width_unresolved());
        assert!(!SizeSpec::new().width(10.0).is_width_unresolved());
        assert!(!SizeSpec::new().max_width(10.0).is_width_unresolved());
        assert!(!SizeSpec::new().fill_width().is_width_unresolved());
        assert!(SizeSpec::new().stretch_x(-1.0).is_width_unresolved());
        assert!(SizeSpec::new().width(5.0).is_height_unresolved());
    }

    #[test]
    fn negative_extents_clamp() {
        assert_eq!(SizeSpec::new().width(-3.0).width, Some(0.0));
    }
}
