//! Style tokens and the theme table they resolve against.
//!
//! Widgets never hold colors; every primitive carries a [`StyleToken`] and
//! an optional per-primitive override. The renderer resolves the token
//! against the [`Theme`] owned by the runtime.

use arbor_text::TextStyle;

use crate::Color;

macro_rules! style_tokens {
    ($($name:ident),+ $(,)?) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum StyleToken {
            $($name),+
        }

        impl StyleToken {
            pub const ALL: &'static [StyleToken] = &[$(StyleToken::$name),+];

            pub const fn index(self) -> usize {
                self as usize
            }
        }
    };
}

style_tokens! {
    Surface,
    Text,
    TextMuted,
    FocusRing,
    Button,
    ButtonHover,
    ButtonPressed,
    ButtonDisabled,
    ButtonLabel,
    CheckboxBox,
    CheckboxBoxHover,
    CheckboxMark,
    CheckboxLabel,
    ToggleTrackOff,
    ToggleTrackOn,
    ToggleKnob,
    SliderTrack,
    SliderFill,
    SliderThumb,
    SliderThumbActive,
    ProgressTrack,
    ProgressFill,
    Field,
    FieldFocused,
    FieldText,
    FieldPlaceholder,
    FieldCaret,
    Dropdown,
    DropdownHover,
    DropdownText,
    DropdownList,
    DropdownOption,
    DropdownOptionHover,
    DropdownOptionSelected,
    Tab,
    TabHover,
    TabSelected,
    TabLabel,
    TabIndicator,
    TableHeader,
    TableHeaderText,
    TableRow,
    TableRowAlt,
    TableRowHover,
    TableRowSelected,
    TableCell,
    TableDivider,
    TreeRow,
    TreeRowHover,
    TreeRowSelected,
    TreeAccent,
    TreeConnector,
    TreeGlyph,
    TreeLabel,
    TreeLabelSelected,
    ScrollbarTrack,
    ScrollbarThumb,
    ScrollbarThumbActive,
}

/// Concrete visual record for one token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub fill: Color,
    pub foreground: Color,
    pub radius: f32,
    pub text: TextStyle,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Color::TRANSPARENT,
            foreground: Color::from_hex("#DDDDDD"),
            radius: 0.0,
            text: TextStyle::sized(14.0),
        }
    }
}

impl Style {
    fn fill(fill: &str) -> Self {
        Self {
            fill: Color::from_hex(fill),
            ..Self::default()
        }
    }
    fn ink(color: &str) -> Self {
        Self {
            foreground: Color::from_hex(color),
            ..Self::default()
        }
    }
    fn rounded(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }
    fn text(mut self, text: TextStyle) -> Self {
        self.text = text;
        self
    }
}

/// Token → style table. One entry per [`StyleToken`].
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    styles: Vec<Style>,
}

impl Default for Theme {
    fn default() -> Self {
        use StyleToken as T;
        let styles = T::ALL
            .iter()
            .map(|t| match t {
                T::Surface => Style::fill("#1E1E1E"),
                T::Text | T::CheckboxLabel | T::TreeLabel | T::TableCell | T::DropdownText => {
                    Style::ink("#DDDDDD")
                }
                T::TextMuted | T::FieldPlaceholder => Style::ink("#888888"),
                T::FocusRing => Style::fill("#88CCFF").rounded(4.0),
                T::Button => Style::fill("#34AF82").rounded(6.0),
                T::ButtonHover => Style::fill("#2A8F6A").rounded(6.0),
                T::ButtonPressed => Style::fill("#1F7556").rounded(6.0),
                T::ButtonDisabled => Style::fill("#3A3A3A").rounded(6.0),
                T::ButtonLabel => Style::ink("#FFFFFF").text(TextStyle::sized(14.0).weight(600)),
                T::CheckboxBox => Style::fill("#2A2A2A").rounded(3.0),
                T::CheckboxBoxHover => Style::fill("#333333").rounded(3.0),
                T::CheckboxMark => Style::fill("#34AF82").rounded(2.0),
                T::ToggleTrackOff => Style::fill("#555555").rounded(10.0),
                T::ToggleTrackOn => Style::fill("#34AF82").rounded(10.0),
                T::ToggleKnob => Style::fill("#FFFFFF").rounded(8.0),
                T::SliderTrack | T::ProgressTrack => Style::fill("#3A3A3A").rounded(2.0),
                T::SliderFill | T::ProgressFill => Style::fill("#34AF82").rounded(2.0),
                T::SliderThumb => Style::fill("#DDDDDD").rounded(8.0),
                T::SliderThumbActive => Style::fill("#FFFFFF").rounded(8.0),
                T::Field => Style::fill("#252525").rounded(4.0),
                T::FieldFocused => Style::fill("#2C2C2C").rounded(4.0),
                T::FieldText => Style::ink("#EEEEEE"),
                T::FieldCaret => Style::fill("#88CCFF"),
                T::Dropdown => Style::fill("#252525").rounded(4.0),
                T::DropdownHover => Style::fill("#2C2C2C").rounded(4.0),
                T::DropdownList => Style::fill("#1A1A1A").rounded(4.0),
                T::DropdownOption => Style::fill("#1A1A1A"),
                T::DropdownOptionHover => Style::fill("#2A2A2A"),
                T::DropdownOptionSelected => Style::fill("#1F7556"),
                T::Tab => Style::fill("#1E1E1E"),
                T::TabHover => Style::fill("#262626"),
                T::TabSelected => Style::fill("#2C2C2C"),
                T::TabLabel => Style::ink("#DDDDDD").text(TextStyle::sized(14.0).weight(500)),
                T::TabIndicator => Style::fill("#34AF82"),
                T::TableHeader => Style::fill("#2A2A2A"),
                T::TableHeaderText => Style::ink("#FFFFFF").text(TextStyle::sized(13.0).weight(600)),
                T::TableRow => Style::fill("#1E1E1E"),
                T::TableRowAlt => Style::fill("#222222"),
                T::TableRowHover => Style::fill("#2A2A2A"),
                T::TableRowSelected => Style::fill("#1F7556"),
                T::TableDivider | T::TreeConnector => Style::fill("#555555"),
                T::TreeRow => Style::fill("#00000000"),
                T::TreeRowHover => Style::fill("#2A2A2A"),
                T::TreeRowSelected => Style::fill("#1F4F3E"),
                T::TreeAccent => Style::fill("#34AF82"),
                T::TreeGlyph => Style::ink("#AAAAAA").text(TextStyle::sized(12.0)),
                T::TreeLabelSelected => Style::ink("#FFFFFF").text(TextStyle::sized(14.0).weight(600)),
                T::ScrollbarTrack => Style {
                    fill: Color(0xDD, 0xDD, 0xDD, 32),
                    ..Style::default()
                }
                .rounded(4.0),
                T::ScrollbarThumb => Style {
                    fill: Color(0xDD, 0xDD, 0xDD, 140),
                    ..Style::default()
                }
                .rounded(4.0),
                T::ScrollbarThumbActive => Style {
                    fill: Color(0xDD, 0xDD, 0xDD, 200),
                    ..Style::default()
                }
                .rounded(4.0),
            })
            .collect();
        Self { styles }
    }
}

impl Theme {
    pub fn style(&self, token: StyleToken) -> Style {
        self.styles.get(token.index()).copied().unwrap_or_default()
    }

    pub fn text_style(&self, token: StyleToken) -> TextStyle {
        self.style(token).text
    }

    pub fn with_style(mut self, token: StyleToken, style: Style) -> Self {
        if let Some(slot) = self.styles.get_mut(token.index()) {
            *slot = style;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_token_resolves() {
        let theme = Theme::default();
        assert_eq!(theme.styles.len(), StyleToken::ALL.len());
        for (i, t) in StyleToken::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
        }
    }

    #[test]
    fn with_style_overrides_one_token() {
        let custom = Style {
            radius: 12.0,
            ..Style::default()
        };
        let theme = Theme::default().with_style(StyleToken::Button, custom);
        assert_eq!(theme.style(StyleToken::Button).radius, 12.0);
        assert_eq!(
            theme.style(StyleToken::ButtonHover),
            Theme::default().style(StyleToken::ButtonHover)
        );
    }
}
