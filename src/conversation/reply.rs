//! What the chat transport should send back

use crate::menu::Keyboard;

/// Rendered chart attached to a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
    pub chart: Option<ChartImage>,
}

impl Reply {
    pub fn text(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
            chart: None,
        }
    }

    #[must_use]
    pub fn with_chart(mut self, chart: ChartImage) -> Self {
        self.chart = Some(chart);
        self
    }
}
